/*!
Aggregation of constituency election results: vote share, swing, turnout and
year-to-year comparisons.

All the functions of this crate are pure: they never mutate their inputs and
perform no I/O. Loosely typed rows (for example coming from a CSV file) are
turned into [`ElectionResult`] records with [`parse_election_records`] or the
[`builder::Builder`].

```
use election_tally::*;

let results = vec![
    ElectionResult {
        year: 2021,
        winner: "A".to_string(),
        party: "AITC".to_string(),
        votes: 95000,
        margin: 12000,
        turnout_percentage: 81.0,
    },
    ElectionResult {
        year: 2021,
        winner: "B".to_string(),
        party: "BJP".to_string(),
        votes: 35000,
        margin: 0,
        turnout_percentage: 81.0,
    },
];
let stats = compute_election_statistics(&results);
assert_eq!(stats.winning_party, Some("AITC".to_string()));
```
*/

pub mod builder;
mod config;
pub mod manual;

use log::{debug, info};

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    ops::{Add, AddAssign},
};

pub use crate::config::*;

// **** Private structures ****

// Additions saturate at u64::MAX rather than overflow.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(VoteCount::EMPTY, |acc, vc| acc + vc)
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        *self = *self + rhs;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0.saturating_add(rhs.0))
    }
}

fn tally_by_party(results: &[ElectionResult]) -> BTreeMap<String, VoteCount> {
    let mut tally: BTreeMap<String, VoteCount> = BTreeMap::new();
    for r in results.iter() {
        *tally.entry(r.party.clone()).or_insert(VoteCount::EMPTY) += VoteCount(r.votes);
    }
    tally
}

// The party with the most votes. Ties go to the smallest party code, which is
// the first one met when iterating over the sorted tally.
fn leading_party(tally: &BTreeMap<String, VoteCount>) -> Option<String> {
    let mut best: Option<(&String, VoteCount)> = None;
    for (party, count) in tally.iter() {
        match best {
            Some((_, best_count)) if *count <= best_count => {}
            _ => best = Some((party, *count)),
        }
    }
    best.filter(|(_, count)| *count > VoteCount::EMPTY)
        .map(|(party, _)| party.clone())
}

// **** Aggregation ****

/// The total number of votes of each party, keyed by party code.
pub fn compute_party_vote_totals(results: &[ElectionResult]) -> BTreeMap<String, u64> {
    tally_by_party(results)
        .into_iter()
        .map(|(party, count)| (party, count.0))
        .collect()
}

/// The share of the votes (in percent) of each party, over all the records.
///
/// If no votes were cast at all, the share is undefined and the returned
/// mapping is empty. Otherwise it contains exactly the parties of the input
/// and the shares sum to 100.
pub fn compute_party_vote_share(results: &[ElectionResult]) -> VoteShare {
    let tally = tally_by_party(results);
    let total: VoteCount = tally.values().cloned().sum();
    if total == VoteCount::EMPTY {
        debug!(
            "compute_party_vote_share: no votes in {:?} records",
            results.len()
        );
        return VoteShare::new();
    }
    // Summed as floats so that the shares still add up to 100 when the
    // integer total saturates.
    let total_f: f64 = tally.values().map(|c| c.0 as f64).sum();
    tally
        .into_iter()
        .map(|(party, count)| (party, (count.0 as f64 / total_f) * 100.0))
        .collect()
}

// The share of the winner within its own race, reconstructed from the margin.
fn implied_share(result: &ElectionResult) -> Result<f64, TallyErrors> {
    let race_votes = result.votes as f64 + result.margin as f64;
    if result.votes == 0 && result.margin == 0 {
        return Err(TallyErrors::InvalidRecord(format!(
            "{} {} ({}): votes and margin are both zero",
            result.year, result.winner, result.party
        )));
    }
    Ok((result.votes as f64 / race_votes) * 100.0)
}

/// The change of the implied vote share between two results.
///
/// The implied share of a record is `votes / (votes + margin)`. This only
/// approximates a two-candidate race and is not comparable with the shares
/// of [`compute_party_vote_share`], which are computed over all the votes.
///
/// Fails with [`TallyErrors::InvalidRecord`] if a record has no votes and no
/// margin.
pub fn compute_vote_swing(
    current: &ElectionResult,
    previous: &ElectionResult,
) -> Result<f64, TallyErrors> {
    let current_share = implied_share(current)?;
    let previous_share = implied_share(previous)?;
    debug!(
        "compute_vote_swing: current: {:?} previous: {:?}",
        current_share, previous_share
    );
    Ok(current_share - previous_share)
}

/// Summary statistics over a set of results.
///
/// The winning party is the one with the largest vote share. If several
/// parties share the largest value, the smallest party code (in byte order)
/// wins. No party wins if no votes were cast.
pub fn compute_election_statistics(results: &[ElectionResult]) -> ElectionStatistics {
    if results.is_empty() {
        return ElectionStatistics {
            total_votes: 0,
            average_turnout: 0.0,
            party_count: 0,
            winning_party: None,
            vote_share: VoteShare::new(),
        };
    }

    let tally = tally_by_party(results);
    let total_votes: VoteCount = tally.values().cloned().sum();
    let average_turnout =
        results.iter().map(|r| r.turnout_percentage).sum::<f64>() / results.len() as f64;
    let winning_party = leading_party(&tally);
    info!(
        "compute_election_statistics: {} records, {} parties, winner: {:?}",
        results.len(),
        tally.len(),
        winning_party
    );

    ElectionStatistics {
        total_votes: total_votes.0,
        average_turnout,
        party_count: tally.len(),
        winning_party,
        vote_share: compute_party_vote_share(results),
    }
}

/// Compares the vote share of every party between `year_a` and `year_b`.
///
/// Parties present in only one of the years get a share of 0 in the other
/// one. Returns None if one of the years has no records, since no
/// meaningful comparison can be made.
pub fn compare_elections(
    results: &[ElectionResult],
    year_a: u32,
    year_b: u32,
) -> Option<BTreeMap<String, PartyComparison>> {
    let results_a = results_for_year(results, year_a);
    let results_b = results_for_year(results, year_b);
    if results_a.is_empty() || results_b.is_empty() {
        info!(
            "compare_elections: no comparison between {} ({} records) and {} ({} records)",
            year_a,
            results_a.len(),
            year_b,
            results_b.len()
        );
        return None;
    }

    let share_a = compute_party_vote_share(&results_a);
    let share_b = compute_party_vote_share(&results_b);

    let all_parties: BTreeSet<&String> = share_a.keys().chain(share_b.keys()).collect();
    let comparison = all_parties
        .into_iter()
        .map(|party| {
            let a = share_a.get(party).cloned().unwrap_or(0.0);
            let b = share_b.get(party).cloned().unwrap_or(0.0);
            (
                party.clone(),
                PartyComparison {
                    share_a: a,
                    share_b: b,
                    swing: b - a,
                },
            )
        })
        .collect();
    Some(comparison)
}

/// The records of the given year, in their original order.
pub fn results_for_year(results: &[ElectionResult], year: u32) -> Vec<ElectionResult> {
    results.iter().filter(|r| r.year == year).cloned().collect()
}

/// The record with the most votes in the given year.
///
/// Ties go to the smallest party code. Returns None if there is no record
/// for that year.
pub fn winning_record(results: &[ElectionResult], year: u32) -> Option<&ElectionResult> {
    results
        .iter()
        .filter(|r| r.year == year)
        .reduce(|best, r| {
            if r.votes > best.votes || (r.votes == best.votes && r.party < best.party) {
                r
            } else {
                best
            }
        })
}

// **** Records and names ****

/// Converts loosely typed rows into election results.
///
/// Parsing is lenient: missing or malformed numbers become 0 and missing
/// names become empty strings. Callers that need strict validation should
/// filter the defaulted records themselves. The output follows the order of
/// the rows.
pub fn parse_election_records(rows: &[HashMap<String, String>]) -> Vec<ElectionResult> {
    let mut b = builder::Builder::new();
    for row in rows.iter() {
        b.add_row(row);
    }
    if b.is_empty() {
        debug!("parse_election_records: no rows");
    } else {
        debug!("parse_election_records: parsed {} rows", b.len());
    }
    b.build()
}

/// Cleans a constituency name coming from free text.
///
/// The name is trimmed and lowercased, punctuation is removed, runs of
/// whitespace are collapsed and every word is capitalized:
/// `" kolkata  UTTAR "` becomes `"Kolkata Uttar"`.
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_constituency_name(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<String>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut upper = first.to_uppercase();
            // Characters that expand when uppercased (like 'ß') would not
            // lowercase back to themselves. Keep them as they are.
            let head: String = match (upper.next(), upper.next()) {
                (Some(u), None) => u.to_string(),
                _ => first.to_string(),
            };
            head + chars.as_str()
        }
        None => String::new(),
    }
}

// **** Constituencies ****

/// The constituencies whose district contains `district`, ignoring case.
pub fn constituencies_by_district<'a>(
    constituencies: &'a [Constituency],
    district: &str,
) -> Vec<&'a Constituency> {
    let needle = district.to_lowercase();
    constituencies
        .iter()
        .filter(|c| c.district.to_lowercase().contains(&needle))
        .collect()
}

/// Filters constituencies by district and by a search term matched against
/// the name or the district. Both filters ignore case and are optional.
pub fn filter_constituencies<'a>(
    constituencies: &'a [Constituency],
    district: Option<&str>,
    search_term: Option<&str>,
) -> Vec<&'a Constituency> {
    let district = district.filter(|s| !s.is_empty()).map(|s| s.to_lowercase());
    let search_term = search_term
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase());
    constituencies
        .iter()
        .filter(|c| {
            let c_district = c.district.to_lowercase();
            let district_ok = district
                .as_ref()
                .map(|d| c_district.contains(d.as_str()))
                .unwrap_or(true);
            let search_ok = search_term
                .as_ref()
                .map(|s| c.name.to_lowercase().contains(s.as_str()) || c_district.contains(s.as_str()))
                .unwrap_or(true);
            district_ok && search_ok
        })
        .collect()
}

// **** Helpers ****

/// `part` as a percentage of `total`, rounded to `decimals` places.
/// Returns 0 when `total` is 0.
pub fn calculate_percentage(part: f64, total: f64, decimals: u32) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    ((part / total) * 100.0 * factor).round() / factor
}

/// Whether `year` is a plausible election year, between the first general
/// election (1950) and `current_year`.
pub fn is_valid_election_year(year: u32, current_year: u32) -> bool {
    (1950..=current_year).contains(&year)
}
