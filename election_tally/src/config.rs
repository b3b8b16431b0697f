// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The outcome of one party in one constituency for one election year.
///
/// Several records sharing the same constituency and year are the competing
/// candidates of that race.
#[derive(PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub year: u32,
    pub winner: String,
    /// The party code, for example `AITC` or `BJP`.
    pub party: String,
    pub votes: u64,
    /// Votes ahead of the runner-up.
    pub margin: u64,
    pub turnout_percentage: f64,
}

/// An electoral district represented by one seat.
#[derive(PartialEq, Debug, Clone)]
pub struct Constituency {
    pub id: String,
    pub name: String,
    pub district: String,
    pub assembly_segment: String,
    voter_count: u64,
    pub results: Option<Vec<ElectionResult>>,
}

impl Constituency {
    /// Creates a constituency without historical results.
    ///
    /// Fails if `voter_count` is zero.
    pub fn new(
        id: &str,
        name: &str,
        district: &str,
        assembly_segment: &str,
        voter_count: u64,
    ) -> Result<Constituency, TallyErrors> {
        if voter_count == 0 {
            return Err(TallyErrors::InvalidConstituency(format!(
                "constituency {} has no registered voters",
                id
            )));
        }
        Ok(Constituency {
            id: id.to_string(),
            name: name.to_string(),
            district: district.to_string(),
            assembly_segment: assembly_segment.to_string(),
            voter_count,
            results: None,
        })
    }

    pub fn with_results(self, results: Vec<ElectionResult>) -> Constituency {
        Constituency {
            results: Some(results),
            ..self
        }
    }

    pub fn voter_count(&self) -> u64 {
        self.voter_count
    }

    /// The historical results of this seat, empty if none were recorded.
    pub fn results(&self) -> &[ElectionResult] {
        self.results.as_deref().unwrap_or(&[])
    }
}

/// A political party. The color is only meaningful for display.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Party {
    pub code: String,
    pub name: String,
    pub color: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ElectionKind {
    Assembly,
    LokSabha,
    Panchayat,
}

impl ElectionKind {
    pub fn from_label(label: &str) -> Option<ElectionKind> {
        match label {
            "assembly" => Some(ElectionKind::Assembly),
            "lok_sabha" => Some(ElectionKind::LokSabha),
            "panchayat" => Some(ElectionKind::Panchayat),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ElectionKind::Assembly => "assembly",
            ElectionKind::LokSabha => "lok_sabha",
            ElectionKind::Panchayat => "panchayat",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Election {
    pub year: u32,
    pub kind: ElectionKind,
    pub date: String,
}

// ******** Output data structures *********

/// Percentages keyed by party code, ordered by party code.
pub type VoteShare = BTreeMap<String, f64>;

#[derive(PartialEq, Debug, Clone)]
pub struct ElectionStatistics {
    pub total_votes: u64,
    pub average_turnout: f64,
    pub party_count: usize,
    /// None if no votes were cast.
    pub winning_party: Option<String>,
    pub vote_share: VoteShare,
}

/// The vote share of one party in two elections.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct PartyComparison {
    pub share_a: f64,
    pub share_b: f64,
    /// share_b - share_a
    pub swing: f64,
}

/// Errors for records that cannot be used by a computation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// The record violates the precondition of the computation.
    InvalidRecord(String),
    InvalidConstituency(String),
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::InvalidRecord(msg) => write!(f, "invalid election record: {}", msg),
            TallyErrors::InvalidConstituency(msg) => write!(f, "invalid constituency: {}", msg),
        }
    }
}
