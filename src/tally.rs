use chrono::Datelike;
use log::{debug, info, warn};

use election_tally::*;
use snafu::{prelude::*, Snafu};

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tally::config_reader::*;
use crate::tally::display::{format_indian_number, format_share, PartyDirectory};

pub mod config_reader;
pub mod display;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum TallyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {name}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display(
        "The workbook {path} has {count} worksheets, the worksheet name must be provided"
    ))]
    AmbiguousWorksheet { path: String, count: usize },
    #[snafu(display("The worksheet of {path} has no header row"))]
    MissingHeader { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Invalid delimiter '{delimiter}': a single ASCII character is expected"))]
    InvalidDelimiter { delimiter: String },
    #[snafu(display("Provider not implemented: {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown election type '{kind}': expected assembly, lok_sabha or panchayat"))]
    UnknownElectionKind { kind: String },
    #[snafu(display("No input: provide --input or data sources with --config"))]
    MissingInput {},
    #[snafu(display("Invalid constituency in the configuration"))]
    InvalidConstituency { source: TallyErrors },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between computed summary and reference summary"))]
    ReferenceMismatch {},
}

pub type TallyResult<T> = Result<T, TallyError>;

/// A row of a tabular input, keyed by the normalized column name.
pub type Row = HashMap<String, String>;

/// The election results of one data source, with the raw constituency name of each record.
#[derive(PartialEq, Debug, Clone)]
struct SourceRecords {
    file_name: String,
    records: Vec<(Option<String>, ElectionResult)>,
}

fn resolve_path(root: Option<&Path>, file_path: &str) -> String {
    let p = Path::new(file_path);
    match root {
        Some(root_p) if p.is_relative() => {
            let full: PathBuf = [root_p, p].iter().collect();
            full.as_path().display().to_string()
        }
        _ => file_path.to_string(),
    }
}

fn read_rows(path: &str, source: &DataSource) -> TallyResult<Vec<Row>> {
    info!("Attempting to read results file {:?}", path);
    match source.provider.as_str() {
        "csv" => io_csv::read_csv_rows(path, source),
        "xlsx" => io_xlsx::read_xlsx_rows(path, source),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

fn read_source(root: Option<&Path>, source: &DataSource) -> TallyResult<SourceRecords> {
    let path = resolve_path(root, &source.file_path);
    let rows = read_rows(&path, source)?;
    let constituency_column = source.constituency_column();
    let results = parse_election_records(&rows);
    debug!("read_source: {:?}: {} records", path, results.len());
    let records = rows
        .iter()
        .map(|row| row.get(&constituency_column).cloned())
        .zip(results)
        .collect();
    Ok(SourceRecords {
        file_name: io_common::simplify_file_name(&path),
        records,
    })
}

fn data_sources(args: &Args, config: &TallyConfig) -> Vec<DataSource> {
    match args.input.clone() {
        Some(input) => vec![DataSource {
            provider: args.input_type.clone().unwrap_or_else(|| "csv".to_string()),
            file_path: input,
            excel_worksheet_name: args.excel_worksheet_name.clone(),
            delimiter: None,
            constituency_column: None,
        }],
        None => config.data_sources.clone(),
    }
}

fn comparison_years(args: &Args, config: &TallyConfig) -> Option<(u32, u32)> {
    match (args.year_a, args.year_b) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => config.comparison.as_ref().map(|c| (c.year_a, c.year_b)),
    }
}

fn current_year() -> u32 {
    chrono::Utc::now().year() as u32
}

/// Drops the records whose year is not a valid election year as of
/// `current_year`. Returns the number of dropped records.
fn retain_valid_years(
    records: &mut Vec<(Option<String>, ElectionResult)>,
    current_year: u32,
) -> usize {
    let before = records.len();
    records.retain(|(_, r)| is_valid_election_year(r.year, current_year));
    before - records.len()
}

/// Attaches every record to the configured constituency with the same
/// normalized name. Returns the constituencies and the number of records
/// that could not be attached.
fn assign_constituencies(
    entries: &[ConstituencyEntry],
    records: &[(Option<String>, ElectionResult)],
) -> TallyResult<(Vec<Constituency>, usize)> {
    let by_name: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(idx, e)| (normalize_constituency_name(&e.name), idx))
        .collect();

    let mut seat_results: Vec<Vec<ElectionResult>> = vec![Vec::new(); entries.len()];
    let mut unmatched: usize = 0;
    for (name_o, record) in records.iter() {
        let idx_o = name_o
            .as_ref()
            .and_then(|name| by_name.get(&normalize_constituency_name(name)));
        match idx_o {
            Some(idx) => seat_results[*idx].push(record.clone()),
            None => {
                debug!(
                    "assign_constituencies: no constituency for {:?}: {:?}",
                    name_o, record
                );
                unmatched += 1;
            }
        }
    }

    let mut res: Vec<Constituency> = Vec::new();
    for (e, results) in entries.iter().zip(seat_results) {
        let c = Constituency::new(
            &e.id,
            &e.name,
            &e.district,
            &e.assembly_segment,
            e.voter_count,
        )
        .context(InvalidConstituencySnafu {})?;
        res.push(c.with_results(results));
    }
    Ok((res, unmatched))
}

fn statistics_to_json(
    stats: &ElectionStatistics,
    totals: &BTreeMap<String, u64>,
    parties: &PartyDirectory,
) -> JSValue {
    let mut party_js: JSMap<String, JSValue> = JSMap::new();
    for (code, votes) in totals.iter() {
        let share = stats.vote_share.get(code).map(|s| format_share(*s));
        party_js.insert(
            code.clone(),
            json!({
                "name": parties.name(code),
                "color": parties.color(code),
                "votes": votes.to_string(),
                "share": share,
            }),
        );
    }
    json!({
        "totalVotes": stats.total_votes.to_string(),
        "averageTurnout": format_share(stats.average_turnout),
        "partyCount": stats.party_count,
        "winningParty": stats.winning_party,
        "parties": party_js,
    })
}

fn comparison_to_json(
    comparison: &BTreeMap<String, PartyComparison>,
    year_a: u32,
    year_b: u32,
) -> JSValue {
    let mut party_js: JSMap<String, JSValue> = JSMap::new();
    for (code, pc) in comparison.iter() {
        party_js.insert(
            code.clone(),
            json!({
                "shareA": format_share(pc.share_a),
                "shareB": format_share(pc.share_b),
                "swing": format_share(pc.swing),
            }),
        );
    }
    json!({"yearA": year_a, "yearB": year_b, "parties": party_js})
}

fn elections_to_json(elections: &[Election], results: &[ElectionResult]) -> JSValue {
    let elections_js: Vec<JSValue> = elections
        .iter()
        .map(|e| {
            json!({
                "year": e.year,
                "type": e.kind.label(),
                "date": e.date,
                "records": results.iter().filter(|r| r.year == e.year).count(),
            })
        })
        .collect();
    JSValue::Array(elections_js)
}

fn constituency_to_json(c: &Constituency, years: Option<(u32, u32)>) -> JSValue {
    let results = c.results();
    let all_years: BTreeSet<u32> = results.iter().map(|r| r.year).collect();
    let mut winners: JSMap<String, JSValue> = JSMap::new();
    for year in all_years {
        if let Some(r) = winning_record(results, year) {
            winners.insert(year.to_string(), json!(r.party));
        }
    }

    let swing: Option<String> = years.and_then(|(year_a, year_b)| {
        let previous = winning_record(results, year_a)?;
        let current = winning_record(results, year_b)?;
        match compute_vote_swing(current, previous) {
            Ok(s) => Some(format_share(s)),
            Err(e) => {
                warn!("Constituency {}: no swing: {}", c.id, e);
                None
            }
        }
    });

    json!({
        "id": c.id,
        "name": c.name,
        "district": c.district,
        "voterCount": c.voter_count(),
        "records": results.len(),
        "winners": winners,
        "swing": swing,
    })
}

fn log_statistics(stats: &ElectionStatistics, totals: &BTreeMap<String, u64>) {
    info!(
        "Total votes: {} average turnout: {}% winner: {}",
        format_indian_number(stats.total_votes),
        format_share(stats.average_turnout),
        stats.winning_party.as_deref().unwrap_or("none")
    );
    for (code, votes) in totals.iter() {
        let share = stats
            .vote_share
            .get(code)
            .map(|s| format!("{}%", format_share(*s)))
            .unwrap_or_else(|| "-".to_string());
        info!("{:>12} {:>8} {}", format_indian_number(*votes), share, code);
    }
}

/// Reads the data sources, computes the summary and writes it.
pub fn run_tally(args: &Args) -> TallyResult<JSValue> {
    let (config, root_p): (TallyConfig, Option<PathBuf>) = match args.config.clone() {
        Some(config_path) => {
            let config = read_config(&config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path.as_str())
                .parent()
                .map(|p| p.to_path_buf());
            (config, root)
        }
        None => (TallyConfig::default(), None),
    };
    // Input files given on the command line are relative to the working directory.
    let root: Option<&Path> = if args.input.is_some() {
        None
    } else {
        root_p.as_deref()
    };

    let elections: Vec<Election> = config
        .elections
        .iter()
        .map(|e| e.election())
        .collect::<TallyResult<Vec<Election>>>()?;

    let sources = data_sources(args, &config);
    ensure!(!sources.is_empty(), MissingInputSnafu {});

    let mut file_names: Vec<String> = Vec::new();
    let mut records: Vec<(Option<String>, ElectionResult)> = Vec::new();
    for source in sources.iter() {
        let mut source_records = read_source(root, source)?;
        file_names.push(source_records.file_name);
        records.append(&mut source_records.records);
    }
    info!("Read {} records from {} sources", records.len(), file_names.len());

    if args.strict {
        let dropped = retain_valid_years(&mut records, current_year());
        if dropped > 0 {
            warn!("Dropped {} records without a valid election year", dropped);
        }
    }

    let (constituencies, unmatched) = assign_constituencies(&config.constituencies, &records)?;
    if unmatched > 0 && !constituencies.is_empty() {
        warn!(
            "{} records do not belong to a configured constituency",
            unmatched
        );
    }

    let filtered = args.district.is_some() || args.search.is_some();
    let selected: Vec<&Constituency> = filter_constituencies(
        &constituencies,
        args.district.as_deref(),
        args.search.as_deref(),
    );
    let results: Vec<ElectionResult> = if filtered {
        info!("Selected {} constituencies", selected.len());
        selected
            .iter()
            .flat_map(|c| c.results().iter().cloned())
            .collect()
    } else {
        records.into_iter().map(|(_, r)| r).collect()
    };

    let stats = compute_election_statistics(&results);
    let totals = compute_party_vote_totals(&results);
    log_statistics(&stats, &totals);

    let parties = PartyDirectory::new(&config.parties);
    let years = comparison_years(args, &config);
    let comparison_js = match years {
        Some((year_a, year_b)) => match compare_elections(&results, year_a, year_b) {
            Some(comparison) => comparison_to_json(&comparison, year_a, year_b),
            None => {
                warn!(
                    "No comparison possible between {} and {}: one of the years has no records",
                    year_a, year_b
                );
                JSValue::Null
            }
        },
        None => JSValue::Null,
    };

    let constituencies_js: Vec<JSValue> = selected
        .iter()
        .map(|c| constituency_to_json(c, years))
        .collect();

    let summary_js = json!({
        "config": {
            "title": config.output_settings.title,
            "sources": file_names,
        },
        "elections": elections_to_json(&elections, &results),
        "statistics": statistics_to_json(&stats, &totals, &parties),
        "comparison": comparison_js,
        "constituencies": constituencies_js,
    });

    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    let out_o: Option<String> = match args.out.clone() {
        Some(out) => Some(out),
        None => config
            .output_settings
            .output_path
            .as_ref()
            .map(|p| resolve_path(root_p.as_deref(), p)),
    };
    match out_o.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js_stats),
        Some(out_path) => {
            info!("Writing summary to {:?}", out_path);
            fs::write(out_path, &pretty_js_stats).context(WritingSummarySnafu { path: out_path })?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = args.reference.clone() {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
    }

    Ok(summary_js)
}
