use std::collections::HashMap;

use log::debug;

pub use crate::config::*;

/// A builder for collecting election results from loosely typed rows.
///
/// Fields are read leniently: a missing or non-numeric number becomes `0` and a
/// missing name becomes an empty string. A malformed row never fails the batch.
///
/// ```
/// use std::collections::HashMap;
/// use election_tally::builder::Builder;
///
/// let row: HashMap<String, String> = [
///     ("year", "2021"),
///     ("party", "AITC"),
///     ("votes", "95000"),
///     ("margin", "not available"),
/// ]
/// .iter()
/// .map(|(k, v)| (k.to_string(), v.to_string()))
/// .collect();
///
/// let mut builder = Builder::new();
/// builder.add_row(&row);
/// let results = builder.build();
///
/// assert_eq!(results[0].votes, 95000);
/// assert_eq!(results[0].margin, 0);
/// assert_eq!(results[0].winner, "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _results: Vec<ElectionResult>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _results: Vec::new(),
        }
    }

    /// Adds a row of named fields. Unknown column names are ignored.
    pub fn add_row(&mut self, row: &HashMap<String, String>) {
        let result = parse_row(row);
        debug!("add_row: {:?} -> {:?}", row, result);
        self._results.push(result);
    }

    pub fn len(&self) -> usize {
        self._results.len()
    }

    pub fn is_empty(&self) -> bool {
        self._results.is_empty()
    }

    /// The results, in the order they were added.
    pub fn build(self) -> Vec<ElectionResult> {
        self._results
    }
}

/// Converts one row into a result, defaulting every missing or malformed field.
pub fn parse_row(row: &HashMap<String, String>) -> ElectionResult {
    let int_field = |name: &str| row.get(name).and_then(|s| leading_integer(s)).unwrap_or(0);
    let text_field = |name: &str| row.get(name).cloned().unwrap_or_default();
    ElectionResult {
        year: u32::try_from(int_field("year")).unwrap_or(0),
        winner: text_field("winner"),
        party: text_field("party"),
        votes: int_field("votes"),
        margin: int_field("margin"),
        turnout_percentage: row
            .get("turnout_percentage")
            .and_then(|s| leading_float(s))
            .unwrap_or(0.0),
    }
}

// Reads the digits at the start of the field, after an optional `+`.
// Negative values are not valid counts.
fn leading_integer(s: &str) -> Option<u64> {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    s[..end].parse::<u64>().ok()
}

// Reads the longest prefix of the form `[+-]digits[.digits]`.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, c) in s.char_indices() {
        match c {
            '+' | '-' if idx == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            c if c.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = idx + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
}
