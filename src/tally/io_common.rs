use std::path::Path;

use crate::tally::Row;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Column names are matched without surrounding whitespace and ignoring case.
pub fn header_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Pairs the header with the fields of one line. Missing trailing fields are
/// left out of the row and extra fields are dropped.
pub fn make_row<I>(header: &[String], fields: I) -> Row
where
    I: IntoIterator<Item = String>,
{
    header.iter().cloned().zip(fields).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("data/2021/results.csv"), "results.csv");
        assert_eq!(simplify_file_name("results.csv"), "results.csv");
        assert_eq!(simplify_file_name(".."), "..");
    }

    #[test]
    fn header_keys() {
        assert_eq!(header_key(" Turnout_Percentage "), "turnout_percentage");
        assert_eq!(header_key("VOTES"), "votes");
    }

    #[test]
    fn short_and_long_lines() {
        let header: Vec<String> = vec!["year".to_string(), "party".to_string(), "votes".to_string()];
        let short = make_row(&header, vec!["2021".to_string(), "AITC".to_string()]);
        assert_eq!(short.len(), 2);
        assert_eq!(short.get("votes"), None);
        let long = make_row(
            &header,
            ["2021", "AITC", "10", "extra"].iter().map(|s| s.to_string()),
        );
        assert_eq!(long.len(), 3);
        assert_eq!(long["votes"], "10");
    }
}
