// Display metadata for parties. None of it is used by the computations.

use std::collections::HashMap;

use election_tally::Party;

use crate::tally::config_reader::PartyEntry;

const DEFAULT_COLOR: &str = "#8884d8";

// Well-known parties of West Bengal.
const PARTY_COLORS: &[(&str, &str)] = &[
    ("AITC", "#20C997"),
    ("BJP", "#FF9933"),
    ("INC", "#19AAED"),
    ("CPM", "#DC143C"),
    ("CPI", "#FF0000"),
    ("AAP", "#0066FF"),
    ("BSP", "#22409A"),
    ("SP", "#FF2222"),
    ("NOTA", "#808080"),
    ("Independent", "#666666"),
];

/// The display names and colors of the parties.
///
/// Configured parties take precedence over the built-in colors. Unknown
/// parties are displayed with their code and a neutral color.
#[derive(Debug, Clone, Default)]
pub struct PartyDirectory {
    parties: HashMap<String, Party>,
}

impl PartyDirectory {
    pub fn new(entries: &[PartyEntry]) -> PartyDirectory {
        let mut parties: HashMap<String, Party> = PARTY_COLORS
            .iter()
            .map(|(code, color)| {
                (
                    code.to_string(),
                    Party {
                        code: code.to_string(),
                        name: code.to_string(),
                        color: color.to_string(),
                    },
                )
            })
            .collect();
        for e in entries.iter() {
            let color = e
                .color
                .clone()
                .or_else(|| parties.get(&e.code).map(|p| p.color.clone()))
                .unwrap_or_else(|| DEFAULT_COLOR.to_string());
            parties.insert(
                e.code.clone(),
                Party {
                    code: e.code.clone(),
                    name: e.name.clone().unwrap_or_else(|| e.code.clone()),
                    color,
                },
            );
        }
        PartyDirectory { parties }
    }

    pub fn color(&self, code: &str) -> String {
        self.parties
            .get(code)
            .map(|p| p.color.clone())
            .unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }

    pub fn name(&self, code: &str) -> String {
        self.parties
            .get(code)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| code.to_string())
    }
}

/// Formats a count with the Indian digit grouping: `1234567` is `12,34,567`.
pub fn format_indian_number(n: u64) -> String {
    let s = n.to_string();
    if s.len() <= 3 {
        return s;
    }
    let (head, tail) = s.split_at(s.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Percentages and swings are reported with two decimals.
/// Values that round to zero are written as `0.00`, never `-0.00`.
pub fn format_share(x: f64) -> String {
    let x = if (x * 100.0).round() == 0.0 { 0.0 } else { x };
    format!("{:.2}", x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_numbers() {
        assert_eq!(format_indian_number(0), "0");
        assert_eq!(format_indian_number(999), "999");
        assert_eq!(format_indian_number(1000), "1,000");
        assert_eq!(format_indian_number(95000), "95,000");
        assert_eq!(format_indian_number(100000), "1,00,000");
        assert_eq!(format_indian_number(1234567), "12,34,567");
        assert_eq!(format_indian_number(123456789), "12,34,56,789");
    }

    #[test]
    fn party_lookup() {
        let parties = PartyDirectory::new(&[
            PartyEntry {
                code: "AITC".to_string(),
                name: Some("All India Trinamool Congress".to_string()),
                color: None,
            },
            PartyEntry {
                code: "ISF".to_string(),
                name: None,
                color: Some("#00AA00".to_string()),
            },
        ]);
        assert_eq!(parties.name("AITC"), "All India Trinamool Congress");
        assert_eq!(parties.color("AITC"), "#20C997");
        assert_eq!(parties.name("ISF"), "ISF");
        assert_eq!(parties.color("ISF"), "#00AA00");
        assert_eq!(parties.name("BJP"), "BJP");
        assert_eq!(parties.color("BJP"), "#FF9933");
        assert_eq!(parties.color("XYZ"), DEFAULT_COLOR);
        assert_eq!(parties.name("XYZ"), "XYZ");
    }

    #[test]
    fn shares() {
        assert_eq!(format_share(73.076923), "73.08");
        assert_eq!(format_share(0.0), "0.00");
        assert_eq!(format_share(-3.214953), "-3.21");
        assert_eq!(format_share(-1e-13), "0.00");
        assert_eq!(format_share(-0.0), "0.00");
        assert_eq!(format_share(-0.004), "0.00");
        assert_eq!(format_share(-0.006), "-0.01");
        // Swing of two shares that differ by float noise.
        assert_eq!(format_share(49.45054945054945 - 49.450549450549455), "0.00");
    }
}
