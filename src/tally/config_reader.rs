use log::debug;
use snafu::prelude::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::fs;

use crate::tally::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    pub title: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    /// csv or xlsx
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    pub delimiter: Option<String>,
    #[serde(rename = "constituencyColumn")]
    pub constituency_column: Option<String>,
}

impl DataSource {
    pub fn delimiter(&self) -> TallyResult<u8> {
        match self.delimiter.as_deref() {
            None => Ok(b','),
            Some("\\t") | Some("tab") => Ok(b'\t'),
            Some(s) if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
            Some(s) => InvalidDelimiterSnafu { delimiter: s }.fail(),
        }
    }

    /// The (normalized) name of the column holding the constituency name.
    pub fn constituency_column(&self) -> String {
        self.constituency_column
            .as_deref()
            .map(io_common::header_key)
            .unwrap_or_else(|| "constituency".to_string())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConstituencyEntry {
    pub id: String,
    pub name: String,
    pub district: String,
    #[serde(rename = "assemblySegment", default)]
    pub assembly_segment: String,
    #[serde(rename = "voterCount")]
    pub voter_count: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PartyEntry {
    pub code: String,
    pub name: Option<String>,
    pub color: Option<String>,
}

/// An election covered by the data sources.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionEntry {
    pub year: u32,
    /// assembly, lok_sabha or panchayat
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub date: String,
}

impl ElectionEntry {
    pub fn election(&self) -> TallyResult<Election> {
        let kind = ElectionKind::from_label(self.kind.trim()).context(UnknownElectionKindSnafu {
            kind: self.kind.clone(),
        })?;
        Ok(Election {
            year: self.year,
            kind,
            date: self.date.clone(),
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComparisonSettings {
    #[serde(rename = "yearA")]
    pub year_a: u32,
    #[serde(rename = "yearB")]
    pub year_b: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct TallyConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSources", default)]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub constituencies: Vec<ConstituencyEntry>,
    #[serde(default)]
    pub parties: Vec<PartyEntry>,
    #[serde(default)]
    pub elections: Vec<ElectionEntry>,
    pub comparison: Option<ComparisonSettings>,
}

pub fn read_config(path: &str) -> TallyResult<TallyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> TallyResult<TallyConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> TallyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config() {
        let config = parse_config(
            r##"{
                "outputSettings": { "title": "Kolkata", "outputPath": "out.json" },
                "dataSources": [
                    { "provider": "csv", "filePath": "a.csv", "delimiter": ";" },
                    { "provider": "xlsx", "filePath": "b.xlsx", "excelWorksheetName": "2016",
                      "constituencyColumn": " Seat " }
                ],
                "constituencies": [
                    { "id": "WB-167", "name": "Kolkata Uttar", "district": "Kolkata",
                      "assemblySegment": "Kolkata Uttar", "voterCount": 250000 }
                ],
                "parties": [ { "code": "AITC", "name": "All India Trinamool Congress", "color": "#20C997" } ],
                "elections": [ { "year": 2021, "type": "assembly", "date": "2021-05-02" } ],
                "comparison": { "yearA": 2016, "yearB": 2021 }
            }"##,
        )
        .unwrap();
        assert_eq!(config.output_settings.title.as_deref(), Some("Kolkata"));
        assert_eq!(config.data_sources.len(), 2);
        assert_eq!(config.data_sources[0].delimiter().unwrap(), b';');
        assert_eq!(config.data_sources[0].constituency_column(), "constituency");
        assert_eq!(config.data_sources[1].delimiter().unwrap(), b',');
        assert_eq!(config.data_sources[1].constituency_column(), "seat");
        assert_eq!(config.constituencies[0].voter_count, 250000);
        assert_eq!(
            config.elections[0].election().unwrap(),
            Election {
                year: 2021,
                kind: ElectionKind::Assembly,
                date: "2021-05-02".to_string()
            }
        );
        assert_eq!(
            config.comparison,
            Some(ComparisonSettings {
                year_a: 2016,
                year_b: 2021
            })
        );
    }

    #[test]
    fn minimal_config() {
        let config = parse_config(r#"{ "dataSources": [ { "provider": "csv", "filePath": "a.csv" } ] }"#)
            .unwrap();
        assert_eq!(config.output_settings, OutputSettings::default());
        assert!(config.constituencies.is_empty());
        assert!(config.parties.is_empty());
        assert!(config.elections.is_empty());
        assert_eq!(config.comparison, None);
    }

    #[test]
    fn election_kinds() {
        let entry = |kind: &str| ElectionEntry {
            year: 2019,
            kind: kind.to_string(),
            date: String::new(),
        };
        assert_eq!(entry("lok_sabha").election().unwrap().kind, ElectionKind::LokSabha);
        assert_eq!(entry(" panchayat ").election().unwrap().kind, ElectionKind::Panchayat);
        assert!(matches!(
            entry("municipal").election(),
            Err(TallyError::UnknownElectionKind { .. })
        ));
        let config = parse_config(r#"{ "elections": [ { "year": 2019, "type": "lok_sabha" } ] }"#)
            .unwrap();
        assert_eq!(config.elections[0].date, "");
    }

    #[test]
    fn invalid_config() {
        let res = parse_config(r#"{ "dataSources": 3 }"#);
        assert!(matches!(res, Err(TallyError::ParsingJson { .. })));
    }

    #[test]
    fn delimiters() {
        let source = |d: &str| DataSource {
            provider: "csv".to_string(),
            file_path: "a.csv".to_string(),
            excel_worksheet_name: None,
            delimiter: Some(d.to_string()),
            constituency_column: None,
        };
        assert_eq!(source("tab").delimiter().unwrap(), b'\t');
        assert_eq!(source("|").delimiter().unwrap(), b'|');
        assert!(matches!(
            source(";;").delimiter(),
            Err(TallyError::InvalidDelimiter { .. })
        ));
        assert!(matches!(
            source("¦").delimiter(),
            Err(TallyError::InvalidDelimiter { .. })
        ));
    }
}
