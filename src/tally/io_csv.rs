// Primitives for reading CSV files.

use log::debug;
use snafu::prelude::*;

use crate::tally::{
    config_reader::DataSource,
    io_common::{header_key, make_row},
    *,
};

pub fn read_csv_rows(path: &str, source: &DataSource) -> TallyResult<Vec<Row>> {
    let delimiter = source.delimiter()?;
    // Lines may have fewer or more fields than the header.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(header_key)
        .collect();
    debug!("read_csv_rows: header: {:?}", header);

    let mut res: Vec<Row> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is the first line
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        debug!("read_csv_rows: lineno: {:?} line: {:?}", lineno, line);
        res.push(make_row(&header, line.iter().map(|s| s.to_string())));
    }
    Ok(res)
}
