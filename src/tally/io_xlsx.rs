// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::{debug, warn};
use snafu::prelude::*;

use crate::tally::{
    config_reader::DataSource,
    io_common::{header_key, make_row},
    *,
};

pub fn read_xlsx_rows(path: &str, source: &DataSource) -> TallyResult<Vec<Row>> {
    let wrange = get_range(path, source)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(MissingHeaderSnafu { path })?
        .iter()
        .map(|cell| header_key(&read_cell(cell)))
        .collect();
    debug!("read_xlsx_rows: header: {:?}", header);

    let mut res: Vec<Row> = Vec::new();
    for (idx, row) in iter.enumerate() {
        debug!("read_xlsx_rows: idx: {:?} row: {:?}", idx, row);
        res.push(make_row(&header, row.iter().map(read_cell)));
    }
    Ok(res)
}

// Cells are turned back into text, the election records are parsed from text
// like any other input.
fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Whole numbers are stored as floats by most spreadsheets.
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        other => {
            warn!("read_cell: ignoring cell {:?}", other);
            String::new()
        }
    }
}

fn get_range(path: &str, source: &DataSource) -> TallyResult<calamine::Range<DataType>> {
    let worksheet_name_o = source.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu {
                path,
                count: all_worksheets.len(),
            }
            .fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::String("AITC".to_string())), "AITC");
        assert_eq!(read_cell(&DataType::Float(2021.0)), "2021");
        assert_eq!(read_cell(&DataType::Float(72.5)), "72.5");
        assert_eq!(read_cell(&DataType::Int(95000)), "95000");
        assert_eq!(read_cell(&DataType::Empty), "");
    }

    #[test]
    fn missing_workbook() {
        let source = DataSource {
            provider: "xlsx".to_string(),
            file_path: "missing.xlsx".to_string(),
            excel_worksheet_name: None,
            delimiter: None,
            constituency_column: None,
        };
        let res = read_xlsx_rows("does/not/exist/missing.xlsx", &source);
        assert!(matches!(res, Err(TallyError::OpeningExcel { .. })));
    }
}
