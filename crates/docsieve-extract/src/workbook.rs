//! Row-oriented spreadsheet export and import.

use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;
use serde_json::{Number, Value};

use crate::decoder::sheet::iso_datetime;
use crate::{Error, Result};

pub const EXPORT_SHEET_NAME: &str = "Sheet1";

/// Write `rows` into a fresh workbook at `path`, one worksheet named `Sheet1`.
///
/// Nulls leave the cell empty; arrays and objects are written as JSON text.
pub fn export_rows(path: impl AsRef<Path>, rows: &[Vec<Value>]) -> Result<()> {
    let path = path.as_ref();
    let fail = |e: rust_xlsxwriter::XlsxError| Error::spreadsheet(path, e);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME).map_err(fail)?;

    for (r, row) in rows.iter().enumerate() {
        let r = u32::try_from(r).map_err(|_| Error::spreadsheet(path, "too many rows"))?;
        for (c, value) in row.iter().enumerate() {
            let c = u16::try_from(c).map_err(|_| Error::spreadsheet(path, "too many columns"))?;
            match value {
                Value::Null => {}
                Value::Bool(b) => {
                    sheet.write_boolean(r, c, *b).map_err(fail)?;
                }
                Value::Number(n) => {
                    let n = n.as_f64().unwrap_or_default();
                    sheet.write_number(r, c, n).map_err(fail)?;
                }
                Value::String(s) => {
                    sheet.write_string(r, c, s).map_err(fail)?;
                }
                other => {
                    sheet.write_string(r, c, other.to_string()).map_err(fail)?;
                }
            }
        }
    }

    workbook.save(path).map_err(fail)
}

/// Read the first sheet of `path` as rows of JSON values, starting at `A1`.
pub fn import_rows(path: impl AsRef<Path>) -> Result<Vec<Vec<Value>>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| Error::decode(path, "xlsx", e))?;
    let Some(first) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };
    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| Error::decode(path, "xlsx", format!("{first}: {e}")))?;

    let Some((first_row, first_col)) = range.start() else {
        return Ok(Vec::new());
    };
    let mut rows: Vec<Vec<Value>> = (0..first_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut values = vec![Value::Null; first_col as usize];
        values.extend(row.iter().map(cell_value));
        rows.push(values);
    }
    Ok(rows)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => Value::String(iso_datetime(&dt)),
            None => Value::String(cell.to_string()),
        },
        Data::Error(e) => Value::String(e.to_string()),
    }
}
