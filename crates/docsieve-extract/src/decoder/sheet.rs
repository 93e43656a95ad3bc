use std::path::Path;

use calamine::{Data, DataType, Range, Reader, open_workbook_auto};
use chrono::NaiveDateTime;

use super::SpreadsheetDecoder;
use crate::{Error, Result};

/// Spreadsheets through calamine: one line per row, non-empty cells
/// joined with tabs, sheets in workbook order.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalamineDecoder;

impl SpreadsheetDecoder for CalamineDecoder {
    fn decode(&self, path: &Path, sheet: Option<&str>) -> Result<String> {
        let mut workbook = open_workbook_auto(path).map_err(|e| Error::decode(path, "xlsx", e))?;
        let names = workbook.sheet_names().to_vec();

        let selected = match sheet.filter(|s| !s.is_empty()) {
            Some(wanted) if names.iter().any(|n| n == wanted) => vec![wanted.to_owned()],
            Some(wanted) => {
                return Err(Error::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: wanted.to_owned(),
                });
            }
            None => names,
        };

        let mut out = String::new();
        for name in &selected {
            let range = workbook
                .worksheet_range(name)
                .map_err(|e| Error::decode(path, "xlsx", format!("{name}: {e}")))?;
            write_rows(&range, &mut out);
        }
        Ok(out)
    }

    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        let workbook = open_workbook_auto(path).map_err(|e| Error::decode(path, "xlsx", e))?;
        Ok(workbook.sheet_names().to_vec())
    }
}

/// Rows above the used range still produce (empty) lines.
pub(crate) fn write_rows(range: &Range<Data>, out: &mut String) {
    let (first_row, _) = range.start().unwrap_or((0, 0));
    for _ in 0..first_row {
        out.push('\n');
    }
    for row in range.rows() {
        let cells: Vec<String> = row.iter().filter_map(cell_text).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
}

pub(crate) fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::DateTime(_) => Some(match cell.as_datetime() {
            Some(dt) => iso_datetime(&dt),
            None => cell.to_string(),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn iso_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_cells_are_skipped() {
        let mut range = Range::new((0, 0), (1, 2));
        range.set_value((0, 0), Data::String("name".into()));
        range.set_value((0, 2), Data::Float(1.5));
        range.set_value((1, 1), Data::Bool(true));

        let mut out = String::new();
        write_rows(&range, &mut out);
        assert_eq!(out, "name\t1.5\ntrue\n");
    }

    #[test]
    fn leading_rows_become_blank_lines() {
        let mut range = Range::new((2, 0), (2, 0));
        range.set_value((2, 0), Data::Int(7));

        let mut out = String::new();
        write_rows(&range, &mut out);
        assert_eq!(out, "\n\n7\n");
    }

    #[test]
    fn datetimes_are_iso() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(14, 5, 0))
            .unwrap();
        assert_eq!(iso_datetime(&dt), "2024-03-09T14:05:00");
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-03-09T14:05:00".into())).as_deref(),
            Some("2024-03-09T14:05:00")
        );
    }
}
