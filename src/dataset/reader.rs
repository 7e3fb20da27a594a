//! Raw dataset reader. Reloads the persisted raw artifact into generic
//! tables so the aggregation engine never touches in-memory generator
//! state (the re-ingestion boundary).

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};

use super::table::{Table, Value};
use super::DatasetError;

/// Reads the declared sheets from a raw artifact, in the given order.
/// A missing sheet is fatal and names the sheet.
pub fn read_raw(path: &Path, sheets: &[&str]) -> Result<Vec<Table>, DatasetError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    sheets
        .iter()
        .map(|name| read_sheet(&mut workbook, name))
        .collect()
}

fn read_sheet<R>(workbook: &mut Xlsx<R>, name: &str) -> Result<Table, DatasetError>
where
    R: std::io::Read + std::io::Seek,
{
    let range = match workbook.worksheet_range(name) {
        Ok(range) => range,
        Err(XlsxError::WorksheetNotFound(_)) => {
            return Err(DatasetError::SheetNotFound(name.into()));
        }
        Err(other) => return Err(DatasetError::Read(other)),
    };

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DatasetError::EmptySheet(name.into()))?;

    Ok(Table {
        name: name.into(),
        columns: header.iter().map(|cell| cell.to_string()).collect(),
        rows: rows
            .map(|row| row.iter().map(to_value).collect())
            .collect(),
    })
}

fn to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::flag(*b),
        other => Value::Text(other.to_string()),
    }
}
