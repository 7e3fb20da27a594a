//! Raw dataset writer. One sheet per entity table, header row then one
//! row per record, column order exactly as generated, no styling. The
//! workbook is buffered in memory and written in a single save, so a
//! failed run leaves no partial artifact behind.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use super::table::{Table, Value};
use super::DatasetError;

pub fn write_raw(path: &Path, tables: &[Table]) -> Result<(), DatasetError> {
    let mut workbook = Workbook::new();

    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&table.name)?;

        for (col, header) in table.columns.iter().enumerate() {
            sheet.write_string(0, col as u16, header)?;
        }

        for (r, row) in table.rows.iter().enumerate() {
            let sheet_row = (r + 1) as u32;
            for (c, value) in row.iter().enumerate() {
                match value {
                    Value::Text(s) => {
                        sheet.write_string(sheet_row, c as u16, s)?;
                    }
                    Value::Number(n) => {
                        sheet.write_number(sheet_row, c as u16, *n)?;
                    }
                    Value::Missing => {}
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
