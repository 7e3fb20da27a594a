pub mod charts;
pub mod lims;
pub mod nhs;
pub mod sheet;
pub mod style;

use thiserror::Error;

use crate::aggregate::AggregateError;
use crate::dataset::table::Table;
use crate::models::ModelError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Workbook write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("Invalid coded value in raw data: {0}")]
    Model(#[from] ModelError),

    #[error("Raw table missing from loaded dataset: {0}")]
    MissingTable(String),
}

pub(crate) fn find_table<'a>(tables: &'a [Table], name: &str) -> Result<&'a Table, ReportError> {
    tables
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| ReportError::MissingTable(name.into()))
}
