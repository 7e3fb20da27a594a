pub mod crosstab;
pub mod frequency;
pub mod kpi;
pub mod trend;
pub mod turnaround;

pub use crosstab::*;
pub use frequency::*;
pub use kpi::*;
pub use trend::*;
pub use turnaround::*;

use thiserror::Error;

use crate::dataset::table::Table;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Column {column} not found in table {table}")]
    MissingColumn { table: String, column: String },

    #[error("Column {column} in table {table} has no numeric values")]
    EmptyColumn { table: String, column: String },

    #[error("Empty denominator computing metric {metric}")]
    EmptyDenominator { metric: String },
}

pub(crate) fn column_index(table: &Table, column: &str) -> Result<usize, AggregateError> {
    table
        .column(column)
        .ok_or_else(|| AggregateError::MissingColumn {
            table: table.name.clone(),
            column: column.into(),
        })
}
