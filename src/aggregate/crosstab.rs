//! Two-dimensional counts. The column set is data-driven: one column per
//! distinct second-dimension value observed, in first-encounter order.

use serde::Serialize;

use crate::dataset::table::Table;

use super::{column_index, AggregateError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crosstab {
    /// Observed second-dimension values, first-encounter order.
    pub columns: Vec<String>,
    pub rows: Vec<CrosstabRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosstabRow {
    pub label: String,
    /// One count per entry of `Crosstab::columns`.
    pub counts: Vec<u64>,
}

pub fn crosstab(
    table: &Table,
    row_column: &str,
    col_column: &str,
) -> Result<Crosstab, AggregateError> {
    let row_index = column_index(table, row_column)?;
    let col_index = column_index(table, col_column)?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<CrosstabRow> = Vec::new();

    for record in &table.rows {
        let row_label = record[row_index].label();
        let col_label = record[col_index].label();

        let col_position = match columns.iter().position(|c| *c == col_label) {
            Some(position) => position,
            None => {
                columns.push(col_label);
                for row in &mut rows {
                    row.counts.push(0);
                }
                columns.len() - 1
            }
        };

        let row_position = match rows.iter().position(|r| r.label == row_label) {
            Some(position) => position,
            None => {
                rows.push(CrosstabRow {
                    label: row_label,
                    counts: vec![0; columns.len()],
                });
                rows.len() - 1
            }
        };

        rows[row_position].counts[col_position] += 1;
    }

    Ok(Crosstab { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::table::Value;

    fn sync_table() -> Table {
        let rows = [
            ("ORDERS", "SUCCESS"),
            ("ORDERS", "FAILED"),
            ("RESULTS", "SUCCESS"),
            ("ORDERS", "SUCCESS"),
            ("RESULTS", "TIMEOUT"),
        ];
        Table {
            name: "SYNC_LOGS".into(),
            columns: vec!["SyncType".into(), "Status".into()],
            rows: rows
                .iter()
                .map(|(t, s)| vec![Value::text(*t), Value::text(*s)])
                .collect(),
        }
    }

    #[test]
    fn columns_are_data_driven_in_encounter_order() {
        let xt = crosstab(&sync_table(), "SyncType", "Status").unwrap();
        assert_eq!(xt.columns, vec!["SUCCESS", "FAILED", "TIMEOUT"]);
        assert_eq!(xt.rows.len(), 2);
        assert_eq!(xt.rows[0].label, "ORDERS");
        assert_eq!(xt.rows[0].counts, vec![2, 1, 0]);
        assert_eq!(xt.rows[1].label, "RESULTS");
        assert_eq!(xt.rows[1].counts, vec![1, 0, 1]);
    }

    #[test]
    fn every_row_count_vector_matches_column_set() {
        let xt = crosstab(&sync_table(), "Status", "SyncType").unwrap();
        for row in &xt.rows {
            assert_eq!(row.counts.len(), xt.columns.len());
        }
        let total: u64 = xt.rows.iter().flat_map(|r| r.counts.iter()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn empty_table_yields_empty_crosstab() {
        let table = Table {
            name: "SYNC_LOGS".into(),
            columns: vec!["SyncType".into(), "Status".into()],
            rows: vec![],
        };
        let xt = crosstab(&table, "SyncType", "Status").unwrap();
        assert!(xt.columns.is_empty());
        assert!(xt.rows.is_empty());
    }
}
