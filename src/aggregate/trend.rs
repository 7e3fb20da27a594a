//! Time-bucketed trends: calendar-month counts truncated to the most
//! recent N buckets, chronologically ascending.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::table::{Table, DATE_FMT};

use super::{column_index, AggregateError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Calendar bucket, `YYYY-MM`.
    pub bucket: String,
    pub count: u64,
}

/// Counts rows per calendar month of `date_column`, keeping the most
/// recent `last_n` buckets in ascending order. Cells that do not parse
/// as a date are skipped.
pub fn monthly_counts(
    table: &Table,
    date_column: &str,
    last_n: usize,
) -> Result<Vec<TrendPoint>, AggregateError> {
    let index = column_index(table, date_column)?;
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    for value in table.values(index) {
        let label = value.label();
        let Ok(date) = NaiveDate::parse_from_str(&label, DATE_FMT) else {
            continue;
        };
        *buckets.entry(date.format("%Y-%m").to_string()).or_default() += 1;
    }

    let skip = buckets.len().saturating_sub(last_n);
    Ok(buckets
        .into_iter()
        .skip(skip)
        .map(|(bucket, count)| TrendPoint { bucket, count })
        .collect())
}

/// Label/value pairs of two columns in row order, skipping rows whose
/// value cell is not numeric. Used for pre-bucketed series such as the
/// daily performance snapshots.
pub fn column_series(
    table: &Table,
    label_column: &str,
    value_column: &str,
) -> Result<Vec<(String, f64)>, AggregateError> {
    let label_index = column_index(table, label_column)?;
    let value_index = column_index(table, value_column)?;
    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            row[value_index]
                .as_number()
                .map(|x| (row[label_index].label(), x))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::table::Value;

    fn date_table(dates: &[&str]) -> Table {
        Table {
            name: "appointments".into(),
            columns: vec!["appointment_date".into()],
            rows: dates.iter().map(|d| vec![Value::text(*d)]).collect(),
        }
    }

    #[test]
    fn buckets_by_calendar_month_ascending() {
        let table = date_table(&[
            "2025-03-02",
            "2025-01-15",
            "2025-03-28",
            "2025-02-01",
            "2025-01-31",
        ]);
        let trend = monthly_counts(&table, "appointment_date", 12).unwrap();
        assert_eq!(
            trend,
            vec![
                TrendPoint { bucket: "2025-01".into(), count: 2 },
                TrendPoint { bucket: "2025-02".into(), count: 1 },
                TrendPoint { bucket: "2025-03".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn truncates_to_most_recent_buckets() {
        let table = date_table(&[
            "2024-10-01",
            "2024-11-01",
            "2024-12-01",
            "2025-01-01",
        ]);
        let trend = monthly_counts(&table, "appointment_date", 2).unwrap();
        let buckets: Vec<_> = trend.iter().map(|p| p.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["2024-12", "2025-01"]);
    }

    #[test]
    fn unparseable_cells_are_skipped() {
        let table = date_table(&["2025-01-01", "not-a-date", ""]);
        let trend = monthly_counts(&table, "appointment_date", 6).unwrap();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].count, 1);
    }

    #[test]
    fn column_series_pairs_labels_with_numbers() {
        let table = Table {
            name: "PERF_METRICS".into(),
            columns: vec!["Date".into(), "AverageTAT".into()],
            rows: vec![
                vec![Value::text("2025-01-01"), Value::num(4.5)],
                vec![Value::text("2025-01-02"), Value::Missing],
                vec![Value::text("2025-01-03"), Value::num(5.25)],
            ],
        };
        let series = column_series(&table, "Date", "AverageTAT").unwrap();
        assert_eq!(
            series,
            vec![
                ("2025-01-01".to_string(), 4.5),
                ("2025-01-03".to_string(), 5.25),
            ]
        );
    }
}
