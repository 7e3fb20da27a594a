//! Measured turnaround between two timestamp columns, grouped by a key.
//! Backs the department TAT breakdown: order counts come from every row,
//! averages only from rows where both timestamps are present.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::dataset::table::{Table, DATETIME_FMT};

use super::{column_index, AggregateError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnaroundRow {
    pub label: String,
    /// All rows in the group, completed or not.
    pub total: u64,
    /// Average start-to-end gap in hours over completed rows; `None`
    /// when the group has no completed row.
    pub avg_hours: Option<f64>,
    /// Share of completed rows within `target_hours`.
    pub within_target_pct: Option<f64>,
}

pub fn turnaround_by(
    table: &Table,
    key_column: &str,
    start_column: &str,
    end_column: &str,
    target_hours: f64,
) -> Result<Vec<TurnaroundRow>, AggregateError> {
    let key_index = column_index(table, key_column)?;
    let start_index = column_index(table, start_column)?;
    let end_index = column_index(table, end_column)?;

    struct Group {
        label: String,
        total: u64,
        completed: u64,
        hours_sum: f64,
        within_target: u64,
    }

    let mut groups: Vec<Group> = Vec::new();
    for row in &table.rows {
        let label = row[key_index].label();
        let position = match groups.iter().position(|g| g.label == label) {
            Some(position) => position,
            None => {
                groups.push(Group {
                    label,
                    total: 0,
                    completed: 0,
                    hours_sum: 0.0,
                    within_target: 0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[position];
        group.total += 1;

        let start = NaiveDateTime::parse_from_str(&row[start_index].label(), DATETIME_FMT);
        let end = NaiveDateTime::parse_from_str(&row[end_index].label(), DATETIME_FMT);
        if let (Ok(start), Ok(end)) = (start, end) {
            let hours = (end - start).num_minutes() as f64 / 60.0;
            group.completed += 1;
            group.hours_sum += hours;
            if hours <= target_hours {
                group.within_target += 1;
            }
        }
    }

    Ok(groups
        .into_iter()
        .map(|g| TurnaroundRow {
            label: g.label,
            total: g.total,
            avg_hours: (g.completed > 0).then(|| g.hours_sum / g.completed as f64),
            within_target_pct: (g.completed > 0)
                .then(|| g.within_target as f64 * 100.0 / g.completed as f64),
        })
        .collect())
}
