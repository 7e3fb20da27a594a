//! Frequency and group-by summaries. All functions here are pure:
//! identical input tables produce identical output, independent of any
//! generation-time randomness.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::table::{Table, DATE_FMT};

use super::{column_index, AggregateError};

/// One category of a frequency summary. `share_pct` is exact (unrounded)
/// so per-category shares always close to 100 within float tolerance;
/// rounding happens at render time only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub label: String,
    pub count: u64,
    pub share_pct: f64,
}

/// Counts rows per category of `column`, descending by count. The sort
/// is stable, so tied categories keep first-encounter order. Missing
/// cells do not form a category.
pub fn frequency(table: &Table, column: &str) -> Result<Vec<FrequencyRow>, AggregateError> {
    let index = column_index(table, column)?;
    let mut counts: Vec<(String, u64)> = Vec::new();
    for value in table.values(index) {
        if value.is_missing() {
            continue;
        }
        let label = value.label();
        match counts.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts
        .into_iter()
        .map(|(label, count)| FrequencyRow {
            label,
            count,
            share_pct: count as f64 * 100.0 / total as f64,
        })
        .collect())
}

/// Per-category counts of rows whose `filter_column` equals
/// `filter_value`, in encounter order of `column`.
pub fn filtered_frequency(
    table: &Table,
    column: &str,
    filter_column: &str,
    filter_value: &str,
) -> Result<Vec<(String, u64)>, AggregateError> {
    let index = column_index(table, column)?;
    let filter_index = column_index(table, filter_column)?;
    let mut counts: Vec<(String, u64)> = Vec::new();
    for row in &table.rows {
        if row[filter_index].label() != filter_value {
            continue;
        }
        let label = row[index].label();
        match counts.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    Ok(counts)
}

/// First K rows of a frequency summary.
pub fn top_k(rows: &[FrequencyRow], k: usize) -> &[FrequencyRow] {
    &rows[..rows.len().min(k)]
}

/// Rows whose `column` equals `value`.
pub fn count_where(table: &Table, column: &str, value: &str) -> Result<u64, AggregateError> {
    let index = column_index(table, column)?;
    Ok(table.values(index).filter(|v| v.label() == value).count() as u64)
}

/// Distinct non-missing values of `column`.
pub fn distinct_count(table: &Table, column: &str) -> Result<u64, AggregateError> {
    let index = column_index(table, column)?;
    let mut seen: Vec<String> = Vec::new();
    for value in table.values(index) {
        if value.is_missing() {
            continue;
        }
        let label = value.label();
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    Ok(seen.len() as u64)
}

/// Mean of the numeric cells of `column`. A column without a single
/// numeric value fails loudly.
pub fn mean(table: &Table, column: &str) -> Result<f64, AggregateError> {
    let index = column_index(table, column)?;
    let mut sum = 0.0;
    let mut n = 0u64;
    for value in table.values(index) {
        if let Some(x) = value.as_number() {
            sum += x;
            n += 1;
        }
    }
    if n == 0 {
        return Err(AggregateError::EmptyColumn {
            table: table.name.clone(),
            column: column.into(),
        });
    }
    Ok(sum / n as f64)
}

/// Sum of `value_column` per category of `key_column`, encounter order.
pub fn sum_by(
    table: &Table,
    key_column: &str,
    value_column: &str,
) -> Result<Vec<(String, f64)>, AggregateError> {
    fold_by(table, key_column, value_column, |acc, x| acc + x)
}

/// Mean of `value_column` per category of `key_column`, encounter order.
pub fn mean_by(
    table: &Table,
    key_column: &str,
    value_column: &str,
) -> Result<Vec<(String, f64)>, AggregateError> {
    let key_index = column_index(table, key_column)?;
    let value_index = column_index(table, value_column)?;
    let mut groups: Vec<(String, f64, u64)> = Vec::new();
    for row in &table.rows {
        let Some(x) = row[value_index].as_number() else {
            continue;
        };
        let label = row[key_index].label();
        match groups.iter_mut().find(|(existing, _, _)| *existing == label) {
            Some((_, sum, n)) => {
                *sum += x;
                *n += 1;
            }
            None => groups.push((label, x, 1)),
        }
    }
    Ok(groups
        .into_iter()
        .map(|(label, sum, n)| (label, sum / n as f64))
        .collect())
}

fn fold_by(
    table: &Table,
    key_column: &str,
    value_column: &str,
    fold: impl Fn(f64, f64) -> f64,
) -> Result<Vec<(String, f64)>, AggregateError> {
    let key_index = column_index(table, key_column)?;
    let value_index = column_index(table, value_column)?;
    let mut groups: Vec<(String, f64)> = Vec::new();
    for row in &table.rows {
        let Some(x) = row[value_index].as_number() else {
            continue;
        };
        let label = row[key_index].label();
        match groups.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, acc)) => *acc = fold(*acc, x),
            None => groups.push((label, x)),
        }
    }
    Ok(groups)
}

/// Fixed age bands for demographic breakdowns.
const AGE_BANDS: &[(&str, i64, i64)] = &[
    ("0-17", 0, 17),
    ("18-29", 18, 29),
    ("30-49", 30, 49),
    ("50-64", 50, 64),
    ("65+", 65, i64::MAX),
];

/// Distribution of ages (computed against `as_of`) over fixed bands, in
/// band order. Every band is present, including empty ones.
pub fn age_band_distribution(
    table: &Table,
    dob_column: &str,
    as_of: NaiveDate,
) -> Result<Vec<FrequencyRow>, AggregateError> {
    let index = column_index(table, dob_column)?;
    let mut counts = [0u64; AGE_BANDS.len()];
    let mut total = 0u64;
    for value in table.values(index) {
        let Ok(dob) = NaiveDate::parse_from_str(&value.label(), DATE_FMT) else {
            continue;
        };
        let age = ((as_of - dob).num_days() as f64 / 365.25) as i64;
        if let Some(band) = AGE_BANDS
            .iter()
            .position(|(_, low, high)| (*low..=*high).contains(&age))
        {
            counts[band] += 1;
            total += 1;
        }
    }
    Ok(AGE_BANDS
        .iter()
        .zip(counts)
        .map(|((label, _, _), count)| FrequencyRow {
            label: (*label).to_string(),
            count,
            share_pct: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
        })
        .collect())
}
