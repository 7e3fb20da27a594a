//! Generic tabular model shared by the raw writer, the raw reader and the
//! aggregation engine. A `Table` is what survives the re-ingestion
//! boundary: entity structs are flattened to rows on write and come back
//! as untyped cells on read.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Cell serialization format for timestamps in the raw artifact.
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
/// Cell serialization format for calendar dates in the raw artifact.
pub const DATE_FMT: &str = "%Y-%m-%d";

/// One raw cell. Absent optional fields are `Missing` and round-trip as
/// genuinely empty cells, never as a sentinel string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Text(String),
    Number(f64),
    Missing,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn num(n: impl Into<f64>) -> Self {
        Self::Number(n.into())
    }

    pub fn date(d: NaiveDate) -> Self {
        Self::Text(d.format(DATE_FMT).to_string())
    }

    pub fn datetime(t: NaiveDateTime) -> Self {
        Self::Text(t.format(DATETIME_FMT).to_string())
    }

    pub fn opt_datetime(t: Option<NaiveDateTime>) -> Self {
        t.map_or(Self::Missing, Self::datetime)
    }

    pub fn opt_text(s: Option<&str>) -> Self {
        s.map_or(Self::Missing, Self::text)
    }

    pub fn flag(b: bool) -> Self {
        Self::Text(if b { "TRUE" } else { "FALSE" }.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Display string used for grouping labels and column sizing.
    /// Whole numbers render without a trailing `.0` so numeric codes
    /// group under the same label they were written with.
    pub fn label(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => display_number(*n),
            Self::Missing => String::new(),
        }
    }
}

pub(crate) fn display_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e12 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Declares how an entity record flattens into a raw sheet row. Column
/// order is the struct's declared order and is preserved verbatim by the
/// writer.
pub trait RawRecord {
    const COLUMNS: &'static [&'static str];

    fn to_row(&self) -> Vec<Value>;
}

/// An ordered sequence of uniformly shaped rows with a stable column
/// schema. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn from_records<R: RawRecord>(name: &str, records: &[R]) -> Self {
        Self {
            name: name.into(),
            columns: R::COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            rows: records.iter().map(RawRecord::to_row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, in row order.
    pub fn values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        id: String,
        score: f64,
        note: Option<String>,
    }

    impl RawRecord for Probe {
        const COLUMNS: &'static [&'static str] = &["id", "score", "note"];

        fn to_row(&self) -> Vec<Value> {
            vec![
                Value::text(&self.id),
                Value::num(self.score),
                Value::opt_text(self.note.as_deref()),
            ]
        }
    }

    #[test]
    fn from_records_preserves_column_order_and_rows() {
        let records = vec![
            Probe { id: "A1".into(), score: 2.0, note: Some("ok".into()) },
            Probe { id: "A2".into(), score: 3.5, note: None },
        ];
        let table = Table::from_records("probes", &records);
        assert_eq!(table.columns, vec!["id", "score", "note"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][2], Value::Missing);
    }

    #[test]
    fn whole_numbers_label_without_decimal_point() {
        assert_eq!(Value::num(5.0).label(), "5");
        assert_eq!(Value::num(5.5).label(), "5.5");
        assert_eq!(Value::num(-3.0).label(), "-3");
    }

    #[test]
    fn missing_label_is_empty() {
        assert_eq!(Value::Missing.label(), "");
        assert!(Value::opt_datetime(None).is_missing());
    }

    #[test]
    fn datetime_round_trips_through_fixed_format() {
        let t = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap();
        assert_eq!(Value::datetime(t).label(), "2025-03-14 09:26:53");
        let parsed = NaiveDateTime::parse_from_str("2025-03-14 09:26:53", DATETIME_FMT).unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn column_lookup() {
        let table = Table::from_records::<Probe>("probes", &[]);
        assert_eq!(table.column("score"), Some(1));
        assert_eq!(table.column("absent"), None);
        assert!(table.is_empty());
    }
}
