//! Rate and ratio KPIs compared against fixed targets. A zero
//! denominator fails loudly and names the metric; no KPI ever renders a
//! silent placeholder.

use serde::Serialize;

use super::AggregateError;

/// Percentage rate `numerator / denominator * 100`.
pub fn rate_pct(metric: &str, numerator: u64, denominator: u64) -> Result<f64, AggregateError> {
    if denominator == 0 {
        return Err(AggregateError::EmptyDenominator {
            metric: metric.into(),
        });
    }
    Ok(numerator as f64 * 100.0 / denominator as f64)
}

/// Qualitative grade against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KpiGrade {
    Excellent,
    OnTrack,
    Behind,
}

impl KpiGrade {
    pub fn from_achievement(pct: f64) -> Self {
        if pct >= 105.0 {
            Self::Excellent
        } else if pct >= 95.0 {
            Self::OnTrack
        } else {
            Self::Behind
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::OnTrack => "On Track",
            Self::Behind => "Behind Target",
        }
    }
}

/// One executive-summary KPI line. Informational rows carry no target
/// and no grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRow {
    pub metric: String,
    pub value: String,
    pub target: Option<String>,
    pub achievement_pct: Option<f64>,
    pub grade: Option<KpiGrade>,
}

impl KpiRow {
    /// Higher measured value is better (volumes, rates).
    pub fn higher(metric: &str, value_display: String, value: f64, target: f64) -> Self {
        let achievement = value / target * 100.0;
        Self {
            metric: metric.into(),
            value: value_display,
            target: Some(display_target(target)),
            achievement_pct: Some(achievement),
            grade: Some(KpiGrade::from_achievement(achievement)),
        }
    }

    /// Lower measured value is better (turnaround times). A measured
    /// zero trivially meets the target.
    pub fn lower(metric: &str, value_display: String, value: f64, target: f64) -> Self {
        let achievement = if value > 0.0 {
            target / value * 100.0
        } else {
            100.0
        };
        Self {
            metric: metric.into(),
            value: value_display,
            target: Some(display_target(target)),
            achievement_pct: Some(achievement),
            grade: Some(KpiGrade::from_achievement(achievement)),
        }
    }

    /// Tracked for visibility only, no target.
    pub fn informational(metric: &str, value_display: String) -> Self {
        Self {
            metric: metric.into(),
            value: value_display,
            target: None,
            achievement_pct: None,
            grade: None,
        }
    }
}

/// Pass/fail check against a target, the form the NHS summary uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetCheck {
    pub metric: String,
    pub value: String,
    pub target: String,
    pub met: bool,
}

impl TargetCheck {
    pub fn at_least(metric: &str, value_display: String, value: f64, target: f64) -> Self {
        Self {
            metric: metric.into(),
            value: value_display,
            target: display_target(target),
            met: value >= target,
        }
    }

    pub fn at_most(metric: &str, value_display: String, value: f64, target: f64) -> Self {
        Self {
            metric: metric.into(),
            value: value_display,
            target: format!("< {}", display_target(target)),
            met: value < target,
        }
    }
}

fn display_target(target: f64) -> String {
    if target.fract() == 0.0 {
        format!("{}", target as i64)
    } else {
        format!("{target}")
    }
}
