//! Constant-level run configuration: record-count targets, the optional
//! RNG seed, the reference instant, KPI thresholds and artifact paths.
//! Fixing both seed and reference instant reproduces a run exactly.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::generate::{LimsCounts, NhsCounts};

/// Application-level constants
pub const APP_NAME: &str = "Medforge";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info".into()
}

/// KPI targets for the LIMS executive summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimsKpiTargets {
    pub active_patients: f64,
    pub lab_orders: f64,
    pub resulted_orders: f64,
    pub avg_tat_hours: f64,
    pub sync_success_pct: f64,
}

impl Default for LimsKpiTargets {
    fn default() -> Self {
        Self {
            active_patients: 450.0,
            lab_orders: 1200.0,
            resulted_orders: 1000.0,
            avg_tat_hours: 6.0,
            sync_success_pct: 95.0,
        }
    }
}

/// KPI targets for the NHS executive summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NhsKpiTargets {
    pub registered_patients: f64,
    pub active_patients: f64,
    pub appointments: f64,
    pub completion_pct: f64,
    pub max_wait_days: f64,
    pub max_readmission_pct: f64,
}

impl Default for NhsKpiTargets {
    fn default() -> Self {
        Self {
            registered_patients: 500.0,
            active_patients: 400.0,
            appointments: 1800.0,
            completion_pct: 85.0,
            max_wait_days: 60.0,
            max_readmission_pct: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Fixing the seed makes the dataset reproducible; `None` seeds from
    /// entropy.
    pub seed: Option<u64>,
    /// Reference instant for every "now minus offset" timestamp.
    pub now: NaiveDateTime,
    /// Artifact directory, relative to the invocation context.
    pub output_dir: PathBuf,
    pub lims: LimsCounts,
    pub nhs: NhsCounts,
    pub lims_targets: LimsKpiTargets,
    pub nhs_targets: NhsKpiTargets,
}

impl RunConfig {
    /// Production defaults: full record counts, entropy seeding,
    /// artifacts under `reports/`.
    pub fn standard(now: NaiveDateTime) -> Self {
        Self {
            seed: None,
            now,
            output_dir: PathBuf::from("reports"),
            lims: LimsCounts::default(),
            nhs: NhsCounts::default(),
            lims_targets: LimsKpiTargets::default(),
            nhs_targets: NhsKpiTargets::default(),
        }
    }

    pub fn lims_raw_path(&self) -> PathBuf {
        self.output_dir.join("lims-raw.xlsx")
    }

    pub fn lims_report_path(&self) -> PathBuf {
        self.output_dir.join("lims-report.xlsx")
    }

    pub fn nhs_raw_path(&self) -> PathBuf {
        self.output_dir.join("nhs-raw.xlsx")
    }

    pub fn nhs_report_path(&self) -> PathBuf {
        self.output_dir.join("nhs-report.xlsx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn artifact_paths_live_under_the_output_dir() {
        let config = RunConfig::standard(now());
        assert!(config.lims_raw_path().starts_with("reports"));
        assert!(config.nhs_report_path().ends_with("nhs-report.xlsx"));
    }

    #[test]
    fn standard_config_uses_full_counts() {
        let config = RunConfig::standard(now());
        assert_eq!(config.lims.patients, 500);
        assert_eq!(config.nhs.appointments, 2000);
        assert!(config.seed.is_none());
    }

    #[test]
    fn targets_are_positive() {
        let lims = LimsKpiTargets::default();
        let nhs = NhsKpiTargets::default();
        assert!(lims.avg_tat_hours > 0.0);
        assert!(lims.sync_success_pct > 0.0);
        assert!(nhs.completion_pct > 0.0);
        assert!(nhs.max_wait_days > 0.0);
    }

    #[test]
    fn app_name_is_medforge() {
        assert_eq!(APP_NAME, "Medforge");
    }
}
