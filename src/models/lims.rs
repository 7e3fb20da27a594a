//! Entity records for the Epic/LIMS integration domain. Each struct maps
//! one-to-one onto a sheet of the raw artifact; `RawRecord::COLUMNS` is
//! the authoritative column order.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dataset::table::{RawRecord, Value};

use super::enums::{
    Department, Gender, OrderPriority, OrderStatus, ResultStatus, SpecimenLocation,
    SyncDirection, SyncErrorCode, SyncStatus, SyncType, TubeType,
};

/// Orderable test panels, closed list.
pub const TEST_NAMES: &[&str] = &[
    "CBC",
    "BMP",
    "CMP",
    "Lipid Panel",
    "HbA1c",
    "TSH",
    "Urinalysis",
    "PT/INR",
    "Blood Culture",
    "COVID-19 PCR",
];

/// Reportable result components, closed list.
pub const RESULT_COMPONENTS: &[&str] = &[
    "WBC",
    "RBC",
    "Hemoglobin",
    "Glucose",
    "Creatinine",
    "Sodium",
    "Potassium",
];

/// Measurement units, closed list.
pub const RESULT_UNITS: &[&str] = &["mg/dL", "mmol/L", "g/dL", "10^9/L", "%"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub mrn: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub email: String,
    pub insurance_id: String,
    pub tenant_id: String,
    pub last_sync: NaiveDateTime,
}

impl RawRecord for Patient {
    const COLUMNS: &'static [&'static str] = &[
        "MRN",
        "FirstName",
        "LastName",
        "DOB",
        "Gender",
        "Phone",
        "Email",
        "InsuranceID",
        "TenantID",
        "LastSync",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.mrn),
            Value::text(&self.first_name),
            Value::text(&self.last_name),
            Value::date(self.dob),
            Value::text(self.gender.as_str()),
            Value::text(&self.phone),
            Value::text(&self.email),
            Value::text(&self.insurance_id),
            Value::text(&self.tenant_id),
            Value::datetime(self.last_sync),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabOrder {
    pub order_id: String,
    pub mrn: String,
    pub test_code: String,
    pub test_name: String,
    pub priority: OrderPriority,
    pub status: OrderStatus,
    pub ordered_at: NaiveDateTime,
    /// Collection happens after the order is placed; absent until then.
    pub collected_at: Option<NaiveDateTime>,
    /// Resulting happens after collection; absent until then.
    pub resulted_at: Option<NaiveDateTime>,
    pub provider: String,
    pub department: Department,
}

impl RawRecord for LabOrder {
    const COLUMNS: &'static [&'static str] = &[
        "OrderID",
        "MRN",
        "TestCode",
        "TestName",
        "Priority",
        "Status",
        "OrderDateTime",
        "CollectionDateTime",
        "ResultDateTime",
        "Provider",
        "Department",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.order_id),
            Value::text(&self.mrn),
            Value::text(&self.test_code),
            Value::text(&self.test_name),
            Value::text(self.priority.as_str()),
            Value::text(self.status.as_str()),
            Value::datetime(self.ordered_at),
            Value::opt_datetime(self.collected_at),
            Value::opt_datetime(self.resulted_at),
            Value::text(&self.provider),
            Value::text(self.department.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specimen {
    pub specimen_id: String,
    pub qr_code: String,
    pub order_id: String,
    pub tube_type: TubeType,
    pub volume_ml: f64,
    pub collected_by: String,
    pub location: SpecimenLocation,
    pub temperature_c: f64,
    pub chain_of_custody: u32,
    pub recorded_at: NaiveDateTime,
}

impl RawRecord for Specimen {
    const COLUMNS: &'static [&'static str] = &[
        "SpecimenID",
        "QRCode",
        "OrderID",
        "TubeType",
        "Volume",
        "CollectedBy",
        "CurrentLocation",
        "Temperature",
        "ChainOfCustody",
        "Timestamp",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.specimen_id),
            Value::text(&self.qr_code),
            Value::text(&self.order_id),
            Value::text(self.tube_type.as_str()),
            Value::num(self.volume_ml),
            Value::text(&self.collected_by),
            Value::text(self.location.as_str()),
            Value::num(self.temperature_c),
            Value::num(self.chain_of_custody),
            Value::datetime(self.recorded_at),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub result_id: String,
    pub order_id: String,
    pub component: String,
    pub value: f64,
    pub units: String,
    pub reference_range: String,
    pub status: ResultStatus,
    /// Pathologist sign-off, absent for unverified results.
    pub verified_by: Option<String>,
    pub resulted_at: NaiveDateTime,
    pub critical_notified: bool,
}

impl RawRecord for TestResult {
    const COLUMNS: &'static [&'static str] = &[
        "ResultID",
        "OrderID",
        "TestComponent",
        "Value",
        "Units",
        "ReferenceRange",
        "Status",
        "VerifiedBy",
        "ResultDateTime",
        "CriticalNotified",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.result_id),
            Value::text(&self.order_id),
            Value::text(&self.component),
            Value::num(self.value),
            Value::text(&self.units),
            Value::text(&self.reference_range),
            Value::text(self.status.as_str()),
            Value::opt_text(self.verified_by.as_deref()),
            Value::datetime(self.resulted_at),
            Value::flag(self.critical_notified),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLog {
    pub log_id: String,
    pub sync_type: SyncType,
    pub direction: SyncDirection,
    pub status: SyncStatus,
    pub records_processed: u32,
    pub records_failed: u32,
    pub duration_ms: u32,
    pub error_code: SyncErrorCode,
    pub logged_at: NaiveDateTime,
    pub tenant_id: String,
}

impl RawRecord for SyncLog {
    const COLUMNS: &'static [&'static str] = &[
        "LogID",
        "SyncType",
        "Direction",
        "Status",
        "RecordsProcessed",
        "RecordsFailed",
        "Duration",
        "ErrorCode",
        "Timestamp",
        "TenantID",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.log_id),
            Value::text(self.sync_type.as_str()),
            Value::text(self.direction.as_str()),
            Value::text(self.status.as_str()),
            Value::num(self.records_processed),
            Value::num(self.records_failed),
            Value::num(self.duration_ms),
            Value::text(self.error_code.as_str()),
            Value::datetime(self.logged_at),
            Value::text(&self.tenant_id),
        ]
    }
}

/// One snapshot per day, purely aggregate, no foreign keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub total_orders: u32,
    pub completed_tests: u32,
    pub avg_tat_hours: f64,
    pub critical_values: u32,
    pub specimens_collected: u32,
    pub sync_success: f64,
    pub system_uptime: f64,
    pub api_calls: u32,
    pub error_rate: f64,
}

impl RawRecord for DailyMetric {
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "TotalOrders",
        "CompletedTests",
        "AverageTAT",
        "CriticalValues",
        "SpecimensCollected",
        "SyncSuccess",
        "SystemUptime",
        "APICallsCount",
        "ErrorRate",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::date(self.date),
            Value::num(self.total_orders),
            Value::num(self.completed_tests),
            Value::num(self.avg_tat_hours),
            Value::num(self.critical_values),
            Value::num(self.specimens_collected),
            Value::num(self.sync_success),
            Value::num(self.system_uptime),
            Value::num(self.api_calls),
            Value::num(self.error_rate),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_width_matches_declared_columns() {
        let patient = Patient {
            mrn: "MRN1000000".into(),
            first_name: "ABCDEFGH".into(),
            last_name: "IJKLMNOPQR".into(),
            dob: NaiveDate::from_ymd_opt(1980, 6, 1).unwrap(),
            gender: Gender::Female,
            phone: "555-123-4567".into(),
            email: "patient0@email.com".into(),
            insurance_id: "INS123456".into(),
            tenant_id: "TENANT_001".into(),
            last_sync: NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
        };
        assert_eq!(patient.to_row().len(), Patient::COLUMNS.len());

        let order = LabOrder {
            order_id: "ORD02000000".into(),
            mrn: patient.mrn.clone(),
            test_code: "TC1234".into(),
            test_name: "CBC".into(),
            priority: OrderPriority::Routine,
            status: OrderStatus::Pending,
            ordered_at: patient.last_sync,
            collected_at: None,
            resulted_at: None,
            provider: "DR_101".into(),
            department: Department::Ed,
        };
        assert_eq!(order.to_row().len(), LabOrder::COLUMNS.len());
    }

    #[test]
    fn absent_optionals_flatten_to_missing_cells() {
        let result = TestResult {
            result_id: "RES04000000".into(),
            order_id: "ORD02000000".into(),
            component: "Glucose".into(),
            value: 5.4,
            units: "mmol/L".into(),
            reference_range: "3.9-7.1".into(),
            status: ResultStatus::Normal,
            verified_by: None,
            resulted_at: NaiveDate::from_ymd_opt(2025, 1, 3)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            critical_notified: false,
        };
        let row = result.to_row();
        let verified_col = TestResult::COLUMNS.iter().position(|c| *c == "VerifiedBy").unwrap();
        assert!(row[verified_col].is_missing());
    }

    #[test]
    fn closed_name_lists_are_nonempty() {
        assert_eq!(TEST_NAMES.len(), 10);
        assert_eq!(RESULT_COMPONENTS.len(), 7);
        assert_eq!(RESULT_UNITS.len(), 5);
    }
}
