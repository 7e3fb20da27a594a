//! Entity records for the NHS national-health-record domain. Coded
//! fields serialize as their numeric wire codes, matching the form of a
//! real national extract; the report layer maps codes back to labels.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::table::{RawRecord, Value};

use super::enums::{
    AbnormalCode, AppointmentKind, AppointmentState, DiagnosisState, MedicationState, NhsGender,
};

/// SNOMED CT condition codes with display names. Fictional reference
/// data standing in for a terminology service.
pub const SNOMED_CONDITIONS: &[(&str, &str)] = &[
    ("73211009", "Diabetes mellitus"),
    ("38341003", "Hypertension"),
    ("195967001", "Asthma"),
    ("13645005", "COPD"),
    ("53741008", "Coronary heart disease"),
    ("84114007", "Heart failure"),
    ("396275006", "Osteoarthritis"),
    ("35489007", "Depression"),
    ("197480006", "Anxiety disorder"),
    ("49436004", "Atrial fibrillation"),
];

/// DM&D medication codes with display names.
pub const DMD_MEDICATIONS: &[(&str, &str)] = &[
    ("318185001", "Metformin 500mg tablets"),
    ("319773006", "Amlodipine 5mg tablets"),
    ("376584008", "Salbutamol 100mcg inhaler"),
    ("374804007", "Simvastatin 40mg tablets"),
    ("391761004", "Ramipril 5mg capsules"),
    ("322236009", "Paracetamol 500mg tablets"),
    ("387517004", "Omeprazole 20mg capsules"),
    ("387458008", "Aspirin 75mg tablets"),
    ("386845007", "Levothyroxine 100mcg tablets"),
    ("387525002", "Furosemide 40mg tablets"),
];

/// Pathology test codes, closed list.
pub const NHS_TEST_CODES: &[&str] = &[
    "HBA1C", "CHOL", "BP_SYS", "BP_DIA", "BMI", "EGFR", "CRP", "TSH", "B12", "VITD",
];

/// QOF indicator codes, one metric snapshot per indicator.
pub const QOF_INDICATORS: &[&str] = &[
    "DM001", "DM002", "CHD001", "HYP001", "AST001", "MH001", "CAN001", "COPD001", "AF001",
    "PAL001",
];

pub fn condition_name(code: &str) -> Option<&'static str> {
    SNOMED_CONDITIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn medication_name(code: &str) -> Option<&'static str> {
    DMD_MEDICATIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographic {
    pub patient_id: String,
    pub nhs_number: u64,
    pub dob: NaiveDate,
    pub gender: NhsGender,
    pub ethnicity_code: u8,
    pub gp_practice_code: String,
    pub lsoa_code: String,
    pub imd_decile: u8,
}

impl RawRecord for Demographic {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "nhs_number",
        "dob",
        "gender_code",
        "ethnicity_code",
        "gp_practice_code",
        "lsoa_code",
        "imd_decile",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.patient_id),
            Value::num(self.nhs_number as f64),
            Value::date(self.dob),
            Value::num(self.gender.code()),
            Value::num(self.ethnicity_code),
            Value::text(&self.gp_practice_code),
            Value::text(&self.lsoa_code),
            Value::num(self.imd_decile),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub patient_id: String,
    pub snomed_code: String,
    pub diagnosed_on: NaiveDate,
    pub status: DiagnosisState,
    pub severity_score: f64,
    pub confidence: f64,
}

impl RawRecord for Diagnosis {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "snomed_code",
        "diagnosis_date",
        "status_code",
        "severity_score",
        "confidence_level",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.patient_id),
            Value::text(&self.snomed_code),
            Value::date(self.diagnosed_on),
            Value::num(self.status.code()),
            Value::num(self.severity_score),
            Value::num(self.confidence),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NhsMedication {
    pub patient_id: String,
    pub dmd_code: String,
    pub started_on: NaiveDate,
    pub daily_dose: u8,
    pub quantity: u8,
    pub status: MedicationState,
    pub adherence_score: f64,
}

impl RawRecord for NhsMedication {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "dm_d_code",
        "start_date",
        "daily_dose",
        "quantity",
        "status",
        "adherence_score",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.patient_id),
            Value::text(&self.dmd_code),
            Value::date(self.started_on),
            Value::num(self.daily_dose),
            Value::num(self.quantity),
            Value::num(self.status.code()),
            Value::num(self.adherence_score),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NhsAppointment {
    pub patient_id: String,
    /// May legitimately lie in the future (booked ahead).
    pub scheduled_for: NaiveDate,
    pub specialty_code: u16,
    pub kind: AppointmentKind,
    pub status: AppointmentState,
    pub wait_days: u16,
    pub duration_mins: u8,
}

impl RawRecord for NhsAppointment {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "appointment_date",
        "specialty_code",
        "appointment_type",
        "status",
        "wait_time_days",
        "consultation_duration",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.patient_id),
            Value::date(self.scheduled_for),
            Value::num(self.specialty_code),
            Value::num(self.kind.code()),
            Value::num(self.status.code()),
            Value::num(self.wait_days),
            Value::num(self.duration_mins),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NhsTestResult {
    pub patient_id: String,
    pub test_code: String,
    pub value: f64,
    pub tested_on: NaiveDate,
    pub abnormal_flag: AbnormalCode,
    pub reference_min: f64,
    pub reference_max: f64,
    pub unit_code: u8,
}

impl RawRecord for NhsTestResult {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "test_code",
        "result_value",
        "test_date",
        "abnormal_flag",
        "reference_min",
        "reference_max",
        "unit_code",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.patient_id),
            Value::text(&self.test_code),
            Value::num(self.value),
            Value::date(self.tested_on),
            Value::num(self.abnormal_flag.code()),
            Value::num(self.reference_min),
            Value::num(self.reference_max),
            Value::num(self.unit_code),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    pub patient_id: String,
    pub admitted_on: NaiveDate,
    /// Always admission date + length of stay.
    pub discharged_on: NaiveDate,
    pub ward_code: String,
    pub admission_method: u8,
    pub discharge_destination: u8,
    pub primary_diagnosis: String,
    pub los_days: u16,
    pub readmission: bool,
}

impl RawRecord for Admission {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "admission_date",
        "discharge_date",
        "ward_code",
        "admission_method",
        "discharge_destination",
        "primary_diagnosis",
        "los_days",
        "readmission_flag",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.patient_id),
            Value::date(self.admitted_on),
            Value::date(self.discharged_on),
            Value::text(&self.ward_code),
            Value::num(self.admission_method),
            Value::num(self.discharge_destination),
            Value::text(&self.primary_diagnosis),
            Value::num(self.los_days),
            Value::num(u8::from(self.readmission)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QofMetric {
    pub indicator_code: String,
    pub numerator: u32,
    pub denominator: u32,
    pub achievement_points: f64,
    pub target_pct: f64,
    pub exception_pct: f64,
}

impl RawRecord for QofMetric {
    const COLUMNS: &'static [&'static str] = &[
        "indicator_code",
        "numerator",
        "denominator",
        "achievement_points",
        "target_percentage",
        "exception_reporting",
    ];

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::text(&self.indicator_code),
            Value::num(self.numerator),
            Value::num(self.denominator),
            Value::num(self.achievement_points),
            Value::num(self.target_pct),
            Value::num(self.exception_pct),
        ]
    }
}
