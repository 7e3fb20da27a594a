//! Synthetic dataset for the NHS records domain. Diagnoses and
//! medications fan out per patient (a bounded Poisson rule by default),
//! producing the one-to-many cardinality skew of a real practice
//! register; every other child table samples the patient pool uniformly.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;

use crate::dataset::table::Table;
use crate::models::{
    Admission, AppointmentKind, AppointmentState, Demographic, Diagnosis, DiagnosisState,
    MedicationState, NhsAppointment, NhsGender, NhsMedication, NhsTestResult, QofMetric,
    AbnormalCode, DMD_MEDICATIONS, NHS_TEST_CODES, QOF_INDICATORS, SNOMED_CONDITIONS,
};

use super::ids;
use super::round_dp;
use super::sampling::{days_back, pick, pick_weighted, sample_parent, FanOut};
use super::GenerateError;

/// Record-count targets and fan-out rules. `diagnosed_patients` and
/// `medicated_patients` select how many patients (from the front of the
/// pool) carry diagnoses and prescriptions; not every registered patient
/// has either.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NhsCounts {
    pub patients: usize,
    pub diagnosed_patients: usize,
    pub medicated_patients: usize,
    pub appointments: usize,
    pub test_results: usize,
    pub admissions: usize,
    pub diagnosis_fanout: FanOut,
    pub medication_fanout: FanOut,
}

impl Default for NhsCounts {
    fn default() -> Self {
        Self {
            patients: 500,
            diagnosed_patients: 300,
            medicated_patients: 350,
            appointments: 2000,
            test_results: 3000,
            admissions: 500,
            diagnosis_fanout: FanOut::PoissonPlusOne(2.0),
            medication_fanout: FanOut::PoissonPlusOne(3.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NhsDataset {
    pub demographics: Vec<Demographic>,
    pub diagnoses: Vec<Diagnosis>,
    pub medications: Vec<NhsMedication>,
    pub appointments: Vec<NhsAppointment>,
    pub test_results: Vec<NhsTestResult>,
    pub admissions: Vec<Admission>,
    pub qof_metrics: Vec<QofMetric>,
}

impl NhsDataset {
    pub const SHEETS: &'static [&'static str] = &[
        "demographics",
        "diagnoses",
        "medications",
        "appointments",
        "test_results",
        "admissions",
        "qof_metrics",
    ];

    pub fn tables(&self) -> Vec<Table> {
        vec![
            Table::from_records(Self::SHEETS[0], &self.demographics),
            Table::from_records(Self::SHEETS[1], &self.diagnoses),
            Table::from_records(Self::SHEETS[2], &self.medications),
            Table::from_records(Self::SHEETS[3], &self.appointments),
            Table::from_records(Self::SHEETS[4], &self.test_results),
            Table::from_records(Self::SHEETS[5], &self.admissions),
            Table::from_records(Self::SHEETS[6], &self.qof_metrics),
        ]
    }

    pub fn total_rows(&self) -> usize {
        self.demographics.len()
            + self.diagnoses.len()
            + self.medications.len()
            + self.appointments.len()
            + self.test_results.len()
            + self.admissions.len()
            + self.qof_metrics.len()
    }
}

pub fn generate(
    counts: &NhsCounts,
    now: NaiveDateTime,
    rng: &mut impl Rng,
) -> Result<NhsDataset, GenerateError> {
    let today = now.date();
    let demographics = gen_demographics(counts.patients, today, rng);

    let diagnoses = gen_fanned(
        &demographics,
        counts.diagnosed_patients,
        counts.diagnosis_fanout,
        "diagnoses",
        rng,
        |rng, patient_id| Diagnosis {
            patient_id,
            snomed_code: pick(rng, SNOMED_CONDITIONS).0.to_string(),
            diagnosed_on: days_back(rng, today, 1825),
            status: pick_weighted(
                rng,
                &[
                    (DiagnosisState::Active, 0.7),
                    (DiagnosisState::Resolved, 0.2),
                    (DiagnosisState::Inactive, 0.1),
                ],
            ),
            severity_score: round_dp(rng.gen_range(0.1..=10.0), 2),
            confidence: round_dp(rng.gen_range(0.6..=1.0), 2),
        },
    )?;

    let medications = gen_fanned(
        &demographics,
        counts.medicated_patients,
        counts.medication_fanout,
        "medications",
        rng,
        |rng, patient_id| NhsMedication {
            patient_id,
            dmd_code: pick(rng, DMD_MEDICATIONS).0.to_string(),
            started_on: days_back(rng, today, 730),
            daily_dose: rng.gen_range(1..=4),
            quantity: rng.gen_range(28..=84),
            status: pick(rng, MedicationState::ALL),
            adherence_score: round_dp(rng.gen_range(0.3..=1.0), 2),
        },
    )?;

    let appointments = gen_appointments(counts.appointments, &demographics, today, rng)?;
    let test_results = gen_test_results(counts.test_results, &demographics, today, rng)?;
    let admissions = gen_admissions(counts.admissions, &demographics, today, rng)?;
    let qof_metrics = gen_qof_metrics(rng);

    Ok(NhsDataset {
        demographics,
        diagnoses,
        medications,
        appointments,
        test_results,
        admissions,
        qof_metrics,
    })
}

fn gen_demographics(count: usize, today: NaiveDate, rng: &mut impl Rng) -> Vec<Demographic> {
    let epoch = NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or(today);
    let patient_ids = ids::unique_numeric(rng, "NHS", 1_000_000_000..=9_999_999_999, count);
    patient_ids
        .into_iter()
        .map(|patient_id| Demographic {
            patient_id,
            nhs_number: rng.gen_range(1_000_000_000..=9_999_999_999),
            dob: epoch + Duration::days(rng.gen_range(0..=30_000)),
            gender: pick_weighted(
                rng,
                &[
                    (NhsGender::Male, 0.48),
                    (NhsGender::Female, 0.48),
                    (NhsGender::NotSpecified, 0.04),
                ],
            ),
            ethnicity_code: rng.gen_range(1..=18),
            gp_practice_code: ids::alnum_code(rng, 6),
            lsoa_code: format!("E0{}", rng.gen_range(1_000_000..=9_999_999)),
            imd_decile: rng.gen_range(1..=10),
        })
        .collect()
}

/// Walks the first `parent_take` patients and emits `fanout` children per
/// patient. A non-zero take against an empty pool is fatal before any
/// record is built.
fn gen_fanned<T, R: Rng>(
    demographics: &[Demographic],
    parent_take: usize,
    fanout: FanOut,
    child: &'static str,
    rng: &mut R,
    mut build: impl FnMut(&mut R, String) -> T,
) -> Result<Vec<T>, GenerateError> {
    if parent_take > 0 && demographics.is_empty() {
        return Err(GenerateError::EmptyParentPool {
            parent: "demographics",
            child,
        });
    }

    let mut records = Vec::new();
    for patient in demographics.iter().take(parent_take) {
        let children = fanout.sample(rng)?;
        for _ in 0..children {
            records.push(build(rng, patient.patient_id.clone()));
        }
    }
    Ok(records)
}

fn gen_appointments(
    count: usize,
    demographics: &[Demographic],
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Result<Vec<NhsAppointment>, GenerateError> {
    (0..count)
        .map(|_| {
            let patient = sample_parent(rng, demographics, "demographics", "appointments")?;
            Ok(NhsAppointment {
                patient_id: patient.patient_id.clone(),
                scheduled_for: today + Duration::days(rng.gen_range(-365..=90)),
                specialty_code: rng.gen_range(100..=899),
                kind: pick(rng, AppointmentKind::ALL),
                status: pick(rng, AppointmentState::ALL),
                wait_days: rng.gen_range(0..=179),
                duration_mins: rng.gen_range(5..=59),
            })
        })
        .collect()
}

fn gen_test_results(
    count: usize,
    demographics: &[Demographic],
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Result<Vec<NhsTestResult>, GenerateError> {
    (0..count)
        .map(|_| {
            let patient = sample_parent(rng, demographics, "demographics", "test_results")?;
            Ok(NhsTestResult {
                patient_id: patient.patient_id.clone(),
                test_code: pick(rng, NHS_TEST_CODES).to_string(),
                value: round_dp(rng.gen_range(0.5..=200.0), 2),
                tested_on: days_back(rng, today, 365),
                abnormal_flag: pick(rng, AbnormalCode::ALL),
                reference_min: round_dp(rng.gen_range(0.0..=50.0), 1),
                reference_max: round_dp(rng.gen_range(50.0..=200.0), 1),
                unit_code: rng.gen_range(1..=5),
            })
        })
        .collect()
}

fn gen_admissions(
    count: usize,
    demographics: &[Demographic],
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Result<Vec<Admission>, GenerateError> {
    (0..count)
        .map(|_| {
            let patient = sample_parent(rng, demographics, "demographics", "admissions")?;
            let admitted_on = days_back(rng, today, 730);
            let los_days = rng.gen_range(1..=30);
            Ok(Admission {
                patient_id: patient.patient_id.clone(),
                admitted_on,
                discharged_on: admitted_on + Duration::days(i64::from(los_days)),
                ward_code: format!("{}{}", ids::upper_code(rng, 3), rng.gen_range(1..=9)),
                admission_method: rng.gen_range(11..=30),
                discharge_destination: rng.gen_range(19..=98),
                primary_diagnosis: pick(rng, SNOMED_CONDITIONS).0.to_string(),
                los_days,
                readmission: rng.gen_bool(0.15),
            })
        })
        .collect()
}

fn gen_qof_metrics(rng: &mut impl Rng) -> Vec<QofMetric> {
    QOF_INDICATORS
        .iter()
        .map(|indicator| QofMetric {
            indicator_code: (*indicator).to_string(),
            numerator: rng.gen_range(100..=399),
            denominator: rng.gen_range(400..=499),
            achievement_points: round_dp(rng.gen_range(0.0..=100.0), 1),
            target_pct: round_dp(rng.gen_range(70.0..=95.0), 1),
            exception_pct: round_dp(rng.gen_range(0.0..=15.0), 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn small_counts() -> NhsCounts {
        NhsCounts {
            patients: 25,
            diagnosed_patients: 15,
            medicated_patients: 20,
            appointments: 80,
            test_results: 100,
            admissions: 30,
            ..NhsCounts::default()
        }
    }

    #[test]
    fn children_reference_generated_patients_only() {
        let mut rng = StdRng::seed_from_u64(21);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();
        let ids: HashSet<_> = data
            .demographics
            .iter()
            .map(|d| d.patient_id.as_str())
            .collect();
        assert!(data.diagnoses.iter().all(|d| ids.contains(d.patient_id.as_str())));
        assert!(data.medications.iter().all(|m| ids.contains(m.patient_id.as_str())));
        assert!(data.appointments.iter().all(|a| ids.contains(a.patient_id.as_str())));
        assert!(data.admissions.iter().all(|a| ids.contains(a.patient_id.as_str())));
    }

    #[test]
    fn fixed_fan_out_two_yields_exactly_two_children_per_patient() {
        let counts = NhsCounts {
            patients: 10,
            diagnosed_patients: 10,
            diagnosis_fanout: FanOut::Fixed(2),
            medicated_patients: 0,
            appointments: 0,
            test_results: 0,
            admissions: 0,
            ..NhsCounts::default()
        };
        let mut rng = StdRng::seed_from_u64(22);
        let data = generate(&counts, fixed_now(), &mut rng).unwrap();
        assert_eq!(data.diagnoses.len(), 20);

        let mut per_patient: HashMap<&str, u32> = HashMap::new();
        for diagnosis in &data.diagnoses {
            *per_patient.entry(diagnosis.patient_id.as_str()).or_default() += 1;
        }
        assert_eq!(per_patient.len(), 10);
        for patient in &data.demographics {
            assert_eq!(per_patient.get(patient.patient_id.as_str()), Some(&2));
        }

        // The per-patient aggregation over the flattened table agrees:
        // every patient id appears with a count of exactly two, none
        // missing, none zero.
        let table = Table::from_records("diagnoses", &data.diagnoses);
        let counts = crate::aggregate::frequency(&table, "patient_id").unwrap();
        assert_eq!(counts.len(), 10);
        for row in &counts {
            assert_eq!(row.count, 2, "patient {} had {}", row.label, row.count);
        }
    }

    #[test]
    fn discharge_never_precedes_admission() {
        let mut rng = StdRng::seed_from_u64(23);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();
        for admission in &data.admissions {
            assert!(admission.discharged_on >= admission.admitted_on);
            assert_eq!(
                admission.discharged_on - admission.admitted_on,
                Duration::days(i64::from(admission.los_days))
            );
        }
    }

    #[test]
    fn coded_and_ranged_fields_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(24);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();
        for d in &data.demographics {
            assert!((1..=10).contains(&d.imd_decile));
            assert!((1..=18).contains(&d.ethnicity_code));
            assert!(d.patient_id.starts_with("NHS"));
        }
        for m in &data.medications {
            assert!((0.3..=1.0).contains(&m.adherence_score));
            assert!((1..=4).contains(&m.daily_dose));
        }
        for q in &data.qof_metrics {
            assert!(q.numerator < q.denominator);
            assert!((0.0..=100.0).contains(&q.achievement_points));
        }
    }

    #[test]
    fn qof_snapshot_has_one_row_per_indicator() {
        let mut rng = StdRng::seed_from_u64(25);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();
        let codes: Vec<_> = data
            .qof_metrics
            .iter()
            .map(|q| q.indicator_code.as_str())
            .collect();
        assert_eq!(codes, QOF_INDICATORS);
    }

    #[test]
    fn appointments_without_patients_is_a_config_error() {
        let counts = NhsCounts {
            patients: 0,
            diagnosed_patients: 0,
            medicated_patients: 0,
            appointments: 10,
            test_results: 0,
            admissions: 0,
            ..NhsCounts::default()
        };
        let mut rng = StdRng::seed_from_u64(26);
        assert!(matches!(
            generate(&counts, fixed_now(), &mut rng),
            Err(GenerateError::EmptyParentPool {
                parent: "demographics",
                child: "appointments"
            })
        ));
    }

    #[test]
    fn same_seed_reproduces_the_dataset() {
        let a = generate(&small_counts(), fixed_now(), &mut StdRng::seed_from_u64(4)).unwrap();
        let b = generate(&small_counts(), fixed_now(), &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(a, b);
    }
}
