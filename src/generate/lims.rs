//! Synthetic dataset for the Epic/LIMS integration domain. Parent tables
//! are generated first; every child samples identifiers from the
//! already-generated parent pool, so referential integrity holds by
//! construction.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use crate::dataset::table::Table;
use crate::models::{
    DailyMetric, Department, Gender, LabOrder, OrderPriority, OrderStatus, Patient, ResultStatus,
    Specimen, SpecimenLocation, SyncDirection, SyncErrorCode, SyncLog, SyncStatus, SyncType,
    TestResult, TubeType, RESULT_COMPONENTS, RESULT_UNITS, TEST_NAMES,
};

use super::ids;
use super::round_dp;
use super::sampling::{hours_after, hours_back, minutes_back, pick, sample_parent};
use super::GenerateError;

/// Record-count targets per entity. Zero is valid and yields an empty
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimsCounts {
    pub patients: usize,
    pub orders: usize,
    pub specimens: usize,
    pub results: usize,
    pub sync_logs: usize,
    pub metric_days: usize,
}

impl Default for LimsCounts {
    fn default() -> Self {
        Self {
            patients: 500,
            orders: 1500,
            specimens: 2000,
            results: 3000,
            sync_logs: 5000,
            metric_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimsDataset {
    pub patients: Vec<Patient>,
    pub orders: Vec<LabOrder>,
    pub specimens: Vec<Specimen>,
    pub results: Vec<TestResult>,
    pub sync_logs: Vec<SyncLog>,
    pub metrics: Vec<DailyMetric>,
}

impl LimsDataset {
    pub const SHEETS: &'static [&'static str] = &[
        "RAW_PATIENTS",
        "RAW_ORDERS",
        "RAW_SPECIMENS",
        "RAW_RESULTS",
        "SYNC_LOGS",
        "PERF_METRICS",
    ];

    pub fn tables(&self) -> Vec<Table> {
        vec![
            Table::from_records(Self::SHEETS[0], &self.patients),
            Table::from_records(Self::SHEETS[1], &self.orders),
            Table::from_records(Self::SHEETS[2], &self.specimens),
            Table::from_records(Self::SHEETS[3], &self.results),
            Table::from_records(Self::SHEETS[4], &self.sync_logs),
            Table::from_records(Self::SHEETS[5], &self.metrics),
        ]
    }

    pub fn total_rows(&self) -> usize {
        self.patients.len()
            + self.orders.len()
            + self.specimens.len()
            + self.results.len()
            + self.sync_logs.len()
            + self.metrics.len()
    }
}

pub fn generate(
    counts: &LimsCounts,
    now: NaiveDateTime,
    rng: &mut impl Rng,
) -> Result<LimsDataset, GenerateError> {
    let patients = gen_patients(counts.patients, now, rng);
    let orders = gen_orders(counts.orders, &patients, now, rng)?;
    let specimens = gen_specimens(counts.specimens, &orders, rng)?;
    let results = gen_results(counts.results, &orders, rng)?;
    let sync_logs = gen_sync_logs(counts.sync_logs, now, rng);
    let metrics = gen_metrics(counts.metric_days, now, rng);

    Ok(LimsDataset {
        patients,
        orders,
        specimens,
        results,
        sync_logs,
        metrics,
    })
}

fn gen_patients(count: usize, now: NaiveDateTime, rng: &mut impl Rng) -> Vec<Patient> {
    let mrns = ids::sequential("MRN", 1_000_000, 7, count);
    mrns.into_iter()
        .enumerate()
        .map(|(i, mrn)| Patient {
            mrn,
            first_name: ids::upper_code(rng, 8),
            last_name: ids::upper_code(rng, 10),
            dob: (now - Duration::days(rng.gen_range(365..=30_000))).date(),
            gender: pick(rng, Gender::ALL),
            phone: format!(
                "{}-{}-{}",
                rng.gen_range(100..=999),
                rng.gen_range(100..=999),
                rng.gen_range(1000..=9999)
            ),
            email: format!("patient{i}@email.com"),
            insurance_id: format!("INS{}", rng.gen_range(100_000..=999_999)),
            tenant_id: format!("TENANT_{:03}", rng.gen_range(1..=5)),
            last_sync: minutes_back(rng, now, 10_080),
        })
        .collect()
}

fn gen_orders(
    count: usize,
    patients: &[Patient],
    now: NaiveDateTime,
    rng: &mut impl Rng,
) -> Result<Vec<LabOrder>, GenerateError> {
    let order_ids = ids::sequential("ORD", 2_000_000, 8, count);
    order_ids
        .into_iter()
        .map(|order_id| {
            let patient = sample_parent(rng, patients, "patients", "orders")?;
            let ordered_at = hours_back(rng, now, 90 * 24);
            let collected_at = rng
                .gen_bool(0.8)
                .then(|| hours_after(rng, ordered_at, 1, 24));
            let resulted_at = rng
                .gen_bool(0.7)
                .then(|| hours_after(rng, collected_at.unwrap_or(ordered_at), 24, 72));
            Ok(LabOrder {
                order_id,
                mrn: patient.mrn.clone(),
                test_code: format!("TC{}", rng.gen_range(1000..=9999)),
                test_name: pick(rng, TEST_NAMES).to_string(),
                priority: pick(rng, OrderPriority::ALL),
                status: pick(rng, OrderStatus::ALL),
                ordered_at,
                collected_at,
                resulted_at,
                provider: format!("DR_{}", rng.gen_range(100..=999)),
                department: pick(rng, Department::ALL),
            })
        })
        .collect()
}

fn gen_specimens(
    count: usize,
    orders: &[LabOrder],
    rng: &mut impl Rng,
) -> Result<Vec<Specimen>, GenerateError> {
    let specimen_ids = ids::sequential("SPEC", 3_000_000, 8, count);
    specimen_ids
        .into_iter()
        .map(|specimen_id| {
            let order = sample_parent(rng, orders, "orders", "specimens")?;
            Ok(Specimen {
                specimen_id,
                qr_code: ids::alnum_code(rng, 12),
                order_id: order.order_id.clone(),
                tube_type: pick(rng, TubeType::ALL),
                volume_ml: round_dp(rng.gen_range(1.0..=10.0), 1),
                collected_by: format!("TECH_{}", rng.gen_range(100..=999)),
                location: pick(rng, SpecimenLocation::ALL),
                temperature_c: round_dp(rng.gen_range(2.0..=8.0), 1),
                chain_of_custody: rng.gen_range(1..=10),
                recorded_at: hours_after(rng, order.ordered_at, 0, 48),
            })
        })
        .collect()
}

fn gen_results(
    count: usize,
    orders: &[LabOrder],
    rng: &mut impl Rng,
) -> Result<Vec<TestResult>, GenerateError> {
    let result_ids = ids::sequential("RES", 4_000_000, 8, count);
    result_ids
        .into_iter()
        .map(|result_id| {
            let order = sample_parent(rng, orders, "orders", "results")?;
            let status = pick(rng, ResultStatus::ALL);
            let reference_low = round_dp(rng.gen_range(0.0..=50.0), 1);
            let reference_high = round_dp(rng.gen_range(51.0..=200.0), 1);
            Ok(TestResult {
                result_id,
                order_id: order.order_id.clone(),
                component: pick(rng, RESULT_COMPONENTS).to_string(),
                value: round_dp(rng.gen_range(0.5..=200.0), 2),
                units: pick(rng, RESULT_UNITS).to_string(),
                reference_range: format!("{reference_low}-{reference_high}"),
                status,
                verified_by: rng
                    .gen_bool(0.7)
                    .then(|| format!("PATH_{}", rng.gen_range(100..=999))),
                resulted_at: hours_after(rng, order.ordered_at, 24, 72),
                critical_notified: status == ResultStatus::Critical && rng.gen_bool(0.5),
            })
        })
        .collect()
}

fn gen_sync_logs(count: usize, now: NaiveDateTime, rng: &mut impl Rng) -> Vec<SyncLog> {
    let log_ids = ids::sequential("LOG", 5_000_000, 8, count);
    log_ids
        .into_iter()
        .map(|log_id| {
            let status = pick(rng, SyncStatus::ALL);
            let error_code = if status == SyncStatus::Success {
                SyncErrorCode::None
            } else {
                pick(rng, &SyncErrorCode::ALL[1..])
            };
            SyncLog {
                log_id,
                sync_type: pick(rng, SyncType::ALL),
                direction: pick(rng, SyncDirection::ALL),
                status,
                records_processed: rng.gen_range(0..=1000),
                records_failed: rng.gen_range(0..=50),
                duration_ms: rng.gen_range(100..=10_000),
                error_code,
                logged_at: minutes_back(rng, now, 10_080),
                tenant_id: format!("TENANT_{:03}", rng.gen_range(1..=5)),
            }
        })
        .collect()
}

fn gen_metrics(days: usize, now: NaiveDateTime, rng: &mut impl Rng) -> Vec<DailyMetric> {
    let base = now.date() - Duration::days(days as i64);
    (0..days)
        .map(|day| DailyMetric {
            date: base + Duration::days(day as i64),
            total_orders: rng.gen_range(200..=500),
            completed_tests: rng.gen_range(180..=450),
            avg_tat_hours: round_dp(rng.gen_range(2.0..=8.0), 2),
            critical_values: rng.gen_range(0..=15),
            specimens_collected: rng.gen_range(300..=600),
            sync_success: round_dp(rng.gen_range(0.92..=0.99), 3),
            system_uptime: round_dp(rng.gen_range(0.985..=0.999), 3),
            api_calls: rng.gen_range(5000..=15_000),
            error_rate: round_dp(rng.gen_range(0.001..=0.05), 3),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn fixed_now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn small_counts() -> LimsCounts {
        LimsCounts {
            patients: 20,
            orders: 60,
            specimens: 80,
            results: 100,
            sync_logs: 40,
            metric_days: 10,
        }
    }

    #[test]
    fn children_reference_generated_parents_only() {
        let mut rng = StdRng::seed_from_u64(11);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();

        let mrns: HashSet<_> = data.patients.iter().map(|p| p.mrn.as_str()).collect();
        assert!(data.orders.iter().all(|o| mrns.contains(o.mrn.as_str())));

        let order_ids: HashSet<_> = data.orders.iter().map(|o| o.order_id.as_str()).collect();
        assert!(data
            .specimens
            .iter()
            .all(|s| order_ids.contains(s.order_id.as_str())));
        assert!(data
            .results
            .iter()
            .all(|r| order_ids.contains(r.order_id.as_str())));
    }

    #[test]
    fn dependent_timestamps_follow_their_parents() {
        let mut rng = StdRng::seed_from_u64(12);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();

        for order in &data.orders {
            if let Some(collected) = order.collected_at {
                assert!(collected >= order.ordered_at);
            }
            if let Some(resulted) = order.resulted_at {
                assert!(resulted >= order.collected_at.unwrap_or(order.ordered_at));
            }
        }

        let ordered_at: std::collections::HashMap<_, _> = data
            .orders
            .iter()
            .map(|o| (o.order_id.as_str(), o.ordered_at))
            .collect();
        for specimen in &data.specimens {
            assert!(specimen.recorded_at >= ordered_at[specimen.order_id.as_str()]);
        }
        for result in &data.results {
            assert!(result.resulted_at >= ordered_at[result.order_id.as_str()]);
        }
    }

    #[test]
    fn identifiers_are_unique_per_table() {
        let mut rng = StdRng::seed_from_u64(13);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();
        let ids: HashSet<_> = data.orders.iter().map(|o| &o.order_id).collect();
        assert_eq!(ids.len(), data.orders.len());
        assert!(data.orders.iter().all(|o| o.order_id.starts_with("ORD")));
        assert!(data.patients.iter().all(|p| p.mrn.len() == 10));
    }

    #[test]
    fn measurements_stay_in_declared_ranges() {
        let mut rng = StdRng::seed_from_u64(14);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();
        for specimen in &data.specimens {
            assert!((1.0..=10.0).contains(&specimen.volume_ml));
            assert!((2.0..=8.0).contains(&specimen.temperature_c));
            assert!((1..=10).contains(&specimen.chain_of_custody));
        }
        for metric in &data.metrics {
            assert!((0.0..=1.0).contains(&metric.sync_success));
            assert!((0.0..=1.0).contains(&metric.system_uptime));
            assert!(metric.avg_tat_hours >= 0.0);
        }
    }

    #[test]
    fn zero_counts_yield_valid_empty_tables() {
        let counts = LimsCounts {
            patients: 0,
            orders: 0,
            specimens: 0,
            results: 0,
            sync_logs: 0,
            metric_days: 0,
        };
        let mut rng = StdRng::seed_from_u64(15);
        let data = generate(&counts, fixed_now(), &mut rng).unwrap();
        assert_eq!(data.total_rows(), 0);
        assert_eq!(data.tables().len(), LimsDataset::SHEETS.len());
    }

    #[test]
    fn orders_without_patients_is_a_config_error() {
        let counts = LimsCounts {
            patients: 0,
            orders: 5,
            specimens: 0,
            results: 0,
            sync_logs: 0,
            metric_days: 0,
        };
        let mut rng = StdRng::seed_from_u64(16);
        assert!(matches!(
            generate(&counts, fixed_now(), &mut rng),
            Err(GenerateError::EmptyParentPool {
                parent: "patients",
                child: "orders"
            })
        ));
    }

    #[test]
    fn same_seed_reproduces_the_dataset() {
        let a = generate(
            &small_counts(),
            fixed_now(),
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();
        let b = generate(
            &small_counts(),
            fixed_now(),
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tables_match_declared_sheets() {
        let mut rng = StdRng::seed_from_u64(17);
        let data = generate(&small_counts(), fixed_now(), &mut rng).unwrap();
        let tables = data.tables();
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, LimsDataset::SHEETS);
        assert_eq!(tables[1].len(), 60);
    }
}
