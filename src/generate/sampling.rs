//! Sampling primitives: fan-out rules, parent-pool sampling with the
//! empty-pool guard, and bounded timestamp offsets that keep dependent
//! timestamps after their parents by construction.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use rand_distr::{Distribution, Poisson};

use super::GenerateError;

/// How many child records each selected parent receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FanOut {
    /// Exactly `n` children per parent.
    Fixed(u32),
    /// `Poisson(lambda) + 1` children, so every selected parent has at
    /// least one.
    PoissonPlusOne(f64),
}

impl FanOut {
    pub fn sample(&self, rng: &mut impl Rng) -> Result<u32, GenerateError> {
        match self {
            Self::Fixed(n) => Ok(*n),
            Self::PoissonPlusOne(lambda) => {
                let dist =
                    Poisson::new(*lambda).map_err(|_| GenerateError::InvalidFanOut(*lambda))?;
                Ok(dist.sample(rng) as u32 + 1)
            }
        }
    }
}

/// Uniform pick from a parent identifier pool. Empty pools are a fatal
/// configuration error, never a panic.
pub fn sample_parent<'a, T>(
    rng: &mut impl Rng,
    pool: &'a [T],
    parent: &'static str,
    child: &'static str,
) -> Result<&'a T, GenerateError> {
    if pool.is_empty() {
        return Err(GenerateError::EmptyParentPool { parent, child });
    }
    Ok(&pool[rng.gen_range(0..pool.len())])
}

/// Uniform pick from a closed enumeration or fixed name list. The set is
/// a non-empty constant, so this cannot fail.
pub fn pick<T: Copy>(rng: &mut impl Rng, set: &[T]) -> T {
    set[rng.gen_range(0..set.len())]
}

/// Weighted pick from a closed enumeration. Weights need not sum to one;
/// the last entry absorbs any remainder.
pub fn pick_weighted<T: Copy>(rng: &mut impl Rng, weighted: &[(T, f64)]) -> T {
    let total: f64 = weighted.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0.0..total);
    for (item, weight) in weighted {
        if roll < *weight {
            return *item;
        }
        roll -= weight;
    }
    weighted[weighted.len() - 1].0
}

/// `now` minus a bounded random offset in minutes.
pub fn minutes_back(rng: &mut impl Rng, now: NaiveDateTime, max_minutes: i64) -> NaiveDateTime {
    now - Duration::minutes(rng.gen_range(0..=max_minutes))
}

/// `now` minus a bounded random offset in hours.
pub fn hours_back(rng: &mut impl Rng, now: NaiveDateTime, max_hours: i64) -> NaiveDateTime {
    now - Duration::hours(rng.gen_range(0..=max_hours))
}

/// `today` minus a bounded random offset in days.
pub fn days_back(rng: &mut impl Rng, today: NaiveDate, max_days: i64) -> NaiveDate {
    today - Duration::days(rng.gen_range(0..=max_days))
}

/// Parent timestamp plus a strictly bounded positive offset; the only
/// way dependent timestamps are built.
pub fn hours_after(
    rng: &mut impl Rng,
    parent: NaiveDateTime,
    min_hours: i64,
    max_hours: i64,
) -> NaiveDateTime {
    parent + Duration::hours(rng.gen_range(min_hours..=max_hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fixed_fan_out_is_constant() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(FanOut::Fixed(2).sample(&mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn poisson_fan_out_is_at_least_one() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert!(FanOut::PoissonPlusOne(2.0).sample(&mut rng).unwrap() >= 1);
        }
    }

    #[test]
    fn non_positive_lambda_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            FanOut::PoissonPlusOne(0.0).sample(&mut rng),
            Err(GenerateError::InvalidFanOut(_))
        ));
    }

    #[test]
    fn empty_parent_pool_is_fatal() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool: Vec<String> = Vec::new();
        let err = sample_parent(&mut rng, &pool, "patients", "orders").unwrap_err();
        match err {
            GenerateError::EmptyParentPool { parent, child } => {
                assert_eq!(parent, "patients");
                assert_eq!(child, "orders");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sampled_parent_comes_from_the_pool() {
        let mut rng = StdRng::seed_from_u64(9);
        let pool = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        for _ in 0..50 {
            let picked = sample_parent(&mut rng, &pool, "p", "c").unwrap();
            assert!(pool.contains(picked));
        }
    }

    #[test]
    fn weighted_pick_respects_heavy_weights() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut heavy = 0;
        for _ in 0..1000 {
            if pick_weighted(&mut rng, &[("a", 0.95), ("b", 0.05)]) == "a" {
                heavy += 1;
            }
        }
        assert!(heavy > 900, "expected ~950 heavy picks, got {heavy}");
    }

    #[test]
    fn dependent_timestamp_never_precedes_parent() {
        let mut rng = StdRng::seed_from_u64(3);
        let base = NaiveDate::from_ymd_opt(2025, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        for _ in 0..100 {
            let parent = hours_back(&mut rng, base, 48);
            let child = hours_after(&mut rng, parent, 1, 24);
            assert!(child >= parent);
            assert!(parent <= base);
        }
    }
}
