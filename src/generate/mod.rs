pub mod ids;
pub mod lims;
pub mod nhs;
pub mod sampling;

pub use lims::{LimsCounts, LimsDataset};
pub use nhs::{NhsCounts, NhsDataset};
pub use sampling::FanOut;

use thiserror::Error;

/// Rounds to `dp` decimal places, matching the precision the raw
/// extracts carry for measured values.
pub(crate) fn round_dp(x: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (x * factor).round() / factor
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Cannot generate {child}: parent pool {parent} is empty")]
    EmptyParentPool {
        parent: &'static str,
        child: &'static str,
    },

    #[error("Invalid Poisson fan-out lambda: {0}")]
    InvalidFanOut(f64),
}
