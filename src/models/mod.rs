pub mod enums;
pub mod lims;
pub mod nhs;

pub use enums::*;
pub use lims::*;
pub use nhs::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
