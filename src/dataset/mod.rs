pub mod reader;
pub mod table;
pub mod writer;

pub use reader::*;
pub use table::*;
pub use writer::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook read error: {0}")]
    Read(#[from] calamine::XlsxError),

    #[error("Sheet not found in raw artifact: {0}")]
    SheetNotFound(String),

    #[error("Sheet {0} has no header row")]
    EmptySheet(String),
}
