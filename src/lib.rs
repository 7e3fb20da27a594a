pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod generate;
pub mod models;
pub mod pipeline;
pub mod report;
