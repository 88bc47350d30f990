//! Job application tracker: records, filtering, summaries, spreadsheet export and the web UI.

pub mod applications;
pub mod config;
pub mod error;
pub mod export;
pub mod store;
pub mod telemetry;

pub use error::AppError;
