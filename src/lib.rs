pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod storage;
pub mod types;

pub use error::{ImportError, Result};
pub use pipeline::{Pipeline, RunSummary};
