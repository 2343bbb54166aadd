// Pipeline ingestion: reading and validating the tabular input

pub mod csv_source;

pub use csv_source::{check_required_columns, render_preview, CsvSource};
