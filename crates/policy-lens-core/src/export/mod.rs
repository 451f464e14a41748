//! Report export (JSON, CSV, plain text).

mod report;

pub use report::*;
