// src/utils/mod.rs

//! Shared utilities: parsers, CSV codec, error log, cancellation.

pub mod cancel;
pub mod csv;
pub mod errlog;
pub mod parse;

pub use cancel::StopFlag;
pub use errlog::ErrorLog;
pub use parse::{Serving, clean_amount, clean_unit_measure, parse_serving, split_brand};
