//! Infrastructure: configuration loading and process-wide logging.

pub mod config;
