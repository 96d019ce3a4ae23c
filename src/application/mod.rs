//! Application services (use cases).
//!
//! These orchestrate the SQLite adapter's query functions into the
//! practice exercises and their checker.

pub mod exercise;
