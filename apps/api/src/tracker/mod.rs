//! Daily health tracking for patients.

pub mod handlers;
pub mod log;
pub mod scoring;
