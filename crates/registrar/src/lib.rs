//! Registrar dashboard core: schedule conflict detection, grade aggregation
//! and change-of-grade report generation, with a small HTTP API in front.

pub mod config;
pub mod grades;
pub mod registration;
pub mod report;
pub mod schedule;
pub mod server;
pub mod session;
pub mod types;
