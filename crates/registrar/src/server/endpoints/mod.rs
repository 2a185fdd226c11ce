pub mod grades;
pub mod reports;
pub mod schedule;
pub mod session;
pub mod status;
