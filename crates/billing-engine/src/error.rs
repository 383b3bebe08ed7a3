//! Error types for billing-engine operations.

use thiserror::Error;

/// Failures raised where external data enters the engine.
///
/// Reaching an end date is not an error: it is reported as
/// [`NextOccurrence::Ended`](crate::resolver::NextOccurrence::Ended).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid billing cycle: {0}")]
    InvalidCycle(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
