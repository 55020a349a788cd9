use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("{0}")]
    InvalidDate(#[from] CoreError),

    #[error("Event not found")]
    EventNotFound(u32),

    #[error("Window must be a non-negative number of days, got {0}")]
    InvalidWindow(i64),
}
