//! # Brent Insight Core Types
//!
//! Layer 0 of the workspace. Every other crate speaks in terms of these
//! structures: the loaded price series, the event catalog and the change-point
//! catalog, plus the one date parser they all share.

pub mod dates;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use dates::parse_date;
pub use error::CoreError;
pub use structs::{ChangePoint, Event, PriceRecord};
