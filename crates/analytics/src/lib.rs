//! # Brent Insight Analytics
//!
//! The read path of the service: every query the API answers is a method on
//! [`AnalyticsContext`], which owns the loaded price series and the catalog.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O. Loading happens in `market-data` and
//!   `configuration`; this crate only computes.
//! - **Typed outcomes:** "no data" and "invalid input" are distinct values
//!   (`ImpactWindow::NoData`, `AnalyticsError::*`), never zero-filled payloads.
//!   Translating them for the wire is the caller's job.
//!
//! ## Public API
//!
//! - `AnalyticsContext`: the immutable query surface.
//! - `AnalyticsEngine`: the stateless calculator behind it.
//! - Report structs (`VolatilityReport`, `SummaryStatistics`, `ImpactWindow`, ...).
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod context;
pub mod engine;
pub mod error;
pub mod report;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use context::AnalyticsContext;
pub use engine::{calculate_max_drawdown, AnalyticsEngine};
pub use error::AnalyticsError;
pub use report::{
    DateRange, EventCorrelation, ImpactAnalysis, ImpactWindow, PricePoint, PriceStatistics,
    RollingVolatility, SummaryStatistics, VolatilityReport,
};
