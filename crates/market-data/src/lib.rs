//! # Brent Insight Market Data
//!
//! Builds the in-memory price series the whole service reads from.
//!
//! - `loader`: CSV ingest with header-spelling resolution and lossy row cleaning,
//!   plus the ordered candidate-path discovery used at startup.
//! - `series`: the shared sort-then-derive step that turns `(date, price)` pairs
//!   into return-complete `PriceRecord`s.
//! - `synthetic`: the deterministic demo series used only when no real source
//!   is usable.

pub mod error;
pub mod loader;
pub mod series;
pub mod synthetic;

pub use error::MarketDataError;
pub use loader::{load_series, read_csv, read_csv_file, LoadedSeries, SeriesSource};
pub use series::build_records;
pub use synthetic::generate_synthetic;
