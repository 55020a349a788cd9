use chrono::NaiveDate;
use core_types::{ChangePoint, Event};
use serde::Serialize;

/// One point of the rolling volatility series, stamped with the last date of its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingVolatility {
    pub date: NaiveDate,
    pub volatility: f64,
}

/// Volatility metrics of the full series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityReport {
    pub daily_volatility: f64,
    pub annualized_volatility: f64,
    pub rolling_volatility: Vec<RollingVolatility>,
    pub max_drawdown: f64,
}

impl VolatilityReport {
    /// The zero-valued report served when the series is too short to measure.
    pub fn zeroed() -> Self {
        Self {
            daily_volatility: 0.0,
            annualized_volatility: 0.0,
            rolling_volatility: Vec::new(),
            max_drawdown: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Distribution of prices. `std` is absent when fewer than two prices exist.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceStatistics {
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total_days: usize,
    pub date_range: DateRange,
    pub price_statistics: PriceStatistics,
    pub total_change_points: usize,
    pub total_events: usize,
}

impl SummaryStatistics {
    /// The zero-valued summary served for an empty series. Catalog sizes do not
    /// depend on the series and are still reported.
    pub fn zeroed(total_events: usize, total_change_points: usize) -> Self {
        Self {
            total_days: 0,
            date_range: DateRange::default(),
            price_statistics: PriceStatistics::default(),
            total_change_points,
            total_events,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Price behaviour either side of an anchor date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactAnalysis {
    pub pre_event_mean: Option<f64>,
    pub post_event_mean: Option<f64>,
    pub pre_event_std: Option<f64>,
    pub post_event_std: Option<f64>,
    pub percentage_change: Option<f64>,
    pub window_days: i64,
    pub event_date: NaiveDate,
    pub price_data: Vec<PricePoint>,
}

/// Outcome of an impact-window query. `NoData` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImpactWindow {
    Measured(ImpactAnalysis),
    NoData,
}

impl ImpactWindow {
    pub fn analysis(&self) -> Option<&ImpactAnalysis> {
        match self {
            ImpactWindow::Measured(analysis) => Some(analysis),
            ImpactWindow::NoData => None,
        }
    }
}

/// An event, the first change point that cites it, and the price action around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCorrelation {
    pub event: Event,
    pub change_point: Option<ChangePoint>,
    pub price_analysis: ImpactWindow,
}
