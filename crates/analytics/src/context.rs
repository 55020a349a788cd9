use crate::engine::{date_slice, AnalyticsEngine};
use crate::error::AnalyticsError;
use crate::report::{EventCorrelation, ImpactWindow, SummaryStatistics, VolatilityReport};
use configuration::{AnalysisSettings, Catalog};
use core_types::{parse_date, ChangePoint, Event, PriceRecord};

/// The immutable tables every query reads from.
///
/// Built once at startup; construction is the only point of mutation, so the
/// context can be shared freely behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AnalyticsContext {
    records: Vec<PriceRecord>,
    events: Vec<Event>,
    change_points: Vec<ChangePoint>,
    engine: AnalyticsEngine,
}

impl AnalyticsContext {
    /// Takes ownership of a date-ordered series and the catalog.
    pub fn new(records: Vec<PriceRecord>, catalog: Catalog, settings: AnalysisSettings) -> Self {
        debug_assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
        Self {
            records,
            events: catalog.events,
            change_points: catalog.change_points,
            engine: AnalyticsEngine::new(settings),
        }
    }

    pub fn prices(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn change_points(&self) -> &[ChangePoint] {
        &self.change_points
    }

    pub fn settings(&self) -> &AnalysisSettings {
        self.engine.settings()
    }

    /// Records dated within `[start, end]`, both inclusive.
    ///
    /// Malformed bounds are an error; `start > end` is simply an empty range.
    pub fn filter_by_date(&self, start: &str, end: &str) -> Result<&[PriceRecord], AnalyticsError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        let filtered = date_slice(&self.records, start, end);
        tracing::debug!(%start, %end, records = filtered.len(), "Filtered price data.");
        Ok(filtered)
    }

    pub fn volatility(&self) -> Result<VolatilityReport, AnalyticsError> {
        self.engine.calculate_volatility(&self.records)
    }

    pub fn summary(&self) -> Result<SummaryStatistics, AnalyticsError> {
        self.engine
            .calculate_summary(&self.records, self.events.len(), self.change_points.len())
    }

    /// Impact window around a caller-supplied date. `None` uses the configured width.
    pub fn event_impact(
        &self,
        event_date: &str,
        window_days: Option<i64>,
    ) -> Result<ImpactWindow, AnalyticsError> {
        let anchor = parse_date(event_date)?;
        let window = window_days.unwrap_or(self.settings().impact_window_days);
        self.engine.calculate_impact(&self.records, anchor, window)
    }

    pub fn find_event(&self, event_id: u32) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Resolves an event, the first change point citing it, and the price
    /// action in the default window around its date.
    pub fn event_correlation(&self, event_id: u32) -> Result<EventCorrelation, AnalyticsError> {
        let event = self
            .find_event(event_id)
            .ok_or(AnalyticsError::EventNotFound(event_id))?;

        let change_point = self
            .change_points
            .iter()
            .find(|cp| cp.is_associated_with(event_id))
            .cloned();

        let price_analysis = self.engine.calculate_impact(
            &self.records,
            event.date,
            self.settings().impact_window_days,
        )?;

        Ok(EventCorrelation {
            event: event.clone(),
            change_point,
            price_analysis,
        })
    }
}
