use crate::error::AnalyticsError;
use crate::report::{
    DateRange, ImpactAnalysis, ImpactWindow, PricePoint, PriceStatistics, RollingVolatility,
    SummaryStatistics, VolatilityReport,
};
use crate::stats::{mean, quantile_sorted, sample_std};
use chrono::{Days, NaiveDate};
use configuration::AnalysisSettings;
use core_types::PriceRecord;

/// A stateless calculator for deriving statistics from a price series.
///
/// It owns only its parameters; every method takes the series it works on.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: AnalysisSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Calculates daily, annualized and rolling volatility of log returns, plus
    /// the maximum drawdown of prices.
    ///
    /// # Arguments
    ///
    /// * `records` - The price series, ordered by date.
    ///
    /// # Returns
    ///
    /// `AnalyticsError::NotEnoughData` when fewer than two returns exist.
    pub fn calculate_volatility(
        &self,
        records: &[PriceRecord],
    ) -> Result<VolatilityReport, AnalyticsError> {
        let returns: Vec<f64> = records.iter().map(|r| r.log_return).collect();
        let daily = sample_std(&returns).ok_or_else(|| {
            AnalyticsError::NotEnoughData(format!(
                "volatility needs at least 2 returns, got {}",
                returns.len()
            ))
        })?;

        let trading_days = f64::from(self.settings.trading_days_per_year);
        let prices: Vec<f64> = records.iter().map(|r| r.price).collect();

        Ok(VolatilityReport {
            daily_volatility: daily,
            annualized_volatility: daily * trading_days.sqrt(),
            rolling_volatility: self.calculate_rolling_volatility(records),
            max_drawdown: calculate_max_drawdown(&prices),
        })
    }

    /// Sample standard deviation of log returns over each trailing window.
    ///
    /// Yields `max(0, N - window + 1)` points; the first `window - 1` records
    /// never close a full window.
    pub fn calculate_rolling_volatility(&self, records: &[PriceRecord]) -> Vec<RollingVolatility> {
        let window = self.settings.rolling_window;
        if window == 0 {
            return Vec::new();
        }

        records
            .windows(window)
            .filter_map(|w| {
                let returns: Vec<f64> = w.iter().map(|r| r.log_return).collect();
                let volatility = sample_std(&returns)?;
                let date = w.last()?.date;
                Some(RollingVolatility { date, volatility })
            })
            .collect()
    }

    /// Count, date span and price distribution of the series.
    pub fn calculate_summary(
        &self,
        records: &[PriceRecord],
        total_events: usize,
        total_change_points: usize,
    ) -> Result<SummaryStatistics, AnalyticsError> {
        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Err(AnalyticsError::NotEnoughData(
                "summary statistics need at least one price".to_string(),
            ));
        };

        let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
        let mut sorted = prices.clone();
        sorted.sort_by(f64::total_cmp);

        let missing = || AnalyticsError::NotEnoughData("empty price distribution".to_string());
        let price_statistics = PriceStatistics {
            mean: mean(&prices).ok_or_else(missing)?,
            median: quantile_sorted(&sorted, 0.5).ok_or_else(missing)?,
            std: sample_std(&prices),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q1: quantile_sorted(&sorted, 0.25).ok_or_else(missing)?,
            q3: quantile_sorted(&sorted, 0.75).ok_or_else(missing)?,
        };

        Ok(SummaryStatistics {
            total_days: records.len(),
            date_range: DateRange {
                start: Some(first.date),
                end: Some(last.date),
            },
            price_statistics,
            total_change_points,
            total_events,
        })
    }

    /// Compares prices before and after `anchor` within `window_days` either side.
    ///
    /// Records dated on the anchor count as post-event. The percentage change is
    /// only reported when both sides have data and the pre-event mean is positive.
    pub fn calculate_impact(
        &self,
        records: &[PriceRecord],
        anchor: NaiveDate,
        window_days: i64,
    ) -> Result<ImpactWindow, AnalyticsError> {
        if window_days < 0 {
            return Err(AnalyticsError::InvalidWindow(window_days));
        }
        let span = Days::new(window_days.unsigned_abs());
        let from = anchor.checked_sub_days(span).unwrap_or(NaiveDate::MIN);
        let to = anchor.checked_add_days(span).unwrap_or(NaiveDate::MAX);

        let in_window = date_slice(records, from, to);
        if in_window.is_empty() {
            return Ok(ImpactWindow::NoData);
        }

        let split = in_window.partition_point(|r| r.date < anchor);
        let pre: Vec<f64> = in_window[..split].iter().map(|r| r.price).collect();
        let post: Vec<f64> = in_window[split..].iter().map(|r| r.price).collect();

        let pre_event_mean = mean(&pre);
        let post_event_mean = mean(&post);
        let percentage_change = match (pre_event_mean, post_event_mean) {
            (Some(before), Some(after)) if before > 0.0 => Some((after - before) / before * 100.0),
            _ => None,
        };

        Ok(ImpactWindow::Measured(ImpactAnalysis {
            pre_event_mean,
            post_event_mean,
            pre_event_std: sample_std(&pre),
            post_event_std: sample_std(&post),
            percentage_change,
            window_days,
            event_date: anchor,
            price_data: in_window
                .iter()
                .map(|r| PricePoint {
                    date: r.date,
                    price: r.price,
                })
                .collect(),
        }))
    }
}

/// Largest fractional decline from a running peak, in a single scan.
///
/// Returns 0 for an empty or non-decreasing series.
pub fn calculate_max_drawdown(prices: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_drawdown = 0.0;

    for &price in prices {
        if price > peak {
            peak = price;
        }
        if peak > 0.0 {
            let drawdown = (peak - price) / peak;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown
}

/// The contiguous run of records dated within `[from, to]`. Relies on the
/// series being sorted by date.
pub(crate) fn date_slice(
    records: &[PriceRecord],
    from: NaiveDate,
    to: NaiveDate,
) -> &[PriceRecord] {
    if from > to {
        return &[];
    }
    let start = records.partition_point(|r| r.date < from);
    let end = records.partition_point(|r| r.date <= to);
    &records[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(n))
            .unwrap()
    }

    /// Consecutive daily records starting 2020-01-01. Returns are taken
    /// against the previous price; the first record uses a return of 0.
    fn series(prices: &[f64]) -> Vec<PriceRecord> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PriceRecord {
                date: day(i as u64),
                price,
                log_return: if i == 0 { 0.0 } else { price.ln() - prices[i - 1].ln() },
            })
            .collect()
    }

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(AnalysisSettings::default())
    }

    #[test]
    fn drawdown_is_zero_for_non_decreasing_prices() {
        assert_eq!(calculate_max_drawdown(&[1.0, 2.0, 2.0, 3.0, 10.0]), 0.0);
        assert_eq!(calculate_max_drawdown(&[]), 0.0);
    }

    #[test]
    fn drawdown_from_single_peak() {
        assert!((calculate_max_drawdown(&[10.0, 20.0, 5.0]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn drawdown_keeps_the_deepest_decline() {
        // 100 -> 60 is 40%; the later 120 -> 90 is only 25%.
        let prices = [100.0, 60.0, 120.0, 90.0, 110.0];
        assert!((calculate_max_drawdown(&prices) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn rolling_volatility_length_matches_window() {
        let engine = engine();
        for n in [0usize, 1, 29, 30, 31, 100] {
            let prices: Vec<f64> = (0..n).map(|i| 50.0 + (i % 7) as f64).collect();
            let rolling = engine.calculate_rolling_volatility(&series(&prices));
            assert_eq!(rolling.len(), n.saturating_sub(29), "n = {n}");
        }
    }

    #[test]
    fn rolling_points_carry_the_window_end_date() {
        let prices: Vec<f64> = (0..35).map(|i| 50.0 + (i % 3) as f64).collect();
        let rolling = engine().calculate_rolling_volatility(&series(&prices));
        assert_eq!(rolling[0].date, day(29));
        assert_eq!(rolling.last().unwrap().date, day(34));
    }

    #[test]
    fn volatility_annualizes_with_trading_days() {
        let records = series(&[10.0, 11.0, 10.5, 12.0, 11.5]);
        let report = engine().calculate_volatility(&records).unwrap();

        let returns: Vec<f64> = records.iter().map(|r| r.log_return).collect();
        let expected = sample_std(&returns).unwrap();
        assert!((report.daily_volatility - expected).abs() < 1e-12);
        assert!((report.annualized_volatility - expected * 252f64.sqrt()).abs() < 1e-12);
        assert!(report.rolling_volatility.is_empty());
        // 11 -> 10.5 is deeper than the later 12 -> 11.5.
        assert!((report.max_drawdown - (11.0 - 10.5) / 11.0).abs() < 1e-12);
    }

    #[test]
    fn drawdown_prefers_an_earlier_deeper_dip_over_the_latest() {
        let drawdown = calculate_max_drawdown(&[10.0, 11.0, 10.5, 12.0, 11.5]);
        assert!((drawdown - 0.5 / 11.0).abs() < 1e-12);
        assert!(drawdown > 0.5 / 12.0);
    }

    #[test]
    fn volatility_needs_two_returns() {
        let engine = engine();
        assert!(matches!(
            engine.calculate_volatility(&[]),
            Err(AnalyticsError::NotEnoughData(_))
        ));
        assert!(matches!(
            engine.calculate_volatility(&series(&[10.0])),
            Err(AnalyticsError::NotEnoughData(_))
        ));
    }

    #[test]
    fn summary_of_one_to_five() {
        let summary = engine()
            .calculate_summary(&series(&[3.0, 1.0, 5.0, 2.0, 4.0]), 13, 6)
            .unwrap();
        let stats = summary.price_statistics;

        assert_eq!(summary.total_days, 5);
        assert_eq!(summary.date_range.start, Some(day(0)));
        assert_eq!(summary.date_range.end, Some(day(4)));
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert!((stats.std.unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.total_events, 13);
        assert_eq!(summary.total_change_points, 6);
    }

    #[test]
    fn summary_of_empty_series_is_not_enough_data() {
        assert!(matches!(
            engine().calculate_summary(&[], 0, 0),
            Err(AnalyticsError::NotEnoughData(_))
        ));
    }

    #[test]
    fn summary_of_single_price_has_no_std() {
        let summary = engine().calculate_summary(&series(&[7.0]), 0, 0).unwrap();
        assert_eq!(summary.price_statistics.std, None);
        assert_eq!(summary.price_statistics.q1, 7.0);
    }

    #[test]
    fn impact_splits_on_anchor_inclusive_post() {
        // Days 0..=9 priced 10..=19; anchor on day 5 with a 3-day window.
        let prices: Vec<f64> = (10..20).map(f64::from).collect();
        let window = engine().calculate_impact(&series(&prices), day(5), 3).unwrap();
        let analysis = window.analysis().unwrap();

        let dates: Vec<_> = analysis.price_data.iter().map(|p| p.date).collect();
        assert_eq!(dates, (2..=8).map(day).collect::<Vec<_>>());
        assert_eq!(analysis.pre_event_mean, Some(13.0));
        assert_eq!(analysis.post_event_mean, Some(16.5));
        assert_eq!(analysis.pre_event_std, Some(1.0));
        let expected = (16.5 - 13.0) / 13.0 * 100.0;
        assert!((analysis.percentage_change.unwrap() - expected).abs() < 1e-12);
        assert_eq!(analysis.window_days, 3);
        assert_eq!(analysis.event_date, day(5));
    }

    #[test]
    fn impact_without_records_is_no_data() {
        let records = series(&[10.0, 11.0, 12.0]);
        let far_away = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        assert_eq!(
            engine().calculate_impact(&records, far_away, 30).unwrap(),
            ImpactWindow::NoData
        );
    }

    #[test]
    fn impact_with_only_post_event_data_has_no_percentage() {
        let records = series(&[10.0, 11.0, 12.0]);
        let window = engine().calculate_impact(&records, day(0), 30).unwrap();
        let analysis = window.analysis().unwrap();

        assert_eq!(analysis.pre_event_mean, None);
        assert_eq!(analysis.pre_event_std, None);
        assert_eq!(analysis.post_event_mean, Some(11.0));
        assert_eq!(analysis.percentage_change, None);
    }

    #[test]
    fn impact_with_zero_pre_mean_has_no_percentage() {
        // Prices are positive after loading; build the degenerate case by hand.
        let mut records = series(&[1.0, 2.0, 3.0]);
        records[0].price = 0.0;
        let window = engine().calculate_impact(&records, day(1), 5).unwrap();
        let analysis = window.analysis().unwrap();

        assert_eq!(analysis.pre_event_mean, Some(0.0));
        assert_eq!(analysis.percentage_change, None);
    }

    #[test]
    fn impact_rejects_negative_window() {
        assert_eq!(
            engine().calculate_impact(&series(&[1.0, 2.0]), day(0), -1),
            Err(AnalyticsError::InvalidWindow(-1))
        );
    }

    #[test]
    fn date_slice_is_inclusive_and_empty_when_inverted() {
        let records = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(date_slice(&records, day(1), day(3)).len(), 3);
        assert!(date_slice(&records, day(3), day(1)).is_empty());
        assert_eq!(date_slice(&records, day(4), day(4)).len(), 1);
    }
}
