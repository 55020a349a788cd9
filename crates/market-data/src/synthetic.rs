use crate::error::MarketDataError;
use crate::series::build_records;
use chrono::NaiveDate;
use core_types::PriceRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::PI;

type Ymd = (i32, u32, u32);

const SERIES_START: Ymd = (1987, 5, 20);
const SERIES_END: Ymd = (2022, 9, 30);

const BASE_PRICE: f64 = 18.0;
const TREND_RISE: f64 = 82.0;
const SEASONAL_AMPLITUDE: f64 = 8.0;
const SEASONAL_PERIOD_DAYS: f64 = 365.0;
const RANDOM_WALK_SIGMA: f64 = 0.8;
const RANDOM_WALK_SEED: u64 = 42;
const PRICE_FLOOR: f64 = 10.0;

/// A linear ramp from zero to `amount` over the half-open window `[start, end)`.
struct Shock {
    name: &'static str,
    start: Ymd,
    end: Ymd,
    amount: f64,
}

const SHOCKS: [Shock; 7] = [
    Shock {
        name: "Gulf War",
        start: (1990, 8, 2),
        end: (1991, 2, 28),
        amount: 25.0,
    },
    Shock {
        name: "Asian Financial Crisis",
        start: (1997, 7, 2),
        end: (1998, 12, 31),
        amount: -20.0,
    },
    Shock {
        name: "Global Financial Crisis",
        start: (2008, 9, 15),
        end: (2009, 6, 30),
        amount: -70.0,
    },
    Shock {
        name: "Arab Spring",
        start: (2010, 12, 17),
        end: (2012, 12, 31),
        amount: 30.0,
    },
    Shock {
        name: "2014 Oil Price Crash",
        start: (2014, 6, 1),
        end: (2015, 1, 1),
        amount: -50.0,
    },
    Shock {
        name: "COVID-19",
        start: (2020, 3, 1),
        end: (2020, 6, 1),
        amount: -40.0,
    },
    Shock {
        name: "Russia-Ukraine War",
        start: (2022, 2, 24),
        end: (2022, 9, 30),
        amount: 35.0,
    },
];

fn date((y, m, d): Ymd) -> Result<NaiveDate, MarketDataError> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or(MarketDataError::InvalidDate(y, m, d))
}

/// `n` evenly spaced values from `0` to `end`, inclusive.
fn ramp(n: usize, end: f64) -> impl Iterator<Item = f64> {
    let step = if n > 1 { end / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| i as f64 * step)
}

/// Generates the deterministic demo series.
///
/// Daily prices from 1987-05-20 to 2022-09-30: a linear trend, a yearly
/// sinusoid, a seeded Gaussian random walk and the scripted shocks, floored at
/// 10. The same seed produces the same series on every run.
pub fn generate_synthetic() -> Result<Vec<PriceRecord>, MarketDataError> {
    let start = date(SERIES_START)?;
    let end = date(SERIES_END)?;
    let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
    let n = dates.len();

    let mut shocks = vec![0.0; n];
    for shock in &SHOCKS {
        let (from, to) = (date(shock.start)?, date(shock.end)?);
        let first = dates.partition_point(|d| *d < from);
        let last = dates.partition_point(|d| *d < to);
        let len = last.saturating_sub(first);
        for (slot, value) in shocks[first..first + len].iter_mut().zip(ramp(len, shock.amount)) {
            *slot = value;
        }
        tracing::trace!(shock = shock.name, days = len, "Applied synthetic shock.");
    }

    let mut rng = StdRng::seed_from_u64(RANDOM_WALK_SEED);
    let mut walk = 0.0;

    let rows = dates
        .iter()
        .zip(ramp(n, TREND_RISE))
        .zip(shocks)
        .enumerate()
        .map(|(i, ((&day, trend), shock))| {
            let z: f64 = rng.sample(StandardNormal);
            walk += RANDOM_WALK_SIGMA * z;
            let seasonal = SEASONAL_AMPLITUDE * (2.0 * PI * i as f64 / SEASONAL_PERIOD_DAYS).sin();
            let price = (BASE_PRICE + trend + seasonal + walk + shock).max(PRICE_FLOOR);
            (day, price)
        })
        .collect();

    Ok(build_records(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_the_fixed_calendar() {
        let records = generate_synthetic().unwrap();
        // The first generated day is dropped along with its missing return.
        assert_eq!(records.first().unwrap().date, NaiveDate::from_ymd_opt(1987, 5, 21).unwrap());
        assert_eq!(records.last().unwrap().date, NaiveDate::from_ymd_opt(2022, 9, 30).unwrap());

        let first = records.first().unwrap().date;
        let days = (records.last().unwrap().date - first).num_days() as usize;
        assert_eq!(records.len(), days + 1);
    }

    #[test]
    fn is_reproducible() {
        assert_eq!(generate_synthetic().unwrap(), generate_synthetic().unwrap());
    }

    #[test]
    fn prices_respect_the_floor() {
        let records = generate_synthetic().unwrap();
        assert!(records.iter().all(|r| r.price >= PRICE_FLOOR));
        assert!(records.iter().all(|r| r.log_return.is_finite()));
    }

    #[test]
    fn ramp_is_inclusive_linear_spacing() {
        let values: Vec<f64> = ramp(5, -20.0).collect();
        assert_eq!(values, vec![0.0, -5.0, -10.0, -15.0, -20.0]);
        assert_eq!(ramp(1, 25.0).collect::<Vec<_>>(), vec![0.0]);
        assert_eq!(ramp(0, 25.0).count(), 0);
    }
}
