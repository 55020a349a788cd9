use crate::error::MarketDataError;
use crate::series::build_records;
use crate::synthetic::generate_synthetic;
use chrono::{Days, NaiveDate};
use core_types::{parse_date, PriceRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Recognised date headers, highest priority first.
const DATE_HEADERS: [&str; 5] = ["Date", "date", "DATE", "timestamp", "Timestamp"];

/// Recognised price headers, highest priority first.
const PRICE_HEADERS: [&str; 5] = ["Price", "price", "PRICE", "value", "Value"];

/// Where a price file without any date column starts its implied daily calendar.
const IMPLIED_START: (i32, u32, u32) = (2010, 1, 1);

/// Where the loaded series came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesSource {
    Csv(PathBuf),
    Synthetic,
}

impl fmt::Display for SeriesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesSource::Csv(path) => write!(f, "{}", path.display()),
            SeriesSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub source: SeriesSource,
    pub records: Vec<PriceRecord>,
}

/// Loads the price series from the first usable candidate file.
///
/// Candidates that are missing, unreadable, lack a price column, or contain no
/// valid row are skipped. Only when every candidate fails is the synthetic
/// series generated; a file that yields at least one record is always used as-is.
pub fn load_series(candidates: &[PathBuf]) -> Result<LoadedSeries, MarketDataError> {
    for path in candidates {
        if !path.exists() {
            debug!(path = %path.display(), "Price file candidate not found.");
            continue;
        }

        match read_csv_file(path) {
            Ok(records) => {
                log_loaded(&records, path);
                return Ok(LoadedSeries {
                    source: SeriesSource::Csv(path.clone()),
                    records,
                });
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unusable price file."),
        }
    }

    warn!("No usable price file found; generating the synthetic series.");
    let records = generate_synthetic()?;
    info!(records = records.len(), "Synthetic price series generated.");
    Ok(LoadedSeries {
        source: SeriesSource::Synthetic,
        records,
    })
}

fn log_loaded(records: &[PriceRecord], path: &Path) {
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        info!(
            path = %path.display(),
            records = records.len(),
            from = %first.date,
            to = %last.date,
            "Price series loaded."
        );
    }
}

pub fn read_csv_file(path: &Path) -> Result<Vec<PriceRecord>, MarketDataError> {
    let file = File::open(path).map_err(|source| MarketDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Reads a price table, resolving its date and price columns by header name.
///
/// Rows with an unparseable date or a price that is not a finite positive
/// number are dropped and only counted.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<PriceRecord>, MarketDataError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let price_idx = resolve_column(&headers, &PRICE_HEADERS)
        .ok_or_else(|| {
            MarketDataError::MissingPriceColumn(headers.iter().map(String::from).collect())
        })?;
    let date_idx = resolve_column(&headers, &DATE_HEADERS);

    if date_idx.is_none() {
        warn!("No date column found; assuming consecutive days from 2010-01-01.");
    }
    let (y, m, d) = IMPLIED_START;
    let implied_start =
        NaiveDate::from_ymd_opt(y, m, d).ok_or(MarketDataError::InvalidDate(y, m, d))?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (row_num, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping row {}: {}", row_num + 1, e);
                skipped += 1;
                continue;
            }
        };

        let date = match date_idx {
            Some(idx) => record.get(idx).and_then(|raw| parse_date(raw).ok()),
            None => implied_start.checked_add_days(Days::new(row_num as u64)),
        };
        let price = record.get(price_idx).and_then(parse_price);

        match (date, price) {
            (Some(date), Some(price)) => rows.push((date, price)),
            _ => {
                debug!("Skipping row {}: invalid date or price", row_num + 1);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} invalid rows", skipped);
    }
    if rows.is_empty() {
        return Err(MarketDataError::NoUsableRows);
    }

    Ok(build_records(rows))
}

fn resolve_column(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
}
