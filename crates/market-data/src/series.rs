use chrono::NaiveDate;
use core_types::PriceRecord;

/// Sorts cleaned `(date, price)` observations and derives log returns.
///
/// The sort is stable, so duplicate dates keep their input order. The first
/// observation has no predecessor and does not appear in the output.
pub fn build_records(mut rows: Vec<(NaiveDate, f64)>) -> Vec<PriceRecord> {
    rows.sort_by_key(|&(date, _)| date);

    rows.windows(2)
        .map(|w| {
            let (_, prev) = w[0];
            let (date, price) = w[1];
            PriceRecord {
                date,
                price,
                log_return: price.ln() - prev.ln(),
            }
        })
        .collect()
}
