use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Failed to open price file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No recognised price column among headers {0:?}")]
    MissingPriceColumn(Vec<String>),

    #[error("No row had both a valid date and a positive price")]
    NoUsableRows,

    #[error("Invalid calendar date {0}-{1:02}-{2:02}")]
    InvalidDate(i32, u32, u32),
}
