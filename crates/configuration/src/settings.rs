use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; a missing `config.toml` yields the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub analysis: AnalysisSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Locations of the price series and the event catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// CSV files tried in order; the first readable one wins.
    pub candidate_paths: Vec<PathBuf>,
    pub catalog_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            candidate_paths: vec![
                PathBuf::from("data/brent_oil_prices.csv"),
                PathBuf::from("data/processed/brent_oil_processed.csv"),
                PathBuf::from("dashboard/data/brent_oil_prices.csv"),
                PathBuf::from("dashboard/data/processed/brent_oil_processed.csv"),
            ],
            catalog_path: PathBuf::from("catalog.toml"),
        }
    }
}

/// Parameters of the derived statistics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Trailing window, in records, of the rolling volatility series.
    pub rolling_window: usize,
    /// Trading-day convention used to annualize daily volatility.
    pub trading_days_per_year: u32,
    /// Half-width, in calendar days, of an event impact window when none is given.
    pub impact_window_days: i64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            rolling_window: 30,
            trading_days_per_year: 252,
            impact_window_days: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, overridden by `RUST_LOG` when that is set.
    pub filter: String,
    pub format: LogFormat,
    /// When set, logs are also written to daily rolling files in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}
