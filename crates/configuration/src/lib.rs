use crate::error::ConfigError;
use config::{Environment, File, FileFormat};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod catalog;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use catalog::Catalog;
pub use settings::{
    AnalysisSettings, DataSettings, LogFormat, LoggingSettings, ServerSettings, Settings,
};

/// Prefix of the environment overrides, e.g. `BRENT__SERVER__PORT=5001`.
const ENV_PREFIX: &str = "BRENT";

/// Loads the application settings.
///
/// The TOML file at `path` is optional; environment variables prefixed with
/// `BRENT__` are layered on top of it.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Parses settings from TOML text, without environment overrides.
pub fn parse_config(toml: &str) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize::<Settings>()?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Loads and validates the event / change-point catalog. The file is required.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let catalog = config::Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml))
        .build()?
        .try_deserialize::<Catalog>()?;
    catalog.validate()?;
    tracing::info!(
        path = %path.display(),
        events = catalog.events.len(),
        change_points = catalog.change_points.len(),
        "Catalog loaded."
    );
    Ok(catalog)
}

/// Parses and validates a catalog from TOML text.
pub fn parse_catalog(toml: &str) -> Result<Catalog, ConfigError> {
    let catalog = config::Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize::<Catalog>()?;
    catalog.validate()?;
    Ok(catalog)
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    let analysis = &settings.analysis;
    if analysis.rolling_window < 2 {
        return Err(ConfigError::ValidationError(
            "analysis.rolling_window must be at least 2".to_string(),
        ));
    }
    if analysis.trading_days_per_year == 0 {
        return Err(ConfigError::ValidationError(
            "analysis.trading_days_per_year must be positive".to_string(),
        ));
    }
    if analysis.impact_window_days < 0 {
        return Err(ConfigError::ValidationError(
            "analysis.impact_window_days must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const CATALOG: &str = r#"
[[events]]
id = 2
name = "Gulf War"
date = "1990-08-02"
type = "political"
region = "Middle East"
description = "Iraq invasion of Kuwait causing oil price spike"

[[events]]
id = 6
name = "Global Financial Crisis"
date = "2008-09-15"
type = "economic"
region = "Global"
description = "Lehman Brothers collapse, severe demand shock"

[[change_points]]
date = "1990-08-15"
probability = 0.92
before_mean = 18.5
after_mean = 28.7
change_percentage = 55.1
associated_events = [2]
"#;

    #[test]
    fn empty_config_yields_defaults() {
        let settings = parse_config("").unwrap();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.analysis, AnalysisSettings::default());
        assert_eq!(settings.data.candidate_paths.len(), 4);
        assert_eq!(settings.data.catalog_path, PathBuf::from("catalog.toml"));
        assert!(settings.logging.directory.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let settings = parse_config(
            r#"
[server]
port = 8080

[analysis]
rolling_window = 60

[logging]
format = "compact"
"#,
        )
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.analysis.rolling_window, 60);
        assert_eq!(settings.analysis.trading_days_per_year, 252);
        assert_eq!(settings.logging.format, LogFormat::Compact);
    }

    #[test]
    fn rejects_degenerate_rolling_window() {
        let err = parse_config("[analysis]\nrolling_window = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let settings = parse_config("[server]\nhost = \"127.0.0.1\"\nport = 5001\n").unwrap();
        assert_eq!(
            settings.server.socket_addr().unwrap().to_string(),
            "127.0.0.1:5001"
        );
    }

    #[test]
    fn parses_catalog() {
        let catalog = parse_catalog(CATALOG).unwrap();
        assert_eq!(catalog.events.len(), 2);
        assert_eq!(catalog.events[0].event_type, "political");
        assert_eq!(catalog.change_points[0].associated_events, vec![2]);
        assert!((catalog.change_points[0].probability - 0.92).abs() < 1e-12);
    }

    #[test]
    fn rejects_duplicate_event_ids() {
        let duplicated = CATALOG.replace("id = 6", "id = 2");
        let err = parse_catalog(&duplicated).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        let broken = CATALOG.replace("probability = 0.92", "probability = 1.5");
        assert!(matches!(
            parse_catalog(&broken),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn dangling_event_reference_is_tolerated() {
        let dangling = CATALOG.replace("associated_events = [2]", "associated_events = [2, 99]");
        let catalog = parse_catalog(&dangling).unwrap();
        assert_eq!(catalog.change_points[0].associated_events, vec![2, 99]);
    }

    #[test]
    fn bundled_catalog_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../catalog.toml");
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.events.len(), 13);
        assert_eq!(catalog.change_points.len(), 6);
    }
}
