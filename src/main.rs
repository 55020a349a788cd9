use analytics::{
    AnalyticsContext, AnalyticsError, ImpactWindow, SummaryStatistics, VolatilityReport,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{LogFormat, LoggingSettings, Settings};
use serde::Serialize;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// The main entry point for the Brent Insight service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load BRENT__* overrides from a .env file when one exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let mut settings = configuration::load_config(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }

    // Held until exit so buffered file logs are flushed.
    let _guard = init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::Summary(args) => {
            let context = web_server::load_context(&settings)?;
            print_summary(&context, args.json)
        }
        Commands::Volatility(args) => {
            let context = web_server::load_context(&settings)?;
            print_volatility(&context, args.json)
        }
        Commands::Event(args) => {
            let context = web_server::load_context(&settings)?;
            print_event(&context, args)
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A read-only analytics API over historical Brent crude prices.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the settings file. A missing file means defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `[logging] format`.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API.
    Serve(ServeArgs),
    /// Print summary statistics of the loaded series.
    Summary(ReportArgs),
    /// Print volatility metrics of the loaded series.
    Volatility(ReportArgs),
    /// Print the change point and price impact around one catalogued event.
    Event(EventArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `[server] host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `[server] port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ReportArgs {
    /// Print the API's JSON payload instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct EventArgs {
    /// The catalog id of the event.
    id: u32,

    /// Half-width of the impact window in days; defaults to `[analysis] impact_window_days`.
    #[arg(long, allow_negative_numbers = true)]
    window_days: Option<i64>,

    /// Print the API's JSON payload instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber: stdout always, plus daily rolling files when
/// a log directory is configured. `RUST_LOG` takes precedence over the
/// configured filter.
fn init_tracing(logging: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.filter)
            .with_context(|| format!("invalid log filter '{}'", logging.filter))?,
    };

    let stdout = match logging.format {
        LogFormat::Full => fmt::layer().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    let (file, guard) = match &logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "brent-insight.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .try_init()?;

    Ok(guard)
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    let server = &settings.server;
    let addr = server
        .socket_addr()
        .with_context(|| format!("invalid listen address {}:{}", server.host, server.port))?;

    tracing::info!(%addr, data = ?settings.data, "Starting the analytics API.");
    let context = web_server::load_context(&settings)?;
    web_server::run_server(addr, context).await
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

fn print_summary(context: &AnalyticsContext, json: bool) -> anyhow::Result<()> {
    let summary = match context.summary() {
        Ok(summary) => summary,
        Err(AnalyticsError::NotEnoughData(reason)) => {
            tracing::warn!(%reason, "Reporting a zeroed summary.");
            SummaryStatistics::zeroed(context.events().len(), context.change_points().len())
        }
        Err(e) => return Err(e.into()),
    };
    if json {
        return print_json(&summary);
    }

    let stats = &summary.price_statistics;
    let span = match (summary.date_range.start, summary.date_range.end) {
        (Some(start), Some(end)) => format!("{start} .. {end}"),
        _ => "-".to_string(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Days".to_string(), summary.total_days.to_string()]);
    table.add_row(vec!["Date range".to_string(), span]);
    table.add_row(vec!["Mean".to_string(), format!("{:.4}", stats.mean)]);
    table.add_row(vec!["Median".to_string(), format!("{:.4}", stats.median)]);
    table.add_row(vec!["Std".to_string(), fmt_opt(stats.std)]);
    table.add_row(vec!["Min".to_string(), format!("{:.4}", stats.min)]);
    table.add_row(vec!["Max".to_string(), format!("{:.4}", stats.max)]);
    table.add_row(vec!["Q1".to_string(), format!("{:.4}", stats.q1)]);
    table.add_row(vec!["Q3".to_string(), format!("{:.4}", stats.q3)]);
    table.add_row(vec!["Events".to_string(), summary.total_events.to_string()]);
    table.add_row(vec!["Change points".to_string(), summary.total_change_points.to_string()]);
    println!("{table}");
    Ok(())
}

fn print_volatility(context: &AnalyticsContext, json: bool) -> anyhow::Result<()> {
    let report = match context.volatility() {
        Ok(report) => report,
        Err(AnalyticsError::NotEnoughData(reason)) => {
            tracing::warn!(%reason, "Reporting zeroed volatility.");
            VolatilityReport::zeroed()
        }
        Err(e) => return Err(e.into()),
    };
    if json {
        return print_json(&report);
    }

    let latest = report
        .rolling_volatility
        .last()
        .map_or_else(|| "-".to_string(), |p| format!("{:.6} ({})", p.volatility, p.date));

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Daily volatility".to_string(), format!("{:.6}", report.daily_volatility)]);
    table.add_row(vec![
        "Annualized volatility".to_string(),
        format!("{:.6}", report.annualized_volatility),
    ]);
    table.add_row(vec![
        "Max drawdown".to_string(),
        format!("{:.2}%", report.max_drawdown * 100.0),
    ]);
    table.add_row(vec![
        "Rolling points".to_string(),
        report.rolling_volatility.len().to_string(),
    ]);
    table.add_row(vec!["Latest rolling".to_string(), latest]);
    println!("{table}");
    Ok(())
}

fn print_event(context: &AnalyticsContext, args: EventArgs) -> anyhow::Result<()> {
    let event = context
        .find_event(args.id)
        .with_context(|| format!("event {} is not in the catalog", args.id))?;
    tracing::info!(event_id = event.id, name = %event.name, "Correlating event.");
    let mut correlation = context.event_correlation(args.id)?;
    if args.window_days.is_some() {
        let event_date = event.date.to_string();
        correlation.price_analysis = context.event_impact(&event_date, args.window_days)?;
    }
    if args.json {
        return print_json(&correlation);
    }

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Event".to_string(), format!("{} (#{})", event.name, event.id)]);
    table.add_row(vec!["Date".to_string(), event.date.to_string()]);
    table.add_row(vec!["Type".to_string(), event.event_type.clone()]);
    table.add_row(vec!["Region".to_string(), event.region.clone()]);

    match &correlation.change_point {
        Some(cp) => {
            table.add_row(vec![
                "Change point".to_string(),
                format!("{} (p = {:.2})", cp.date, cp.probability),
            ]);
            table.add_row(vec![
                "Catalogued shift".to_string(),
                format!(
                    "{:.2} -> {:.2} ({:+.1}%)",
                    cp.before_mean, cp.after_mean, cp.change_percentage
                ),
            ]);
        }
        None => {
            table.add_row(vec!["Change point".to_string(), "-".to_string()]);
        }
    }

    match &correlation.price_analysis {
        ImpactWindow::Measured(analysis) => {
            table.add_row(vec!["Window".to_string(), format!("±{} days", analysis.window_days)]);
            table.add_row(vec!["Pre-event mean".to_string(), fmt_opt(analysis.pre_event_mean)]);
            table.add_row(vec!["Post-event mean".to_string(), fmt_opt(analysis.post_event_mean)]);
            table.add_row(vec!["Pre-event std".to_string(), fmt_opt(analysis.pre_event_std)]);
            table.add_row(vec!["Post-event std".to_string(), fmt_opt(analysis.post_event_std)]);
            table.add_row(vec!["Change".to_string(), fmt_opt(analysis.percentage_change)]);
        }
        ImpactWindow::NoData => {
            table.add_row(vec!["Price analysis".to_string(), "no prices in window".to_string()]);
        }
    }
    println!("{table}");
    Ok(())
}
