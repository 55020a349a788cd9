use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// This main function is the entry point when running `cargo run -p web-server`.
// It serves the API with the settings from `config.toml`; the `brent-insight`
// binary offers the same through `brent-insight serve` plus file logging.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configuration::load_config(Path::new("config.toml"))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr = settings.server.socket_addr()?;
    let context = web_server::load_context(&settings)?;
    web_server::run_server(addr, context).await
}
