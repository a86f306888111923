use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use kiosk::{util, App, Config};

#[derive(Debug, Parser)]
#[command(name = "kiosk", version, about = "Terminal storefront client")]
struct Cli {
    /// Commerce API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Payment tokenizer URL
    #[arg(long)]
    tokenizer_url: Option<String>,

    /// Identity file used to derive the device fingerprint
    #[arg(long)]
    identity: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to file (~/.kiosk/logs/kiosk.log); stdout belongs to the UI
    fs::create_dir_all(util::paths::logs_dir())?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::paths::log_file_path())?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let mut config = Config::load(cli.config.as_deref());
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(tokenizer_url) = cli.tokenizer_url {
        config.tokenizer_url = tokenizer_url;
    }
    if let Some(identity) = cli.identity {
        config.identity_path = identity;
    }

    let mut app = App::new(config)?;
    app.run().await
}
