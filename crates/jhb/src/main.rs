use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use jhb_core::config::Config;
use jhb_mongo::MongoStore;
use jhb_telegram::router::RunMode;

#[derive(Parser)]
#[command(name = "jhb")]
#[command(version, about = "Telegram bot that hides join/leave notifications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy)]
enum Mode {
    /// Long-poll Telegram for updates (default)
    Polling,
    /// Register a webhook and serve updates over HTTP
    Webhook,
}

impl From<Mode> for RunMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Polling => RunMode::Polling,
            Mode::Webhook => RunMode::Webhook,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    jhb_core::logging::init("jhb")?;

    let cfg = Arc::new(Config::load()?);
    let store = MongoStore::connect(&cfg.mongodb_uri, &cfg.mongodb_database)
        .await
        .context("failed to connect to MongoDB")?;

    let mode = cli.mode.map(RunMode::from).unwrap_or_default();
    jhb_telegram::router::run(mode, cfg, Arc::new(store)).await
}
