//! Terminal UI for the BatGPT mock chat.

use anyhow::Context;
use batgpt_config::LayeredConfigOptions;
use batgpt_core::SessionStore;
use batgpt_tui::TuiConfig;
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Command-line options for the TUI.
#[derive(Parser)]
#[command(name = "batgpt", version, about = "Mock AI chat for film sets")]
struct Cli {
    /// Optional batgpt.json5 applied on top of the user and cwd layers
    #[arg(long)]
    config: Option<PathBuf>,
    /// Delay before the mock reply, in milliseconds
    #[arg(long)]
    reply_delay_ms: Option<u64>,
    /// Start with an empty conversation history
    #[arg(long)]
    no_seed: bool,
}

/// Entry point for the BatGPT TUI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting TUI (config_set={}, reply_delay_set={}, no_seed={})",
        cli.config.is_some(),
        cli.reply_delay_ms.is_some(),
        cli.no_seed
    );
    let cwd = std::env::current_dir().context("cwd")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let mut config =
        batgpt_tui::load_config(LayeredConfigOptions::new(&cwd), cli.config.as_deref())?;

    if let Some(delay_ms) = cli.reply_delay_ms {
        config.reply.delay_ms = delay_ms;
    }
    if cli.no_seed {
        config.history.seed_examples = false;
    }

    let store = SessionStore::from_config(&config);
    batgpt_tui::run(store, TuiConfig::from_config(&config)).await
}
