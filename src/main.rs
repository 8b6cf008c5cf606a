use anyhow::Result;
use backtest_bot::{
    run_configs::{fetch_trades, ledger_report, submit_strategy},
    utils::{config::AppConfig, logging::setup_logging},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "backtest-bot", version, about = "Submit backtests and read their trade logs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a backtest described by a JSON request file
    Submit {
        request: PathBuf,
        /// Read the strategy source from this file instead of the request
        #[arg(long)]
        code: Option<PathBuf>,
    },
    /// Fetch and summarise the trade log of a finished run
    Trades {
        strategy_id: Uuid,
        #[arg(long)]
        user: String,
    },
    /// Summarise a trade log saved on disk
    Ledger {
        file: PathBuf,
        #[arg(long)]
        summary_only: bool,
    },
}

#[actix::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    setup_logging(&config.log_level)?;

    match cli.command {
        Command::Submit { request, code } => {
            submit_strategy::run(&config, &request, code.as_deref()).await
        }
        Command::Trades { strategy_id, user } => {
            fetch_trades::run(&config, strategy_id, &user).await
        }
        Command::Ledger { file, summary_only } => ledger_report::run(&file, summary_only).await,
    }
}
