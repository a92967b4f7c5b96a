/*
[INPUT]:  CLI arguments, YAML configuration file, OS interrupt signal
[OUTPUT]: One admin command executed against the Veygo backend
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or interrupt handling
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use veygo_admin_console::{Command, ConsoleConfig, commands};

#[derive(Parser, Debug)]
#[command(name = "veygo-admin", version, about = "Veygo apartment admin console")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = ConsoleConfig::load(args.config_path.as_deref()).context("load config")?;
    info!(
        base_url = %config.base_url,
        debug_mode = config.debug_mode,
        "configuration loaded"
    );

    let session = config.build_session()?;
    info!(
        authenticated = session.credential().is_authenticated(),
        "credential loaded"
    );

    let command = commands::run(&session, args.command);
    let result = commands::run_until_interrupted(command, tokio::signal::ctrl_c()).await;
    if let Err(err) = &result
        && commands::is_transient(err)
    {
        eprintln!(
            "{}",
            style("Temporary failure talking to Veygo, try again shortly.").yellow()
        );
    }
    result
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
