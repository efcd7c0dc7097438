use clap::Parser;
use tracing::debug;

use smartslug::cli::Cli;
use smartslug::config::{get_config, init_config};
use smartslug::interfaces::cli::run_cli_command;
use smartslug::system::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 配置必须在日志之前加载
    init_config(cli.config.as_deref());
    let config = get_config();
    let _log_guard = init_logging(&config.logging)?;
    debug!("smartslug {} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_cli_command(cli.command, cli.json).await {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }
    Ok(())
}
