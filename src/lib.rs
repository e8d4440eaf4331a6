use clap::Parser;
use log::debug;

pub mod active;
pub mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod render;
pub mod secrets;
pub mod worklog;

use cli::Cli;
use context::AppContext;

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Parses arguments, runs one command and returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();

    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level(cli.verbose)),
    )
    .format_timestamp_millis()
    .try_init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start runtime: {err}");
            return 1;
        }
    };

    let result: error::Result<()> = runtime.block_on(async {
        let ctx = AppContext::load(cli.config_dir)?;
        debug!("config directory {}", ctx.config_dir().display());
        commands::dispatch(&ctx, cli.command).await
    });

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {err}");
            1
        }
    }
}
