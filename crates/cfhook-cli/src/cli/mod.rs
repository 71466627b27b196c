//! CLI argument parsing and hook dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Hook};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config;
use commands::Context;

/// Run the hook.
pub async fn run() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.hook {
        Hook::DeployChallenge(hook_args) => {
            let ctx = Context::from_env()?;
            commands::deploy::execute(&ctx, &hook_args).await
        }
        Hook::CleanChallenge(hook_args) => {
            let ctx = Context::from_env()?;
            commands::clean::execute(&ctx, &hook_args).await
        }
        Hook::DeployCert(_) | Hook::UnchangedCert(_) => {
            debug!("nothing to do for this hook");
            Ok(())
        }
        Hook::Other(argv) => {
            debug!(hook = ?argv.first(), "ignoring unhandled hook");
            Ok(())
        }
    }
}

/// Log to stderr; dehydrated captures hook stdout.
fn init_tracing() {
    let default_level = if config::debug_enabled() { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
