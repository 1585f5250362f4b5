//! Pathy CLI binary entry point.
//! Resolves settings once, reads the variable and dispatches.

use clap::Parser;
use pathy::cli::Cli;
use pathy::config;
use pathy::dispatch::{self, Context, Registry};
use pathy::side_channel::SideChannel;
use pathy::utils;
use std::io::{self, Write};

/// Log to stderr only; stdout and descriptor 3 carry command output.
/// Level is controlled by `PATHY_LOG` (default: warn).
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_env("PATHY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .compact()
        .try_init()
        .ok();
}

fn main() {
    // Usage errors and clap's own help both exit 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    init_tracing();

    let settings = config::resolve_effective(
        cli.var.as_deref(),
        cli.output.as_deref(),
        cli.config_dir.as_deref(),
    );
    let registry = Registry::new(settings.known.clone());
    let value = std::env::var_os(&settings.var).unwrap_or_default();
    tracing::debug!(var = %settings.var, bytes = value.len(), "read variable");
    let ctx = Context::new(settings, registry, value, SideChannel::inherited());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let code = match dispatch::dispatch(cli.cmd, &ctx, &mut input, &mut out) {
        Ok(code) => code,
        Err(e) => {
            let _ = out.flush();
            eprintln!("{} {}", utils::error_prefix(), e);
            1
        }
    };
    let _ = out.flush();
    std::process::exit(code);
}
