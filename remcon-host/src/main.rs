//! remcon-host — hosts the remote command console (Server role).
//!
//! ```text
//! remcon-host                    Serve on the configured address
//! remcon-host --address IP:PORT  Override the bind address
//! remcon-host --config <path>    Load a custom config TOML
//! remcon-host --gen-config       Write the default config to stdout
//! ```
//!
//! The host runs a fixed-rate tick loop, pumps the transport once per tick,
//! and wires in a minimal console executor that echoes every remote command
//! back to the peer.

mod config;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use remcon_core::NetSystem;

use crate::config::HostConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "remcon-host", about = "remcon remote console host")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "remcon-host.toml")]
    config: PathBuf,

    /// Override the configured bind address ("A.B.C.D:PORT").
    #[arg(short, long)]
    address: Option<String>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Console executor ─────────────────────────────────────────────

/// Minimal console command executor standing in for the host
/// application's real console.
///
/// `Echo Message=<text>` replies with `<text>`; anything else replies with
/// an unknown-command notice. Commands arriving over the transport are
/// remote-origin by definition and are logged as such.
fn execute(command: &str) -> String {
    match command.split_once(' ') {
        Some(("Echo", args)) => args.strip_prefix("Message=").unwrap_or(args).to_string(),
        _ => format!("Unknown command: {command}"),
    }
}

// ── Main ─────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&HostConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    // Load config.
    let mut config = HostConfig::load(&cli.config);
    if let Some(address) = cli.address {
        config.console.host_address = address;
    }
    config.console.role = "server".into();

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("remcon-host v{}", env!("CARGO_PKG_VERSION"));
    info!("console address: {}", config.console.host_address);
    info!("tick rate: {} Hz", config.tick_rate_hz);

    // Setup failures here are fatal: a server that cannot listen cannot
    // provide the console at all.
    let mut net = NetSystem::start_up(&config.console)?;
    let tick = Duration::from_millis(1000 / config.tick_rate_hz.max(1));

    let mut replies: Vec<String> = Vec::new();
    loop {
        let mut executor = |command: &str| {
            info!(command, "remote command");
            replies.push(execute(command));
        };
        net.begin_frame(&mut executor);

        for reply in replies.drain(..) {
            net.send(reply);
        }
        std::thread::sleep(tick);
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_command_extracts_message() {
        assert_eq!(execute("Echo Message=hi"), "hi");
        assert_eq!(execute("Echo hello"), "hello");
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(execute("Quit"), "Unknown command: Quit");
        assert!(execute("Warp Level=3").starts_with("Unknown command"));
    }
}
