//! remcon-term — interactive remote console client (Client role).
//!
//! ```text
//! remcon-term                    Connect to the configured address
//! remcon-term --address IP:PORT  Override the server address
//! remcon-term --config <path>    Load a custom config TOML
//! remcon-term --gen-config       Write the default config to stdout
//! ```
//!
//! Each line typed on stdin is shipped to the server as one console
//! command; replies are printed as they arrive. The transport itself stays
//! single-threaded — a side thread only feeds stdin lines into a channel
//! that the tick loop drains.

mod config;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use remcon_core::NetSystem;

use crate::config::TermConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "remcon-term", about = "remcon remote console terminal")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "remcon-term.toml")]
    config: PathBuf,

    /// Override the configured server address ("A.B.C.D:PORT").
    #[arg(short, long)]
    address: Option<String>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&TermConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let mut config = TermConfig::load(&cli.config);
    if let Some(address) = cli.address {
        config.console.host_address = address;
    }
    config.console.role = "client".into();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("remcon-term v{}", env!("CARGO_PKG_VERSION"));

    let mut net = NetSystem::start_up(&config.console)?;
    let tick = Duration::from_millis(1000 / config.tick_rate_hz.max(1));

    // stdin feeder: lines go into a channel; dropping the sender on EOF
    // tells the tick loop to wind down.
    let (line_tx, line_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdin_closed = false;
    loop {
        net.begin_frame(&mut |message: &str| println!("{message}"));

        loop {
            match line_rx.try_recv() {
                Ok(line) => {
                    if !line.is_empty() {
                        net.send(line);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    stdin_closed = true;
                    break;
                }
            }
        }

        // Exit once stdin is done and everything queued has been flushed.
        if stdin_closed && net.queue_depth() == 0 {
            break;
        }
        std::thread::sleep(tick);
    }

    net.shutdown();
    Ok(())
}
