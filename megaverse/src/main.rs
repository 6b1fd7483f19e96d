//! Megaverse placement runner.
//!
//! `phase-one` draws the Polyanet X; `phase-two` reproduces the goal map;
//! `clear` removes every object the goal map names. Configuration comes from
//! the environment (`CANDIDATE_ID`, `API_BASE_URL`, `MEGAVERSE_*`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use megaverse::exit_codes;
use megaverse::io::clock::SystemClock;
use megaverse::io::config::MegaverseConfig;
use megaverse::io::transport::HttpTransport;
use megaverse::logging;
use megaverse::phase::{Phase, build_client, run_phase};

#[derive(Parser)]
#[command(
    name = "megaverse",
    version,
    about = "Reconcile a Megaverse map against its goal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Place the Polyanet X on the 11x11 map.
    PhaseOne,
    /// Fetch the goal map and place every object it requires.
    PhaseTwo,
    /// Fetch the goal map and delete every object it names.
    Clear,
}

impl Command {
    fn phase(&self) -> Phase {
        match self {
            Self::PhaseOne => Phase::One,
            Self::PhaseTwo => Phase::Two,
            Self::Clear => Phase::Clear,
        }
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FATAL);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let cfg = MegaverseConfig::from_env().context("load configuration")?;
    let transport = HttpTransport::new(&cfg.api_base_url, cfg.request_timeout)?;
    let mut client = build_client(&cfg, transport, SystemClock);

    let summary = run_phase(cli.command.phase(), &cfg, &mut client)?;
    println!("summary: {summary}");
    if summary.is_complete() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::PARTIAL)
    }
}
