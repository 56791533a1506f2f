use std::path::PathBuf;

use clap::Parser;

use crate::script::DEFAULT_SCRIPT;

/// framelink-sim: play a host/client session against the in-memory browser.
#[derive(Parser, Debug)]
#[command(name = "framelink-sim", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override, e.g. `framelink=debug`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Room to join, overriding the config.
    #[arg(short, long)]
    pub room: Option<String>,

    /// Client domain, overriding the config.
    #[arg(long)]
    pub domain: Option<String>,

    /// Comma-separated steps to play.
    #[arg(short, long, default_value = DEFAULT_SCRIPT)]
    pub script: String,

    /// Print the transcript as JSON lines.
    #[arg(long)]
    pub json: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
