//! framelink-sim: drive a host page and its framed conferencing client
//! through a scripted session on the in-memory browser.
//!
//! Commands, handshakes, and events travel through the same bridge code a
//! real page runs; only the browser underneath is simulated. The host's
//! received events are printed as a transcript.

mod cli;
mod script;
mod session;

use framelink_common::ConfigError;
use framelink_config::{toml_loader, validation, FramelinkConfig};
use tracing_subscriber::EnvFilter;

use crate::script::parse_script;
use crate::session::SimSession;

fn load_config(args: &cli::Args) -> Result<FramelinkConfig, ConfigError> {
    match &args.config {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

fn main() {
    let args = cli::parse();

    // Config decides the default log level, so it is read before logging
    // starts and any failure is reported afterwards.
    let loaded = load_config(&args);
    let default_directive = loaded
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or("framelink=info");
    let log_directive = args.log_level.as_deref().unwrap_or(default_directive);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "framelink=info".parse().expect("static directive")),
            ),
        )
        .init();

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        FramelinkConfig::default()
    });
    if let Some(room) = &args.room {
        config.host.options.room = room.clone();
    }
    if let Some(domain) = &args.domain {
        config.host.domain = domain.clone();
    }
    if let Err(e) = validation::validate(&config) {
        tracing::error!("{e}");
        std::process::exit(2);
    }

    let steps = match parse_script(&args.script) {
        Ok(steps) => steps,
        Err(e) => {
            tracing::error!("Bad script: {e}");
            std::process::exit(2);
        }
    };

    let mut session = match SimSession::new(&config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to mount client: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(url = %session.host().frame_url(), "Client frame mounted");

    for step in &steps {
        tracing::debug!(%step, "Step");
        session.apply(step);
    }

    for record in session.transcript() {
        if args.json {
            match serde_json::to_string(&record) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("Failed to encode record: {e}"),
            }
        } else {
            println!("{:>7}ms  {:<14} {}", record.at_ms, record.event, record.payload);
        }
    }
    tracing::info!(
        events = session.transcript().len(),
        ready = session.host().is_ready(),
        "Session finished"
    );
}
