#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod ui;
mod worker;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lingopad=info")),
        )
        .init();
    info!("starting");

    // Config: load from config.json (next to exe). Env vars override if present.
    let mut cfg = config::Config::load();
    if let Ok(v) = std::env::var("LINGOPAD_BASE_URL") {
        if !v.is_empty() {
            cfg.base_url = v;
        }
    }
    if let Ok(v) = std::env::var("LINGOPAD_TARGET_LANG") {
        if !v.is_empty() {
            cfg.target_lang = v;
        }
    }
    if let Ok(v) = std::env::var("LINGOPAD_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(n) => cfg.request_timeout_secs = n,
            Err(_) => warn!("ignoring unparseable LINGOPAD_TIMEOUT_SECS={}", v),
        }
    }
    info!(base_url = %cfg.base_url, target_lang = %cfg.target_lang, "config loaded");

    // Write the defaults out on first run so there is a file to edit.
    if !config::Config::path().exists() {
        if let Err(e) = cfg.save() {
            warn!("could not write initial config.json: {}", e);
        }
    }

    let client = api::ApiClient::new(
        &cfg.base_url,
        &cfg.target_lang,
        Duration::from_secs(cfg.request_timeout_secs),
    )?;
    let (job_tx, completion_rx) = worker::spawn(client);

    // Run UI on main thread (blocks)
    ui::run(job_tx, completion_rx);
    Ok(())
}
