mod app;

use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use fleetquery_core::{
    config::{self, AppConfig},
    GameMode, Session, WorldSnapshot,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

const DEMO_WORLD: &str = include_str!("../assets/demo_world.json");

#[tokio::main]
async fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config)?;

    let world = load_world(&config)?;
    let session = build_session(&config, &world);
    info!(
        companies = world.companies.len(),
        vehicles = world.vehicles.len(),
        towns = world.towns.len(),
        industries = world.industries.len(),
        editor = config.editor_mode,
        "World loaded"
    );

    let mut app = app::ConsoleApp::new(world, session);
    app.run().await
}

fn load_world(config: &AppConfig) -> Result<WorldSnapshot> {
    match &config.world_path {
        Some(path) => WorldSnapshot::load(path),
        None => WorldSnapshot::from_json(DEMO_WORLD).context("bundled demo world is invalid"),
    }
}

fn build_session(config: &AppConfig, world: &WorldSnapshot) -> Session {
    let mode = if config.editor_mode {
        GameMode::Editor
    } else {
        GameMode::Normal
    };
    let session = Session::new()
        .with_company(world.local_company)
        .with_mode(mode)
        .networked(config.networked);
    match config.rng_seed {
        Some(seed) => session.with_seed(seed),
        None => session,
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_dir = &config.log_dir;
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("fleetquery.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
