//! framewm binary
//!
//! Sets up logging and configuration, then hands control to the window manager.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use framewm::config::Config;
use framewm::wm::WindowManager;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "framewm=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting framewm");

    let config = Config::load().context("Failed to load configuration")?;

    let mut wm = WindowManager::create(&config).context("Failed to initialize window manager")?;
    wm.run().context("Window manager stopped")?;

    info!("Window manager exited");
    Ok(())
}
