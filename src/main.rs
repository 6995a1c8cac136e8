use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use aircooler2http::{api, appliance::ControlEngine, bus, config::{self, Config}, driver, logging};


#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    logging::init(config.log_filter.as_deref())?;

    let engine = ControlEngine::new(config.initial_state());

    tokio::spawn(bus::log_events(engine.subscribe()));

    let driver = driver::spawn(engine.clone(), config.tick_period());

    let listener = config::bind(&config.listen).await?;
    info!(listen = %config.listen, "serving appliance API");

    axum::serve(listener, api::router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    driver.abort();

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("ctrl-c received, shutting down"),
        Err(err) => {
            // without a signal handler, run until killed
            warn!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await
        }
    }
}
