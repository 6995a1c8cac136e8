use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use url::Url;

use crate::appliance::{limits::{DEFAULT_TARGET_HUMIDITY, DEFAULT_TARGET_TEMPERATURE}, ApplianceState};


/// Simulated evaporative air cooler with an HTTP control API
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// URL to serve the API on
    ///
    /// only http://host:port URLs are supported
    #[arg(long, default_value = "http://0.0.0.0:5000")]
    pub listen: Url,

    /// Milliseconds between sensor ticks
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Log filter directives (e.g. `debug` or `aircooler2http::driver=trace`)
    ///
    /// falls back to RUST_LOG, then `info`
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Target temperature at startup, °C
    #[arg(long, default_value_t = DEFAULT_TARGET_TEMPERATURE, allow_negative_numbers = true)]
    pub target_temperature: f64,

    /// Target humidity at startup, %
    #[arg(long, default_value_t = DEFAULT_TARGET_HUMIDITY, allow_negative_numbers = true)]
    pub target_humidity: f64,
}

impl Config {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// The appliance as it is when the process starts.
    pub fn initial_state(&self) -> ApplianceState {
        ApplianceState {
            target_temperature: self.target_temperature,
            target_humidity: self.target_humidity,
            ..Default::default()
        }
    }
}


/// Bind a listener for the API at `url`.
pub async fn bind(url: &Url) -> Result<TcpListener> {
    match url.scheme() {
        "http" => {
            let addrs = url.socket_addrs(|| None)
                .with_context(|| format!("failed to resolve listen address: {url}"))?;

            let listener = TcpListener::bind(&addrs[..]).await
                .with_context(|| format!("failed to listen on {url}"))?;

            Ok(listener)
        },
        other => {
            bail!("url scheme {other} not supported");
        }
    }
}
