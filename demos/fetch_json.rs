//! Fetch and decode a JSON document.
//!
//! ```bash
//! cargo run --example fetch_json
//! ```
//!
//! Env vars:
//! - `BASE_URL` (default: `https://httpbin.org`)
//! - `ENDPOINT_PATH` (default: `json`)

use async_networking::{
    DataTransferService, DefaultDataTransferService, DefaultNetworkService, Endpoint, LogConfig,
    NetworkConfig,
};
use http::{HeaderValue, header::ACCEPT};
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = env_or("BASE_URL", "https://httpbin.org");
    let path = env_or("ENDPOINT_PATH", "json");

    let config = NetworkConfig::parse(&base_url)?
        .with_header(ACCEPT, HeaderValue::from_static("application/json"));

    let network = DefaultNetworkService::builder(config)
        .log_config(LogConfig::enabled())
        .build()?;
    let service = DefaultDataTransferService::new(network).with_log_config(LogConfig::enabled());

    let value: Value = service.request(&Endpoint::get(path)).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
