#![cfg(not(tarpaulin_include))]

use hr_dashboard::app;
use std::env;
use std::path::PathBuf;

/// Main entry point for the dashboard server
///
/// Initializes logging and starts the web application. Configuration comes
/// from environment variables with fixed defaults; there are no CLI flags.
///
/// # Environment
/// * `HR_BIND_ADDR` - Listen address, default `127.0.0.1:3000`
/// * `HR_DATA_PATH` - Default spreadsheet location, default `dados_rh.xlsx`
/// * `RUST_LOG` - Log filter, via env_logger
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let bind_addr = env::var("HR_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let data_path =
        PathBuf::from(env::var("HR_DATA_PATH").unwrap_or_else(|_| "dados_rh.xlsx".to_string()));

    app::run(&bind_addr, data_path).await
}
