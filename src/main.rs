use dotenvy::dotenv;
use impact_engine::{
    config::{self, AppConfig},
    errors::{Error, Result},
    scenario,
};
use std::{env, path::Path};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load configuration: IMPACT_ENGINE_CONFIG, then ./config.toml, then built-ins
    let app_config = load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Run the scenario named on the command line
    let scenario_path = env::args().nth(1).ok_or_else(|| Error::Validation {
        message: "Usage: impact-engine <scenario.toml>".to_string(),
    })?;
    let scenario = scenario::load_scenario(&scenario_path)
        .inspect_err(|e| error!("Failed to load scenario {}: {}", scenario_path, e))?;
    let report = scenario::run(&scenario, &app_config)?;

    info!(
        climate = report.lca.totals.climate,
        quality = %report.lca.data_quality.label,
        obligations = report.obligations.len(),
        "Calculated scenario '{}'",
        report.name
    );

    let json = serde_json::to_string_pretty(&report).map_err(|e| Error::Validation {
        message: format!("Failed to serialize report: {e}"),
    })?;
    println!("{json}");
    Ok(())
}

fn load_app_configuration() -> Result<AppConfig> {
    if let Ok(path) = env::var("IMPACT_ENGINE_CONFIG") {
        return config::load_config(path);
    }
    if Path::new("config.toml").exists() {
        return config::load_default_config();
    }
    info!("No config.toml found, using built-in defaults.");
    Ok(AppConfig::default())
}
