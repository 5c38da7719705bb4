use crate::agent::tools::ToolRegistry;
use crate::agent::tools::clients::{ClientStore, client_tools};
use crate::agent::tools::weather::{CurrentTemperatureTool, TemperatureForecastTool, WeatherApi};
use crate::config::Config;
use crate::errors::AgentResult;
use crate::utils::expand_home;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Build the registry for everything the config enables.
pub fn register_all_tools(config: &Config) -> AgentResult<ToolRegistry> {
    let mut tools =
        ToolRegistry::with_default_timeout(Duration::from_secs(config.agent.tool_timeout_secs));

    register_weather(&mut tools, config)?;
    register_clients(&mut tools, config)?;

    info!("Registered {} tool(s): {}", tools.len(), tools.tool_names().join(", "));
    Ok(tools)
}

fn register_weather(registry: &mut ToolRegistry, config: &Config) -> AgentResult<()> {
    let weather = &config.tools.weather;
    if !weather.enabled {
        return Ok(());
    }
    if weather.api_key.is_empty() {
        warn!("Weather tools enabled but no API key is configured; skipping");
        return Ok(());
    }

    let api = Arc::new(WeatherApi::with_base_url(
        weather.api_key.clone(),
        &weather.api_base,
    ));
    registry.register(Arc::new(CurrentTemperatureTool::new(api.clone())))?;
    registry.register(Arc::new(TemperatureForecastTool::new(api)))?;
    Ok(())
}

fn register_clients(registry: &mut ToolRegistry, config: &Config) -> AgentResult<()> {
    let clients = &config.tools.clients;
    if !clients.enabled {
        return Ok(());
    }

    let path = expand_home(&clients.database_path);
    let store = ClientStore::open(&path)
        .with_context(|| format!("Failed to open clients database {}", path.display()))?;
    for tool in client_tools(Arc::new(store)) {
        registry.register(tool)?;
    }
    Ok(())
}
