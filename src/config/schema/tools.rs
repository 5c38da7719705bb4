use serde::{Deserialize, Serialize};

fn default_weather_api_base() -> String {
    crate::agent::tools::weather::DEFAULT_API_BASE.to_string()
}

fn default_database_path() -> String {
    "~/.react-agent/clients.db".to_string()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "super::default_true")]
    pub enabled: bool,
    #[serde(default, rename = "apiKey")]
    pub api_key: String,
    #[serde(default = "default_weather_api_base", rename = "apiBase")]
    pub api_base: String,
}

redact_debug!(WeatherConfig, enabled, redact(api_key), api_base,);

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            api_base: default_weather_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientsConfig {
    #[serde(default)]
    pub enabled: bool,
    /// SQLite file; a leading `~` expands to the home directory.
    #[serde(default = "default_database_path", rename = "databasePath")]
    pub database_path: String,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolsConfig {
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub clients: ClientsConfig,
}
