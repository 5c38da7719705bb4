pub mod credentials;
pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{
    AgentConfig, ClientsConfig, Config, DEFAULT_SYSTEM_PROMPT, OpenAIConfig, ProvidersConfig,
    ToolsConfig, WeatherConfig,
};
