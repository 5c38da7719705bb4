use serde::{Deserialize, Serialize};

fn default_openai_api_base() -> String {
    crate::providers::openai::DEFAULT_API_BASE.to_string()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    #[serde(default, rename = "apiKey")]
    pub api_key: String,
    #[serde(default = "default_openai_api_base", rename = "apiBase")]
    pub api_base: String,
}

redact_debug!(OpenAIConfig, redact(api_key), api_base,);

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_openai_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: OpenAIConfig,
}
