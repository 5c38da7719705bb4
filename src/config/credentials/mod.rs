use super::schema::Config;
use tracing::debug;

macro_rules! define_env_overrides {
    ($( $name:literal => [$($env:literal),+] => $($path:ident).+ );* $(;)?) => {
        /// (setting name, env vars in priority order) pairs.
        pub const ENV_OVERRIDES: &[(&str, &[&str])] = &[$(($name, &[$($env),+])),*];

        /// Apply overrides using `lookup` to resolve variable names.
        ///
        /// For each setting the first variable that is set and non-empty wins.
        pub fn apply_overrides_with<F>(config: &mut Config, lookup: F)
        where
            F: Fn(&str) -> Option<String>,
        {
            $(
                if let Some((var, val)) = [$($env),+]
                    .into_iter()
                    .find_map(|var| lookup(var).filter(|v| !v.is_empty()).map(|v| (var, v)))
                {
                    debug!("{} overridden from {}", $name, var);
                    config.$($path).+ = val;
                }
            )*
        }
    };
}

define_env_overrides! {
    "openai-api-key"   => ["REACT_AGENT_OPENAI_API_KEY", "OPENAI_API_KEY"]   => providers.openai.api_key;
    "openai-api-base"  => ["REACT_AGENT_OPENAI_API_BASE"]                    => providers.openai.api_base;
    "weather-api-key"  => ["REACT_AGENT_WEATHER_API_KEY", "WEATHER_API_KEY"] => tools.weather.api_key;
    "database-path"    => ["REACT_AGENT_DATABASE_PATH"]                      => tools.clients.database_path;
}

/// Apply environment variable overrides, so secrets can be injected without
/// touching the config file.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_with(config, |var| std::env::var(var).ok());
}
