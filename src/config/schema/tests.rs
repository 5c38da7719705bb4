use super::*;

#[test]
fn test_defaults_are_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.agent.model, "gpt-4o-mini");
    assert_eq!(config.agent.max_iterations, 10);
    assert_eq!(config.providers.openai.api_base, "https://api.openai.com/v1");
    assert!(config.tools.weather.enabled);
    assert!(!config.tools.clients.enabled);
}

#[test]
fn test_empty_json_fills_defaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.agent.max_tokens, 4096);
    assert_eq!(config.agent.tool_timeout_secs, 60);
    assert_eq!(config.tools.clients.database_path, "~/.react-agent/clients.db");
}

#[test]
fn test_camel_case_keys() {
    let config: Config = serde_json::from_value(serde_json::json!({
        "agent": {"maxIterations": 3, "completionTimeoutSecs": 5, "maxRetries": 2},
        "providers": {"openai": {"apiKey": "sk-test", "apiBase": "http://localhost:8080/v1"}},
        "tools": {"clients": {"enabled": true, "databasePath": "/tmp/c.db"}}
    }))
    .unwrap();
    assert_eq!(config.agent.max_iterations, 3);
    assert_eq!(config.agent.completion_timeout_secs, 5);
    assert_eq!(config.agent.max_retries, 2);
    assert_eq!(config.providers.openai.api_key, "sk-test");
    assert!(config.tools.clients.enabled);

    let out = serde_json::to_value(&config).unwrap();
    assert_eq!(out["agent"]["maxIterations"], 3);
    assert_eq!(out["tools"]["clients"]["databasePath"], "/tmp/c.db");
}

#[test]
fn test_validate_rejects_bad_agent_values() {
    let cases: Vec<Box<dyn Fn(&mut Config)>> = vec![
        Box::new(|c| c.agent.max_iterations = 0),
        Box::new(|c| c.agent.max_iterations = 1001),
        Box::new(|c| c.agent.max_tokens = 0),
        Box::new(|c| c.agent.max_tokens = 2_000_000),
        Box::new(|c| c.agent.temperature = 2.5),
        Box::new(|c| c.agent.temperature = f32::NAN),
        Box::new(|c| c.agent.completion_timeout_secs = 0),
        Box::new(|c| c.agent.tool_timeout_secs = 0),
        Box::new(|c| c.agent.model = "  ".into()),
    ];
    for (i, mutate) in cases.iter().enumerate() {
        let mut config = Config::default();
        mutate(&mut config);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AgentError::Config(_)), "case {}", i);
    }
}

#[test]
fn test_validate_clients_needs_path() {
    let mut config = Config::default();
    config.tools.clients.enabled = true;
    config.tools.clients.database_path = String::new();
    assert!(config.validate().is_err());

    config.tools.clients.enabled = false;
    assert!(config.validate().is_ok());
}

#[test]
fn test_debug_redacts_secrets() {
    let mut config = Config::default();
    config.providers.openai.api_key = "sk-very-secret".into();
    config.tools.weather.api_key = "weather-secret".into();
    let debug = format!("{:?}", config);
    assert!(!debug.contains("sk-very-secret"));
    assert!(!debug.contains("weather-secret"));
    assert!(debug.contains("[REDACTED]"));
}
