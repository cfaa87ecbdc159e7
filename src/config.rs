use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub enable_tracing: bool,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Payout provider connection settings. With `use_sandbox` the HTTP client
/// is never built and the credentials may stay empty.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    pub use_sandbox: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            use_sandbox: true,
            base_url: "https://api.sandbox.example.com/v1".to_string(),
            api_key: None,
            api_secret: None,
            timeout_secs: 10,
        }
    }
}

/// Webhook signature verification. With no secret configured, signatures
/// are not checked (sandbox/demo mode).
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct WebhookConfig {
    pub secret: Option<String>,
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}
