use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL-wire connection URL (CockroachDB or Postgres)
    pub postgres_url: String,
    /// Session tag issued as `SET application_name` on every transaction
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Race-widening delay for contention demos
    #[serde(default)]
    pub chaos: ChaosConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChaosConfig {
    pub enabled: bool,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_ms: 25,
            max_ms: 175,
        }
    }
}

fn default_application_name() -> String {
    "roachbank".to_string()
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let yaml = r#"
log_level: info
log_dir: ./logs
log_file: roachbank.log
use_json: false
rotation: daily
gateway:
  host: 0.0.0.0
  port: 8080
postgres_url: postgresql://root@localhost:26257/roachbank?sslmode=disable
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.application_name, "roachbank");
        assert!(!config.chaos.enabled);
        assert_eq!(config.chaos.min_ms, 25);
        assert_eq!(config.chaos.max_ms, 175);
        assert_eq!(config.gateway.port, 8080);
    }
}
