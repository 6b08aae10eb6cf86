use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub cors_permissive: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            cors_permissive: false,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_pool_size() -> u32 {
    10
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Run `vault init` to create one.",
                path.display(),
                e
            )
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config pointing at `database_path` with every other setting defaulted.
    pub fn with_database(database_path: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                path: database_path.into(),
                pool_size: default_pool_size(),
            },
            api: ApiConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            anyhow::bail!("database.path must not be empty");
        }
        if self.database.pool_size == 0 || self.database.pool_size > 64 {
            anyhow::bail!("database.pool_size must be between 1 and 64");
        }
        if self.api.max_body_bytes == 0 {
            anyhow::bail!("api.max_body_bytes must be greater than 0");
        }
        Ok(())
    }

    /// The starter file written by `vault init`.
    pub fn default_toml() -> String {
        format!(
            r#"[server]
host = "{}"
port = {}

[database]
path = "./data/vault.db"
pool_size = {}

[api]
max_body_bytes = {}
cors_permissive = false
"#,
            default_host(),
            default_port(),
            default_pool_size(),
            default_max_body_bytes()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toml_parses() {
        let config = Config::from_toml(&Config::default_toml()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "./data/vault.db");
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.api.max_body_bytes, 1024 * 1024);
        assert!(!config.api.cors_permissive);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_toml("[database]\npath = \"vault.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.pool_size, 10);
    }

    #[test]
    fn test_missing_database_section_fails() {
        assert!(Config::from_toml("[server]\nport = 8080\n").is_err());
    }

    #[test]
    fn test_rejects_zero_pool() {
        let err = Config::from_toml("[database]\npath = \"vault.db\"\npool_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("pool_size"));
    }

    #[test]
    fn test_rejects_zero_body_limit() {
        let toml = "[database]\npath = \"vault.db\"\n\n[api]\nmax_body_bytes = 0\n";
        assert!(Config::from_toml(toml).is_err());
    }
}
