use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Lifetime of a "remember me" session
    #[serde(default = "default_remember_days")]
    pub remember_days: i64,
    /// Server-side lifetime of a browser-session login
    #[serde(default = "default_session_hours")]
    pub session_hours: i64,
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_remember_days() -> i64 {
    7
}

fn default_session_hours() -> i64 {
    24
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            remember_days: default_remember_days(),
            session_hours: default_session_hours(),
            cookie_secure: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: "data/app.db".into(),
            },
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "data/app.db"

[server]
host = "0.0.0.0"
port = 3000

[auth]
remember_days = 7
session_hours = 24
cookie_secure = false
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    anyhow::ensure!(
        config.auth.remember_days > 0 && config.auth.session_hours > 0,
        "auth lifetimes must be positive"
    );
    Ok(config)
}

/// Process-wide configuration, loaded on first use
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        load_config().unwrap_or_else(|e| {
            tracing::error!("Invalid config.toml, using defaults: {}", e);
            Config::default()
        })
    })
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> PathBuf {
    let db_path = Path::new(&config.database.path);

    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(db_path);
        }
    }

    PathBuf::from(&config.database.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "data/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.remember_days, 7);
        assert!(!config.auth.cookie_secure);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[database]\npath = \"/tmp/x.db\"\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.session_hours, 24);
        assert_eq!(get_database_path(&config), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_rejects_non_positive_lifetimes() {
        let toml = "[database]\npath = \"a.db\"\n[auth]\nremember_days = 0\n";
        assert!(parse_config(toml).is_err());
    }
}
