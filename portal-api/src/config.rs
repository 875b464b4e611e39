use std::{str::FromStr, time::Duration};

use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use strum::{Display, EnumString};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub search: SearchSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub app_url: String,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Server-side defaults for `GET /search`.
#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub backend: SearchBackend,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub result_limit: usize,
    /// Upper bound for a caller-supplied `limit`.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_limit: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub min_query_length: usize,
    #[serde(default)]
    pub rank_results: bool,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub request_timeout_secs: u64,
}

impl SearchSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where search rows come from.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum SearchBackend {
    #[strum(ascii_case_insensitive, serialize = "postgres")]
    Postgres,
    /// Empty in-memory directory, for running the API without a database.
    #[strum(ascii_case_insensitive, serialize = "memory")]
    Memory,
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| config::ConfigError::Message(format!("Failed to parse APP_ENVIRONMENT: {e}")))?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("PORTAL")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
