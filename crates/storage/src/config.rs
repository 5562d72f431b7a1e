//! Connection parameters for the CPT database.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

use crate::error::{StoreError, StoreResult};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "CPT_DB";

/// Database location and credentials, supplied by the caller.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    /// How long `connect` waits for the first connection (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Schema the session works in (`search_path`); server default when `None`
    #[serde(default)]
    pub schema: Option<String>,
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            database: "cpt".to_string(),
            connect_timeout_secs: default_connect_timeout(),
            schema: None,
        }
    }
}

impl ConnectionParams {
    /// Load from `CPT_DB_USER`, `CPT_DB_PASSWORD`, `CPT_DB_HOST`, `CPT_DB_PORT`,
    /// `CPT_DB_NAME`, `CPT_DB_CONNECT_TIMEOUT` and `CPT_DB_SCHEMA`, falling back
    /// to defaults.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_env_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Load from `{prefix}_USER`, `{prefix}_PASSWORD`, ... as in `from_env`.
    pub fn from_env_prefix(prefix: &str) -> StoreResult<Self> {
        let defaults = Self::default();
        let var = |name: &str| env::var(format!("{}_{}", prefix, name)).ok();

        Ok(Self {
            username: var("USER").unwrap_or(defaults.username),
            password: var("PASSWORD").unwrap_or(defaults.password),
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_var(prefix, "PORT", var("PORT"))?.unwrap_or(defaults.port),
            database: var("NAME").unwrap_or(defaults.database),
            connect_timeout_secs: parse_var(prefix, "CONNECT_TIMEOUT", var("CONNECT_TIMEOUT"))?
                .unwrap_or(defaults.connect_timeout_secs),
            schema: var("SCHEMA").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// sqlx connect options. Credentials are passed as-is, no URL escaping involved.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database);

        match &self.schema {
            Some(schema) => options.options([("search_path", schema.as_str())]),
            None => options,
        }
    }
}

fn parse_var<T: FromStr>(prefix: &str, name: &str, value: Option<String>) -> StoreResult<Option<T>> {
    match value {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            StoreError::InvalidConfig(format!("{}_{} has invalid value '{}'", prefix, name, raw))
        }),
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("schema", &self.schema)
            .finish()
    }
}
