use std::{
    env,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE: &str = "quarterapp.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid QUARTERAPP_HOST '{0}'")]
    InvalidHost(String),
    #[error("invalid QUARTERAPP_PORT '{0}'")]
    InvalidPort(String),
    #[error("QUARTERAPP_DATABASE must not be empty")]
    EmptyDatabase,
    #[error("failed to read .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// A missing `.env` is fine, an unreadable or malformed one is not.
fn env_file_loaded<T>(result: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Err(e) if !e.not_found() => Err(ConfigError::EnvFile(e)),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database: PathBuf,
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        env_file_loaded(dotenvy::dotenv())?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("QUARTERAPP_HOST") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidHost(raw))?,
            None => DEFAULT_HOST
                .parse()
                .map_err(|_| ConfigError::InvalidHost(DEFAULT_HOST.to_string()))?,
        };

        let port = match lookup("QUARTERAPP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let database = match lookup("QUARTERAPP_DATABASE") {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::EmptyDatabase),
            Some(raw) => PathBuf::from(raw.trim()),
            None => PathBuf::from(DEFAULT_DATABASE),
        };

        Ok(Self {
            host,
            port,
            database,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
