//! Environment-driven server configuration.
//!
//! Required variables fail startup immediately; everything else has a
//! default suited to the scheduled-trigger deployment.

use anyhow::{bail, Context};
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the SQLite database file. Required.
    pub db_path: String,
    /// Bearer token the trigger must present. Required, non-empty.
    pub api_token: String,
    pub listen_addr: String,
    /// Wall-clock budget for one ingestion job, in seconds.
    pub job_timeout_secs: u64,
    pub max_concurrent_symbols: usize,
    pub fetch_max_attempts: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path =
            env::var("TB_DB_PATH").context("TB_DB_PATH must be set to the database file path")?;
        let api_token =
            env::var("TB_API_TOKEN").context("TB_API_TOKEN must be set to the trigger token")?;
        if api_token.trim().is_empty() {
            bail!("TB_API_TOKEN must not be empty");
        }

        Ok(Self {
            db_path,
            api_token,
            listen_addr: env::var("TB_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            job_timeout_secs: parse_or("TB_JOB_TIMEOUT_SECS", 540)?,
            max_concurrent_symbols: parse_or("TB_MAX_CONCURRENT_SYMBOLS", 4)?,
            fetch_max_attempts: parse_or("TB_FETCH_MAX_ATTEMPTS", 3)?,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} is not a valid value: {raw}")),
        Err(_) => Ok(default),
    }
}
