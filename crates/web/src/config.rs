use std::time::Duration;

use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => bail!("Unknown LEDGER_BACKEND '{other}', expected postgres or memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: Backend,
    pub database_url: Option<String>,
    pub api_keys: String,
    pub store_timeout: Duration,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let backend = match std::env::var("LEDGER_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => Backend::Postgres,
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        if backend == Backend::Postgres && database_url.is_none() {
            bail!("Cannot load DATABASE_URL env variable");
        }

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            backend,
            database_url,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            store_timeout: Duration::from_millis(env_or("STORE_TIMEOUT_MS", 5000)?),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
        })
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} must be a number")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("postgres".parse::<Backend>().unwrap(), Backend::Postgres);
        assert_eq!(" Memory ".parse::<Backend>().unwrap(), Backend::Memory);
        assert!("sqlite".parse::<Backend>().is_err());
    }
}
