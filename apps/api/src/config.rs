use anyhow::{bail, Context, Result};

/// Which `ResumeStore` backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

impl StoreBackend {
    /// Resolves `RESUME_STORE` (default `postgres`). Postgres needs a database URL.
    pub fn resolve(kind: Option<&str>, database_url: Option<String>) -> Result<Self> {
        match kind.map(str::trim).unwrap_or("postgres") {
            "postgres" | "" => {
                let database_url = database_url
                    .context("Required environment variable 'DATABASE_URL' is not set")?;
                Ok(StoreBackend::Postgres { database_url })
            }
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("RESUME_STORE must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            store: StoreBackend::resolve(
                std::env::var("RESUME_STORE").ok().as_deref(),
                std::env::var("DATABASE_URL").ok(),
            )?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
