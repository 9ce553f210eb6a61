//! Environment-driven configuration for the server binary.

use std::env;

/// Server configuration, read from the environment with local-dev
/// defaults.
#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    /// Bearer token granting admin access.
    pub admin_token: String,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// - `DATABASE_URL` (default `postgres://localhost/turfbook`)
    /// - `BIND_ADDR` (default `0.0.0.0:3000`)
    /// - `ADMIN_TOKEN` (required; no default so a deployment can never
    ///   fall back to a known value)
    ///
    /// # Errors
    ///
    /// Returns an error if `ADMIN_TOKEN` is unset or empty.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/turfbook".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let admin_token = env::var("ADMIN_TOKEN").unwrap_or_default();
        if admin_token.is_empty() {
            anyhow::bail!("ADMIN_TOKEN must be set");
        }

        Ok(Self {
            database_url,
            bind_addr,
            admin_token,
        })
    }
}
