use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_database_url() -> String {
    "sqlite://crm.db".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if it exists; anything
    /// left unset falls back to a local `crm.db` and port 5000.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Deserialize from explicit `(NAME, value)` pairs instead of the process environment
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(vars)?)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.database_url(), "sqlite://crm.db");
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_vars(vec![
            ("DATABASE_URL".to_string(), "sqlite://other.db".to_string()),
            ("BIND_ADDRESS".to_string(), "0.0.0.0:8080".to_string()),
        ])
        .unwrap();
        assert_eq!(config.database_url(), "sqlite://other.db");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
