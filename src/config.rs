use crate::utils::error::ConfigError;

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    /// Falls back to the database in `mongo_uri` when unset.
    pub mongo_db_name: Option<String>,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match non_empty("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => return Err(ConfigError::Invalid { name: "PORT", value: raw }),
            },
            None => 5000,
        };

        let mongo_uri = non_empty("MONGO_URI").ok_or(ConfigError::Missing("MONGO_URI"))?;

        let cors_origins = non_empty("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            host,
            port,
            mongo_uri,
            mongo_db_name: non_empty("MONGO_DB_NAME"),
            cors_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("MONGO_URI", "mongodb://localhost:27017/crm")])).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.mongo_uri, "mongodb://localhost:27017/crm");
        assert_eq!(config.mongo_db_name, None);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("MONGO_URI", "mongodb://db:27017"),
            ("MONGO_DB_NAME", "people"),
            ("CORS_ORIGINS", "http://localhost:3000, http://127.0.0.1:3000,"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.mongo_db_name.as_deref(), Some("people"));
        assert_eq!(config.cors_origins, vec!["http://localhost:3000", "http://127.0.0.1:3000"]);
    }

    #[test]
    fn test_missing_mongo_uri() {
        let err = Config::from_lookup(lookup(&[("PORT", "5000")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MONGO_URI")));
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[("MONGO_URI", "mongodb://db"), ("PORT", "http")])).unwrap_err();
        assert_eq!(err.to_string(), "PORT is not valid: http");
    }
}
