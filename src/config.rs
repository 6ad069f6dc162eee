use crate::error::ConfigError;
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:resident_votes.db";
pub const DEFAULT_STATS_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    /// Rows fetched per query when recomputing stats from the database.
    pub stats_page_size: u32,
    /// Reject a toggle while another one for the same resident is pending.
    pub serialize_toggles: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            stats_page_size: DEFAULT_STATS_PAGE_SIZE,
            serialize_toggles: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }

        if let Some(raw) = lookup("STATS_PAGE_SIZE") {
            config.stats_page_size = match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "STATS_PAGE_SIZE",
                        value: raw,
                    })
                }
            };
        }

        if let Some(raw) = lookup("SERIALIZE_TOGGLES") {
            config.serialize_toggles = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SERIALIZE_TOGGLES",
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.stats_page_size, 1000);
        assert!(config.serialize_toggles);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("STATS_PAGE_SIZE", "250"),
            ("SERIALIZE_TOGGLES", "off"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.stats_page_size, 250);
        assert!(!config.serialize_toggles);
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = Config::from_lookup(lookup(&[("STATS_PAGE_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "STATS_PAGE_SIZE", .. }));
    }

    #[test]
    fn rejects_unknown_boolean() {
        let err = Config::from_lookup(lookup(&[("SERIALIZE_TOGGLES", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SERIALIZE_TOGGLES", .. }));
    }
}
