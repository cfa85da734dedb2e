use std::{
    env,
    fmt::Display,
    num::{NonZeroU64, NonZeroUsize},
    str::FromStr,
    time::Duration,
};

use thiserror::Error;
use tracing::info;

use crate::recent;

const DEFAULT_MAX_PER_PAGE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(max) => max,
    None => unreachable!(),
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// How long an issued bearer token stays valid
    pub token_ttl: Duration,
    pub token_purge_interval: Duration,
    pub recently_viewed_capacity: NonZeroUsize,
    pub max_per_page: NonZeroUsize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(15 * 60),
            token_purge_interval: Duration::from_secs(5 * 60),
            recently_viewed_capacity: recent::CAPACITY,
            max_per_page: DEFAULT_MAX_PER_PAGE,
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment, loading `.env` first
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Every setting must be a positive integer; zero fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let token_ttl: NonZeroU64 =
            setting(&lookup, "TOKEN_TTL_SECS", seconds(defaults.token_ttl))?;
        let purge: NonZeroU64 = setting(
            &lookup,
            "TOKEN_PURGE_INTERVAL_SECS",
            seconds(defaults.token_purge_interval),
        )?;

        Ok(Self {
            token_ttl: Duration::from_secs(token_ttl.get()),
            token_purge_interval: Duration::from_secs(purge.get()),
            recently_viewed_capacity: setting(
                &lookup,
                "RECENTLY_VIEWED_CAPACITY",
                defaults.recently_viewed_capacity,
            )?,
            max_per_page: setting(&lookup, "MAX_PER_PAGE", defaults.max_per_page)?,
        })
    }
}

fn seconds(duration: Duration) -> NonZeroU64 {
    NonZeroU64::new(duration.as_secs()).unwrap_or(NonZeroU64::MIN)
}

fn setting<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.recently_viewed_capacity.get(), 5);
        assert_eq!(config.token_ttl, Duration::from_secs(900));
        assert_eq!(config.max_per_page.get(), 100);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("RECENTLY_VIEWED_CAPACITY", "8"),
            ("TOKEN_TTL_SECS", " 60 "),
        ]))
        .unwrap();

        assert_eq!(config.recently_viewed_capacity.get(), 8);
        assert_eq!(config.token_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_rejects_zero_and_garbage() {
        let zero = AppConfig::from_lookup(lookup(&[("RECENTLY_VIEWED_CAPACITY", "0")]));
        assert!(matches!(
            zero,
            Err(ConfigError::Invalid { key: "RECENTLY_VIEWED_CAPACITY", .. })
        ));

        let garbage = AppConfig::from_lookup(lookup(&[("MAX_PER_PAGE", "lots")]));
        assert!(matches!(
            garbage,
            Err(ConfigError::Invalid { key: "MAX_PER_PAGE", .. })
        ));
    }
}
