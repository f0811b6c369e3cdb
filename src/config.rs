use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{
    DEFAULT_MAX_POST_LENGTH, DEFAULT_MIN_POST_LENGTH, DEFAULT_SORT_DIRECTION, FULL_PAGE_SIZE,
    RECENT_LIMIT,
};
use crate::quick_posts::SortDirection;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Feature flag
    pub quick_posts_enabled: bool,

    // Listing
    pub sort_direction: SortDirection,
    pub recent_limit: u32,
    pub page_size: u32,

    // Post creation
    pub min_post_length: usize,
    pub max_post_length: usize,

    // Database
    pub database_path: PathBuf,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            quick_posts_enabled: parse_env_bool("ENABLE_QUICK_POSTS", true)?,

            sort_direction: parse_sort_direction(&env_or_default(
                "QUICK_POSTS_ORDER",
                DEFAULT_SORT_DIRECTION.as_str(),
            ))?,
            recent_limit: parse_env_u32("QUICK_POSTS_RECENT_LIMIT", RECENT_LIMIT)?,
            page_size: parse_env_u32("QUICK_POSTS_PAGE_SIZE", FULL_PAGE_SIZE)?,

            min_post_length: parse_env_usize("MIN_POST_LENGTH", DEFAULT_MIN_POST_LENGTH)?,
            max_post_length: parse_env_usize("MAX_POST_LENGTH", DEFAULT_MAX_POST_LENGTH)?,

            database_path: PathBuf::from(env_or_default(
                "DATABASE_PATH",
                "./data/quick_posts.sqlite",
            )),

            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Configuration with defaults and no environment lookups, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            quick_posts_enabled: true,
            sort_direction: DEFAULT_SORT_DIRECTION,
            recent_limit: RECENT_LIMIT,
            page_size: FULL_PAGE_SIZE,
            min_post_length: DEFAULT_MIN_POST_LENGTH,
            max_post_length: DEFAULT_MAX_POST_LENGTH,
            database_path: PathBuf::from(":memory:"),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_limit == 0 {
            return Err(ConfigError::InvalidValue {
                name: "QUICK_POSTS_RECENT_LIMIT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "QUICK_POSTS_PAGE_SIZE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.min_post_length > self.max_post_length {
            return Err(ConfigError::InvalidValue {
                name: "MIN_POST_LENGTH".to_string(),
                message: format!(
                    "must not exceed MAX_POST_LENGTH ({})",
                    self.max_post_length
                ),
            });
        }
        Ok(())
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

fn parse_sort_direction(value: &str) -> Result<SortDirection, ConfigError> {
    match value.to_lowercase().as_str() {
        "asc" | "oldest" => Ok(SortDirection::Asc),
        "desc" | "newest" => Ok(SortDirection::Desc),
        _ => Err(ConfigError::InvalidValue {
            name: "QUICK_POSTS_ORDER".to_string(),
            message: format!("must be 'asc' or 'desc', got '{value}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_sort_direction() {
        assert_eq!(parse_sort_direction("asc").unwrap(), SortDirection::Asc);
        assert_eq!(parse_sort_direction("DESC").unwrap(), SortDirection::Desc);
        assert_eq!(parse_sort_direction("newest").unwrap(), SortDirection::Desc);
        assert!(parse_sort_direction("sideways").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_env_bool("NONEXISTENT_VAR", true).unwrap());
        assert!(!parse_env_bool("NONEXISTENT_VAR", false).unwrap());
    }

    #[test]
    #[serial]
    fn test_feature_flag_from_env() {
        std::env::set_var("ENABLE_QUICK_POSTS", "off");
        let config = Config::from_env().unwrap();
        std::env::remove_var("ENABLE_QUICK_POSTS");
        assert!(!config.quick_posts_enabled);

        let config = Config::from_env().unwrap();
        assert!(config.quick_posts_enabled);
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.page_size, 100);
    }

    #[test]
    #[serial]
    fn test_invalid_bool_is_rejected() {
        std::env::set_var("ENABLE_QUICK_POSTS", "maybe");
        let result = Config::from_env();
        std::env::remove_var("ENABLE_QUICK_POSTS");
        assert!(matches!(result, Err(ConfigError::ParseBool { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
        assert!(Config::for_testing().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_length_bounds() {
        let config = Config {
            min_post_length: 50,
            max_post_length: 10,
            ..Config::for_testing()
        };
        assert!(config.validate().is_err());
    }
}
