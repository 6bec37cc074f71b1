//! Environment driven configuration.

use std::path::PathBuf;

use url::Url;

/// Environment variable naming the API base URL.
pub const API_URL_VAR: &str = "BAZAAR_API_URL";
/// Environment variable naming the local data directory.
pub const DATA_DIR_VAR: &str = "BAZAAR_DATA_DIR";

const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configured API base URL does not parse.
    #[error("invalid API base URL '{url}': {source}")]
    InvalidApiUrl {
        /// The offending value.
        url: String,
        /// The parse failure.
        source: url::ParseError,
    },

    /// No data directory could be determined for this platform.
    #[error("no data directory available; set {DATA_DIR_VAR}")]
    NoDataDir,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL all relative request paths are joined against. Always
    /// ends with a slash so joins append instead of replacing the last
    /// path segment.
    pub api_base_url: Url,
    /// Directory holding `tokens.json` and `cart.json`.
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolves configuration from the environment, falling back to the
    /// local development server and the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configured URL does not parse
    /// or no data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url =
            std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let api_base_url = Self::parse_base_url(&raw_url)?;

        let data_dir = std::env::var_os(DATA_DIR_VAR).map_or_else(
            || dirs::data_dir().map(|d| d.join("bazaar")),
            |dir| Some(PathBuf::from(dir)),
        );
        let data_dir = data_dir.ok_or(ConfigError::NoDataDir)?;

        Ok(Self {
            api_base_url,
            data_dir,
        })
    }

    /// Parses a base URL, normalizing it to end with a slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] when the value does not
    /// parse as an absolute URL.
    pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
        let normalized = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalized).map_err(|source| ConfigError::InvalidApiUrl {
            url: raw.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let url = Config::parse_base_url("http://localhost:8000/api").expect("parses");
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn test_trailing_slash_preserved() {
        let url = Config::parse_base_url("https://shop.example.com/api/").expect("parses");
        assert_eq!(url.as_str(), "https://shop.example.com/api/");
    }

    #[test]
    fn test_relative_url_rejected() {
        let err = Config::parse_base_url("not a url").expect_err("rejected");
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));
    }

    #[test]
    fn test_join_appends_path_segment() {
        let url = Config::parse_base_url("http://localhost:8000/api").expect("parses");
        let joined = url.join("products/").expect("joins");
        assert_eq!(joined.as_str(), "http://localhost:8000/api/products/");
    }
}
