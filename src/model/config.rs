//! Endpoint and locale settings for catalog queries

use serde::Deserialize;
use url::Url;

use crate::error::{Result, SearchError};

use super::types::LocaleInfo;

pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com/search";

/// Where to send searches and which locale to ask for.
///
/// The base URL is validated once here so that building a query can never fail.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    base_url: Url,
    locale: LocaleInfo,
}

/// On-disk form of [`SearchConfig`], for hosts that keep it in a settings file.
#[derive(Deserialize)]
struct RawSearchConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default)]
    locale: LocaleInfo,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl SearchConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SearchError::InvalidConfig(format!("base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::InvalidConfig(format!(
                "base URL {base_url} cannot carry a query"
            )));
        }
        Ok(Self {
            base_url,
            locale: LocaleInfo::default(),
        })
    }

    /// Parses settings like `{"base_url": "...", "locale": {"language": "de_DE", "region": "DE"}}`.
    /// Both keys are optional.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSearchConfig = serde_json::from_str(json)
            .map_err(|e| SearchError::InvalidConfig(e.to_string()))?;
        Ok(Self::new(&raw.base_url)?.with_locale(raw.locale))
    }

    pub fn with_locale(mut self, locale: LocaleInfo) -> Self {
        self.locale = locale;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn locale(&self) -> &LocaleInfo {
        &self.locale
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            locale: LocaleInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            SearchConfig::new("not a url"),
            Err(SearchError::InvalidConfig(_))
        ));
        assert!(matches!(
            SearchConfig::new("mailto:catalog@example.com"),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn loads_from_json() {
        let config = SearchConfig::from_json(
            r#"{"base_url": "http://localhost:8080/search", "locale": {"language": "nl_NL", "region": "NL"}}"#,
        )
        .unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/search");
        assert_eq!(config.locale().country(), "NL");
    }

    #[test]
    fn json_keys_are_optional() {
        let config = SearchConfig::from_json("{}").unwrap();
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.locale(), &LocaleInfo::default());
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(matches!(
            SearchConfig::from_json("{"),
            Err(SearchError::InvalidConfig(_))
        ));
    }
}
