//! Catalog search URL construction

use url::Url;

use super::config::SearchConfig;
use super::types::Category;

/// Maximum number of items requested per search.
pub const RESULT_LIMIT: u32 = 200;

pub struct QueryBuilder<'a> {
    config: &'a SearchConfig,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    /// Builds `<base>?term=..&limit=200&entity=..&lang=..&country=..`.
    ///
    /// `text` must not be empty; the coordinator filters empty input before it gets here.
    pub fn build(&self, text: &str, category: Category) -> Url {
        debug_assert!(!text.is_empty(), "search text must not be empty");

        let locale = self.config.locale();
        let query = format!(
            "term={}&limit={}&entity={}&lang={}&country={}",
            urlencoding::encode(text),
            RESULT_LIMIT,
            category.entity_name(),
            urlencoding::encode(&locale.language),
            urlencoding::encode(locale.country()),
        );

        let mut url = self.config.base_url().clone();
        url.set_query(Some(&query));
        url
    }
}
