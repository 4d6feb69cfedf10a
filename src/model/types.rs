//! Core type definitions for the search model

use crate::error::SearchError;

use super::record::ResultRecord;

/// Which slice of the catalog a search is restricted to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Music,
    Software,
    Ebooks,
}

impl Category {
    /// Value of the `entity` query parameter for this category.
    pub fn entity_name(self) -> &'static str {
        match self {
            Category::All => "",
            Category::Music => "musicTrack",
            Category::Software => "software",
            Category::Ebooks => "ebook",
        }
    }
}

/// Maps a segmented-control index onto a category.
impl TryFrom<i64> for Category {
    type Error = SearchError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Category::All),
            1 => Ok(Category::Music),
            2 => Ok(Category::Software),
            3 => Ok(Category::Ebooks),
            other => Err(SearchError::UnknownCategory(other)),
        }
    }
}

const FALLBACK_COUNTRY: &str = "en_US";

/// Language and region sent along with every query
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct LocaleInfo {
    pub language: String,
    #[serde(default)]
    pub region: Option<String>,
}

impl LocaleInfo {
    pub fn new(language: impl Into<String>, region: Option<String>) -> Self {
        Self {
            language: language.into(),
            region,
        }
    }

    /// Builds a locale from an identifier like `de_DE`, taking the region from the
    /// part after the underscore.
    pub fn from_identifier(identifier: &str) -> Self {
        let region = identifier
            .split_once('_')
            .map(|(_, region)| region)
            .filter(|region| !region.is_empty())
            .map(str::to_string);
        Self::new(identifier, region)
    }

    pub fn country(&self) -> &str {
        self.region.as_deref().unwrap_or(FALLBACK_COUNTRY)
    }
}

impl Default for LocaleInfo {
    fn default() -> Self {
        Self::from_identifier("en_US")
    }
}

/// What a caller may observe about the current search
#[derive(Clone, Debug, PartialEq, Default)]
pub enum SearchState {
    #[default]
    NotSearchedYet,
    Loading,
    NoResults,
    /// Sorted, never empty.
    Results(Vec<ResultRecord>),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }

    pub fn records(&self) -> &[ResultRecord] {
        match self {
            SearchState::Results(records) => records,
            _ => &[],
        }
    }
}
