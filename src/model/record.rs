//! Normalized catalog item and the lookups a view needs to show one

use serde::Serialize;

/// One catalog item, normalized from whichever shape the catalog returned it in.
///
/// Records are only built by the response parser; callers read them through the
/// accessors below.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResultRecord {
    pub(crate) name: String,
    pub(crate) artist_name: String,
    pub(crate) artwork_small_url: String,
    pub(crate) artwork_large_url: String,
    pub(crate) store_url: String,
    pub(crate) kind: String,
    pub(crate) currency: String,
    pub(crate) price: f64,
    pub(crate) genre: String,
}

impl ResultRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }

    pub fn artwork_small_url(&self) -> &str {
        &self.artwork_small_url
    }

    pub fn artwork_large_url(&self) -> &str {
        &self.artwork_large_url
    }

    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    /// Raw category code, e.g. `song` or `software`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// 0.0 means free or unknown.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Artist line for a results list: `"Unknown"` when the catalog gave no artist,
    /// otherwise the artist followed by the display kind.
    pub fn artist_for_display(&self) -> String {
        if self.artist_name.is_empty() {
            "Unknown".to_string()
        } else {
            format!("{} ({})", self.artist_name, kind_for_display(&self.kind))
        }
    }

    pub fn price_for_display(&self) -> String {
        if self.price == 0.0 {
            "Free".to_string()
        } else {
            format!("{} {:.2}", self.currency, self.price)
        }
    }

    #[cfg(test)]
    pub(crate) fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Human-readable name for a raw catalog kind. Unknown kinds pass through unchanged.
pub fn kind_for_display(kind: &str) -> &str {
    match kind {
        "album" => "Album",
        "audiobook" => "Audio Book",
        "book" => "Book",
        "ebook" => "E-Book",
        "feature-movie" => "Movie",
        "music-video" => "Music Video",
        "podcast" => "Podcast",
        "software" => "App",
        "song" => "Song",
        "tv-episode" => "TV Episode",
        other => other,
    }
}
