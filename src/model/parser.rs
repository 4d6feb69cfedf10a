//! Turns catalog JSON into [`ResultRecord`]s.
//!
//! The catalog mixes several item layouts in one `results` array. Each element is
//! classified into a [`Shape`] by its discriminant fields and then deserialized into
//! that shape's typed struct. Elements that match no shape, or miss a required field,
//! are dropped one by one.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Result, SearchError};

use super::record::ResultRecord;

/// Item layouts the catalog is known to return
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Track,
    Audiobook,
    Software,
    Ebook,
}

impl Shape {
    /// `wrapperType` wins when it is a string; otherwise only `kind == "ebook"` is
    /// recognized.
    pub fn detect(item: &Value) -> Option<Shape> {
        if let Some(wrapper_type) = item.get("wrapperType").and_then(Value::as_str) {
            return match wrapper_type {
                "track" => Some(Shape::Track),
                "audiobook" => Some(Shape::Audiobook),
                "software" => Some(Shape::Software),
                _ => None,
            };
        }
        match item.get("kind").and_then(Value::as_str) {
            Some("ebook") => Some(Shape::Ebook),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Track => "track",
            Shape::Audiobook => "audiobook",
            Shape::Software => "software",
            Shape::Ebook => "ebook",
        }
    }

    fn extract(self, item: &Value) -> Result<ResultRecord> {
        let record = match self {
            Shape::Track => TrackItem::deserialize(item).map(ResultRecord::from),
            Shape::Audiobook => AudiobookItem::deserialize(item).map(ResultRecord::from),
            Shape::Software => SoftwareItem::deserialize(item).map(ResultRecord::from),
            Shape::Ebook => EbookItem::deserialize(item).map(ResultRecord::from),
        };
        record.map_err(|e| SearchError::MalformedItem {
            shape: self.as_str(),
            reason: e.to_string(),
        })
    }
}

// Optional fields take whatever JSON is there and keep it only if it has the
// expected type, so a mistyped price never costs the whole item.

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or_default())
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_default())
}

fn joined_genres<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let genres: Vec<&str> = value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    Ok(genres.join(", "))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackItem {
    track_name: String,
    artist_name: String,
    #[serde(rename = "artworkUrl60")]
    artwork_small_url: String,
    #[serde(rename = "artworkUrl100")]
    artwork_large_url: String,
    track_view_url: String,
    kind: String,
    currency: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    track_price: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    primary_genre_name: String,
}

impl From<TrackItem> for ResultRecord {
    fn from(item: TrackItem) -> Self {
        Self {
            name: item.track_name,
            artist_name: item.artist_name,
            artwork_small_url: item.artwork_small_url,
            artwork_large_url: item.artwork_large_url,
            store_url: item.track_view_url,
            kind: item.kind,
            currency: item.currency,
            price: item.track_price,
            genre: item.primary_genre_name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudiobookItem {
    collection_name: String,
    artist_name: String,
    #[serde(rename = "artworkUrl60")]
    artwork_small_url: String,
    #[serde(rename = "artworkUrl100")]
    artwork_large_url: String,
    collection_view_url: String,
    currency: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    collection_price: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    primary_genre_name: String,
}

impl From<AudiobookItem> for ResultRecord {
    fn from(item: AudiobookItem) -> Self {
        Self {
            name: item.collection_name,
            artist_name: item.artist_name,
            artwork_small_url: item.artwork_small_url,
            artwork_large_url: item.artwork_large_url,
            store_url: item.collection_view_url,
            kind: Shape::Audiobook.as_str().to_string(),
            currency: item.currency,
            price: item.collection_price,
            genre: item.primary_genre_name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SoftwareItem {
    track_name: String,
    artist_name: String,
    #[serde(rename = "artworkUrl60")]
    artwork_small_url: String,
    #[serde(rename = "artworkUrl100")]
    artwork_large_url: String,
    track_view_url: String,
    kind: String,
    currency: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    price: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    primary_genre_name: String,
}

impl From<SoftwareItem> for ResultRecord {
    fn from(item: SoftwareItem) -> Self {
        Self {
            name: item.track_name,
            artist_name: item.artist_name,
            artwork_small_url: item.artwork_small_url,
            artwork_large_url: item.artwork_large_url,
            store_url: item.track_view_url,
            kind: item.kind,
            currency: item.currency,
            price: item.price,
            genre: item.primary_genre_name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EbookItem {
    track_name: String,
    artist_name: String,
    #[serde(rename = "artworkUrl60")]
    artwork_small_url: String,
    #[serde(rename = "artworkUrl100")]
    artwork_large_url: String,
    track_view_url: String,
    kind: String,
    currency: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    price: f64,
    #[serde(default, deserialize_with = "joined_genres")]
    genres: String,
}

impl From<EbookItem> for ResultRecord {
    fn from(item: EbookItem) -> Self {
        Self {
            name: item.track_name,
            artist_name: item.artist_name,
            artwork_small_url: item.artwork_small_url,
            artwork_large_url: item.artwork_large_url,
            store_url: item.track_view_url,
            kind: item.kind,
            currency: item.currency,
            price: item.price,
            genre: item.genres,
        }
    }
}

pub struct ResponseParser;

impl ResponseParser {
    /// Never fails: anything unusable comes back as an empty list.
    pub fn parse(raw: &[u8]) -> Vec<ResultRecord> {
        Self::parse_document(raw).unwrap_or_default()
    }

    /// Like [`ResponseParser::parse`], but reports a body that is not a JSON object
    /// as [`SearchError::MalformedPayload`]. An object without a `results` array is
    /// still an empty, successful parse.
    pub fn parse_document(raw: &[u8]) -> Result<Vec<ResultRecord>> {
        let document: Value = serde_json::from_slice(raw)
            .map_err(|e| SearchError::MalformedPayload(e.to_string()))?;
        if !document.is_object() {
            return Err(SearchError::MalformedPayload(
                "top-level value is not an object".to_string(),
            ));
        }

        let Some(items) = document.get("results").and_then(Value::as_array) else {
            tracing::warn!("Expected 'results' array in catalog response");
            return Ok(Vec::new());
        };

        let records: Vec<ResultRecord> = items.iter().filter_map(Self::parse_item).collect();
        tracing::debug!(
            items = items.len(),
            records = records.len(),
            "Parsed catalog response"
        );
        Ok(records)
    }

    fn parse_item(item: &Value) -> Option<ResultRecord> {
        let Some(shape) = Shape::detect(item) else {
            tracing::debug!(
                wrapper_type = ?item.get("wrapperType"),
                kind = ?item.get("kind"),
                "Dropping item with unknown shape"
            );
            return None;
        };
        match shape.extract(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed item");
                None
            }
        }
    }
}
