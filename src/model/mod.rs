//! Model module - Search data types and the pure pieces of a search
//!
//! Nothing in here touches the network. It is organized into submodules by
//! responsibility:
//!
//! - `types`: Category, locale and the observable search state
//! - `record`: Normalized catalog item plus display lookups
//! - `config`: Endpoint and locale settings
//! - `query`: Request URL construction
//! - `parser`: Catalog JSON to records
//! - `ranker`: Display ordering

mod types;
mod record;
mod config;
mod query;
mod parser;
pub mod ranker;

// Re-export all public types for convenient access
pub use types::{Category, LocaleInfo, SearchState};

pub use record::{ResultRecord, kind_for_display};

pub use config::{DEFAULT_BASE_URL, SearchConfig};

pub use query::{QueryBuilder, RESULT_LIMIT};

pub use parser::{ResponseParser, Shape};
