//! Client-side search against a remote store catalog.
//!
//! A [`SearchCoordinator`] turns free text and a [`Category`] into a catalog request,
//! normalizes the mixed-shape JSON answer into [`ResultRecord`]s, sorts them for
//! display, and publishes everything through a [`SearchState`] that a UI observes.
//!
//! ```no_run
//! use store_search::{Category, SearchConfig, SearchCoordinator};
//!
//! # async fn run() -> store_search::Result<()> {
//! let coordinator = SearchCoordinator::with_http(SearchConfig::default())?;
//! coordinator
//!     .perform_search("abba", Category::Music, |success| {
//!         if !success {
//!             eprintln!("search failed");
//!         }
//!     })
//!     .await;
//! let mut states = coordinator.subscribe();
//! states.changed().await.ok();
//! println!("{} results", states.borrow().records().len());
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod error;
pub mod logging;
pub mod model;

pub use coordinator::{CatalogResponse, HttpTransport, SearchCoordinator, Transport};
pub use error::{Result, SearchError};
pub use model::{
    Category, LocaleInfo, QueryBuilder, ResponseParser, ResultRecord, SearchConfig, SearchState,
    kind_for_display,
};
