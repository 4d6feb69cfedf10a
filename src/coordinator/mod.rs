//! Coordinator module - Request lifecycle and the observable search state
//!
//! The coordinator is the only piece a presentation layer talks to. It is organized
//! into submodules by responsibility:
//!
//! - `search`: Issuing, superseding and completing searches
//! - `transport`: The network seam and its `reqwest` implementation

mod search;
mod transport;

use std::sync::Arc;
use futures::future::AbortHandle;
use tokio::sync::{Mutex, watch};

use crate::error::Result;
use crate::model::{SearchConfig, SearchState};

pub use transport::{CatalogResponse, HttpTransport, Transport};

/// The single request a coordinator may have outstanding.
#[derive(Default)]
pub(crate) struct InFlight {
    /// Bumped by every new search and every cancel. A completion only applies if it
    /// carries the current value.
    pub(crate) generation: u64,
    pub(crate) abort: Option<AbortHandle>,
}

pub struct SearchCoordinator<T> {
    pub(crate) transport: Arc<T>,
    pub(crate) config: Arc<SearchConfig>,
    pub(crate) in_flight: Arc<Mutex<InFlight>>,
    pub(crate) state: Arc<watch::Sender<SearchState>>,
}

impl<T> Clone for SearchCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
            in_flight: self.in_flight.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Transport> SearchCoordinator<T> {
    pub fn new(transport: T, config: SearchConfig) -> Self {
        let (state, _) = watch::channel(SearchState::NotSearchedYet);
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
            in_flight: Arc::new(Mutex::new(InFlight::default())),
            state: Arc::new(state),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl SearchCoordinator<HttpTransport> {
    /// Coordinator talking to the real catalog over HTTP.
    pub fn with_http(config: SearchConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new()?, config))
    }
}
