//! The network seam between the coordinator and the catalog

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::error::Result;

/// Status and body of a finished catalog request
#[derive(Clone, Debug)]
pub struct CatalogResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Issues one GET against the catalog.
///
/// Dropping the returned future must abort the request. Implementations may also
/// report their own cancellation as [`SearchError::Cancelled`](crate::SearchError::Cancelled).
pub trait Transport: Send + Sync + 'static {
    fn fetch(&self, url: Url) -> impl Future<Output = Result<CatalogResponse>> + Send;
}

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// `timeout` bounds the whole request; `None` leaves it to the caller to cancel.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: Url) -> Result<CatalogResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(CatalogResponse { status, body })
    }
}
