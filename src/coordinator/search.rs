//! Issuing, superseding and completing searches

use futures::future::{AbortHandle, Abortable, Aborted};

use crate::error::{Result, SearchError};
use crate::model::{Category, QueryBuilder, ResponseParser, ResultRecord, SearchState, ranker};
use crate::{log_api_request, log_api_result};
use super::{CatalogResponse, SearchCoordinator, Transport};

const HTTP_OK: u16 = 200;

impl<T: Transport> SearchCoordinator<T> {
    /// Starts a search for `text`, replacing any search still in flight.
    ///
    /// Whitespace-only text is ignored entirely. Otherwise the state is `Loading` by
    /// the time this returns, and `on_complete` later receives `true` (results or no
    /// results) or `false` (request failed, state back to `NotSearchedYet`). A search
    /// that gets superseded or cancelled never calls its `on_complete`.
    pub async fn perform_search<F>(&self, text: &str, category: Category, on_complete: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty search text");
            return;
        }

        let url = QueryBuilder::new(&self.config).build(text, category);
        let (abort, registration) = AbortHandle::new_pair();

        let generation = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(previous) = in_flight.abort.replace(abort) {
                tracing::debug!(generation = in_flight.generation, "Cancelling superseded search");
                previous.abort();
            }
            in_flight.generation += 1;
            self.state.send_replace(SearchState::Loading);
            in_flight.generation
        };
        tracing::debug!(query = text, ?category, generation, "Performing search");

        let coordinator = self.clone();
        tokio::spawn(async move {
            log_api_request!("catalog.search", url = %url, generation);
            let fetched = match Abortable::new(coordinator.transport.fetch(url), registration).await {
                Ok(result) => result,
                Err(Aborted) => Err(SearchError::Cancelled),
            };
            log_api_result!("catalog.search", fetched);

            let outcome = fetched.and_then(interpret);
            if let Some(success) = coordinator.complete(generation, outcome).await {
                on_complete(success);
            }
        });
    }

    /// Aborts the search in flight, if any, without starting another one.
    ///
    /// Its `on_complete` is never called. A `Loading` state falls back to
    /// `NotSearchedYet`; finished results stay visible.
    pub async fn cancel(&self) {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.generation += 1;
        if let Some(handle) = in_flight.abort.take() {
            tracing::debug!(generation = in_flight.generation, "Cancelling search");
            handle.abort();
        }
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = SearchState::NotSearchedYet;
                true
            } else {
                false
            }
        });
    }

    /// Publishes the outcome of request `generation` and returns what to report to
    /// its caller, or `None` if the request was superseded or cancelled.
    pub(crate) async fn complete(
        &self,
        generation: u64,
        outcome: Result<Vec<ResultRecord>>,
    ) -> Option<bool> {
        let mut in_flight = self.in_flight.lock().await;
        if in_flight.generation != generation {
            tracing::debug!(
                generation,
                current = in_flight.generation,
                "Discarding stale search completion"
            );
            return None;
        }
        in_flight.abort = None;

        let (state, success) = match outcome {
            Err(SearchError::Cancelled) => {
                tracing::debug!(generation, "Search cancelled by transport");
                return None;
            }
            Ok(records) if records.is_empty() => {
                tracing::info!(generation, "Search completed with no results");
                (SearchState::NoResults, true)
            }
            Ok(records) => {
                tracing::info!(generation, results = records.len(), "Search completed successfully");
                (SearchState::Results(records), true)
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Search failed");
                (SearchState::NotSearchedYet, false)
            }
        };
        self.state.send_replace(state);
        Some(success)
    }
}

/// HTTP 200 with a JSON object body becomes sorted records; anything else is an error.
fn interpret(response: CatalogResponse) -> Result<Vec<ResultRecord>> {
    if response.status != HTTP_OK {
        return Err(SearchError::Protocol {
            status: response.status,
        });
    }
    let records = ResponseParser::parse_document(&response.body)?;
    Ok(ranker::sort(records))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::{mpsc, oneshot};
    use url::Url;

    use super::*;
    use crate::model::{LocaleInfo, SearchConfig};

    type Reply = oneshot::Sender<Result<CatalogResponse>>;

    /// Hands every request to the test, which answers it through the oneshot.
    struct FakeTransport {
        requests: mpsc::UnboundedSender<(Url, Reply)>,
    }

    impl Transport for FakeTransport {
        async fn fetch(&self, url: Url) -> Result<CatalogResponse> {
            let (reply, response) = oneshot::channel();
            self.requests
                .send((url, reply))
                .map_err(|e| SearchError::Transport(e.to_string().into()))?;
            response.await.unwrap_or(Err(SearchError::Cancelled))
        }
    }

    struct Harness {
        coordinator: SearchCoordinator<FakeTransport>,
        requests: mpsc::UnboundedReceiver<(Url, Reply)>,
        outcomes: mpsc::UnboundedReceiver<bool>,
        outcome_tx: mpsc::UnboundedSender<bool>,
    }

    impl Harness {
        fn new() -> Self {
            let config = SearchConfig::default().with_locale(LocaleInfo::from_identifier("en_GB"));
            let (request_tx, requests) = mpsc::unbounded_channel();
            let (outcome_tx, outcomes) = mpsc::unbounded_channel();
            Self {
                coordinator: SearchCoordinator::new(FakeTransport { requests: request_tx }, config),
                requests,
                outcomes,
                outcome_tx,
            }
        }

        async fn search(&self, text: &str, category: Category) {
            self.coordinator
                .perform_search(text, category, recorder(self.outcome_tx.clone()))
                .await;
        }

        async fn next_request(&mut self) -> (Url, Reply) {
            self.requests.recv().await.expect("request issued")
        }

        async fn next_outcome(&mut self) -> bool {
            self.outcomes.recv().await.expect("outcome reported")
        }

        /// Lets spawned tasks run, then checks nothing else was reported.
        async fn assert_no_more_outcomes(&mut self) {
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(self.outcomes.try_recv().is_err(), "unexpected on_complete call");
        }
    }

    /// Waits for the transport future behind `reply` to be dropped, which closes
    /// its receiving end.
    async fn assert_dropped(reply: &mut Reply) {
        tokio::time::timeout(Duration::from_secs(1), reply.closed())
            .await
            .expect("request was not aborted");
    }

    fn recorder(tx: mpsc::UnboundedSender<bool>) -> impl FnOnce(bool) + Send + 'static {
        move |success| {
            let _ = tx.send(success);
        }
    }

    fn ok(body: serde_json::Value) -> Result<CatalogResponse> {
        Ok(CatalogResponse {
            status: 200,
            body: serde_json::to_vec(&body).unwrap(),
        })
    }

    fn tracks(names: &[&str]) -> serde_json::Value {
        let results: Vec<_> = names
            .iter()
            .map(|name| {
                json!({
                    "wrapperType": "track",
                    "trackName": name,
                    "artistName": "Artist",
                    "artworkUrl60": "s",
                    "artworkUrl100": "l",
                    "trackViewUrl": "v",
                    "kind": "song",
                    "currency": "USD",
                    "trackPrice": 0.99,
                })
            })
            .collect();
        json!({ "resultCount": results.len(), "results": results })
    }

    fn names(state: &SearchState) -> Vec<&str> {
        state.records().iter().map(|r| r.name()).collect()
    }

    #[tokio::test]
    async fn loading_until_results_arrive() {
        let mut h = Harness::new();
        h.search("abba", Category::Music).await;
        assert_eq!(h.coordinator.state(), SearchState::Loading);

        let (url, reply) = h.next_request().await;
        let query = url.query().unwrap();
        assert!(query.starts_with("term=abba&limit=200&entity=musicTrack"));
        assert!(query.ends_with("lang=en_GB&country=GB"));
        assert_eq!(h.coordinator.state(), SearchState::Loading);

        reply.send(ok(tracks(&["Zebra", "apple", "Banana"]))).unwrap();
        assert!(h.next_outcome().await);
        assert_eq!(names(&h.coordinator.state()), vec!["apple", "Banana", "Zebra"]);
    }

    #[tokio::test]
    async fn blank_text_is_ignored() {
        let mut h = Harness::new();
        h.search("", Category::All).await;
        h.search("  \t ", Category::All).await;
        assert_eq!(h.coordinator.state(), SearchState::NotSearchedYet);

        h.assert_no_more_outcomes().await;
        assert!(h.requests.try_recv().is_err());
    }

    #[tokio::test]
    async fn blank_text_keeps_previous_results() {
        let mut h = Harness::new();
        h.search("queen", Category::All).await;
        let (_, reply) = h.next_request().await;
        reply.send(ok(tracks(&["Bohemian Rhapsody"]))).unwrap();
        assert!(h.next_outcome().await);

        h.search(" ", Category::All).await;
        assert_eq!(names(&h.coordinator.state()), vec!["Bohemian Rhapsody"]);
        h.assert_no_more_outcomes().await;
    }

    #[tokio::test]
    async fn superseded_search_is_silent() {
        let mut h = Harness::new();
        h.search("abba", Category::All).await;
        let (first_url, mut first_reply) = h.next_request().await;
        assert!(first_url.query().unwrap().contains("term=abba"));

        h.search("queen", Category::All).await;
        assert_eq!(h.coordinator.state(), SearchState::Loading);

        assert_dropped(&mut first_reply).await;
        assert!(first_reply.send(ok(tracks(&["Waterloo"]))).is_err());

        let (second_url, second_reply) = h.next_request().await;
        assert!(second_url.query().unwrap().contains("term=queen"));
        second_reply.send(ok(json!({ "results": [] }))).unwrap();

        assert!(h.next_outcome().await);
        assert_eq!(h.coordinator.state(), SearchState::NoResults);
        h.assert_no_more_outcomes().await;
    }

    #[tokio::test]
    async fn stale_completion_does_not_apply() {
        let h = Harness::new();
        h.search("one", Category::All).await;
        h.search("two", Category::All).await;

        let late = h
            .coordinator
            .complete(1, Ok(vec![ResultRecord::named("late")]))
            .await;
        assert_eq!(late, None);
        assert_eq!(h.coordinator.state(), SearchState::Loading);

        let current = h.coordinator.complete(2, Ok(Vec::new())).await;
        assert_eq!(current, Some(true));
        assert_eq!(h.coordinator.state(), SearchState::NoResults);
    }

    #[tokio::test]
    async fn transport_cancellation_is_swallowed() {
        let h = Harness::new();
        h.search("one", Category::All).await;
        assert_eq!(h.coordinator.complete(1, Err(SearchError::Cancelled)).await, None);
        assert_eq!(h.coordinator.state(), SearchState::Loading);
    }

    #[tokio::test]
    async fn zero_records_is_no_results() {
        let mut h = Harness::new();
        h.search("zzzz", Category::All).await;
        let (_, reply) = h.next_request().await;
        reply
            .send(ok(json!({ "results": [{ "wrapperType": "unknown" }] })))
            .unwrap();

        assert!(h.next_outcome().await);
        assert_eq!(h.coordinator.state(), SearchState::NoResults);
    }

    #[tokio::test]
    async fn http_error_reverts_state() {
        let mut h = Harness::new();
        h.search("abba", Category::All).await;
        let (_, reply) = h.next_request().await;
        reply
            .send(Ok(CatalogResponse {
                status: 503,
                body: b"{\"results\": []}".to_vec(),
            }))
            .unwrap();

        assert!(!h.next_outcome().await);
        assert_eq!(h.coordinator.state(), SearchState::NotSearchedYet);
    }

    #[tokio::test]
    async fn transport_error_reverts_state() {
        let mut h = Harness::new();
        h.search("abba", Category::All).await;
        let (_, reply) = h.next_request().await;
        reply
            .send(Err(SearchError::Transport("connection reset".into())))
            .unwrap();

        assert!(!h.next_outcome().await);
        assert_eq!(h.coordinator.state(), SearchState::NotSearchedYet);
    }

    #[tokio::test]
    async fn non_object_body_fails_but_empty_object_does_not() {
        let mut h = Harness::new();
        h.search("abba", Category::All).await;
        let (_, reply) = h.next_request().await;
        reply
            .send(Ok(CatalogResponse {
                status: 200,
                body: b"<html>maintenance</html>".to_vec(),
            }))
            .unwrap();
        assert!(!h.next_outcome().await);
        assert_eq!(h.coordinator.state(), SearchState::NotSearchedYet);

        h.search("abba", Category::All).await;
        let (_, reply) = h.next_request().await;
        reply.send(ok(json!({}))).unwrap();
        assert!(h.next_outcome().await);
        assert_eq!(h.coordinator.state(), SearchState::NoResults);
    }

    #[tokio::test]
    async fn cancel_returns_to_not_searched_yet() {
        let mut h = Harness::new();
        h.search("abba", Category::All).await;
        let (_, mut reply) = h.next_request().await;

        h.coordinator.cancel().await;
        assert_eq!(h.coordinator.state(), SearchState::NotSearchedYet);

        assert_dropped(&mut reply).await;
        assert!(reply.send(ok(tracks(&["Waterloo"]))).is_err());
        h.assert_no_more_outcomes().await;
        assert_eq!(h.coordinator.state(), SearchState::NotSearchedYet);
    }

    #[tokio::test]
    async fn cancel_keeps_finished_results() {
        let mut h = Harness::new();
        h.search("abba", Category::All).await;
        let (_, reply) = h.next_request().await;
        reply.send(ok(tracks(&["Waterloo"]))).unwrap();
        assert!(h.next_outcome().await);

        h.coordinator.cancel().await;
        assert_eq!(names(&h.coordinator.state()), vec!["Waterloo"]);
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let mut h = Harness::new();
        let mut states = h.coordinator.subscribe();

        h.search("abba", Category::Software).await;
        assert!(states.has_changed().unwrap());
        assert!(states.borrow_and_update().is_loading());

        let (url, reply) = h.next_request().await;
        assert!(url.query().unwrap().contains("entity=software"));
        reply.send(ok(tracks(&["Fernando"]))).unwrap();

        states.changed().await.unwrap();
        assert_eq!(names(&states.borrow_and_update()), vec!["Fernando"]);
        assert!(h.next_outcome().await);
    }
}
