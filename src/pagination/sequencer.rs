//! Page sequencer
//!
//! Lazily walks a list endpoint. A page is only fetched once every record of
//! the previous page has been handed out; `links.next` decides whether there
//! is another page at all.

use super::types::{IterateOptions, Page, Record};
use crate::error::Result;
use crate::http::{ApiRequest, PcoClient, QueryParams};
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Method;
use std::collections::VecDeque;
use tracing::debug;

/// Iteration state
#[derive(Debug, Default)]
struct SequencerState {
    /// Records fetched but not yet yielded
    buffer: VecDeque<Record>,
    /// Request for the next page, if there is one
    next: Option<ApiRequest>,
    /// Set once the last page is consumed or an error was yielded
    exhausted: bool,
    /// Pages fetched so far
    pages: usize,
}

/// Forward-only sequence over every object of a list endpoint.
///
/// Not restartable: call `PcoClient::iterate` again to start over. Dropping
/// it part way through is fine.
#[derive(Debug)]
pub struct PageSequencer<'a> {
    client: &'a PcoClient,
    state: SequencerState,
}

impl<'a> PageSequencer<'a> {
    pub(crate) fn new(client: &'a PcoClient, url: &str, options: IterateOptions) -> Self {
        let mut query: QueryParams = options.query.into_iter().collect();
        query.insert("offset".to_string(), options.offset.to_string());
        query.insert("per_page".to_string(), options.per_page.to_string());

        let first = ApiRequest::new(Method::GET, client.normalize_url(url)).with_query(query);

        Self {
            client,
            state: SequencerState {
                next: Some(first),
                ..SequencerState::default()
            },
        }
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.state.pages
    }

    /// Pull the next record, fetching the next page when the buffer is empty.
    ///
    /// Returns `None` once the sequence is finished. After an error is
    /// returned the sequence is finished.
    pub async fn next_record(&mut self) -> Option<Result<Record>> {
        loop {
            if let Some(record) = self.state.buffer.pop_front() {
                return Some(Ok(record));
            }

            if self.state.exhausted {
                return None;
            }

            let Some(request) = self.state.next.take() else {
                self.state.exhausted = true;
                return None;
            };

            match self.fetch(&request).await {
                Ok(Some(page)) => {
                    self.state.pages += 1;
                    debug!(
                        "Fetched page {} of '{}' with {} record(s), next: {:?}",
                        self.state.pages,
                        request.url,
                        page.records.len(),
                        page.next_link
                    );
                    self.state.buffer.extend(page.records);
                    self.state.next = page
                        .next_link
                        .map(|link| ApiRequest::new(Method::GET, self.client.normalize_url(&link)));
                }
                Ok(None) => {
                    self.state.exhausted = true;
                }
                Err(e) => {
                    self.state.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }

    /// Fetch and decode one page; `None` for an empty body
    async fn fetch(&self, request: &ApiRequest) -> Result<Option<Page>> {
        let response = self.client.send(request).await?;
        response.json()?.as_ref().map(Page::from_body).transpose()
    }

    /// Turn the sequencer into a `Stream` of records
    pub fn into_stream(self) -> impl Stream<Item = Result<Record>> + 'a {
        stream::unfold(self, |mut sequencer| async move {
            sequencer
                .next_record()
                .await
                .map(|record| (record, sequencer))
        })
    }

    /// Drain every record into a vector, stopping at the first error
    pub async fn collect_all(self) -> Result<Vec<Record>> {
        self.into_stream().try_collect().await
    }
}
