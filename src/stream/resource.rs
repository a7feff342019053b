//! Generic resource stream
//!
//! Builds requests for one resource, walks its pages and yields normalized
//! records lazily. Nothing beyond the current page is held in memory.

use super::definition::{Record, StreamDefinition};
use super::normalize::post_process;
use crate::config::MarvelConfig;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{MarvelPaginator, NextPage, PaginationState, Paginator};
use crate::types::{JsonValue, StringMap};
use futures::stream::{self, Stream, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

/// A stream over one resource collection
#[derive(Debug, Clone)]
pub struct ResourceStream {
    definition: &'static StreamDefinition,
    client: Arc<HttpClient>,
    paginator: MarvelPaginator,
    decoder: JsonDecoder,
    start_date: Option<String>,
}

impl ResourceStream {
    /// Create a stream sharing `client` with its siblings
    pub fn new(
        definition: &'static StreamDefinition,
        client: Arc<HttpClient>,
        config: &MarvelConfig,
    ) -> Self {
        Self {
            definition,
            client,
            paginator: MarvelPaginator::new(config.developer_mode),
            decoder: JsonDecoder::new(),
            start_date: config.start_date.clone(),
        }
    }

    /// Override the paginator
    #[must_use]
    pub fn with_paginator(mut self, paginator: MarvelPaginator) -> Self {
        self.paginator = paginator;
        self
    }

    /// Static definition of this stream
    pub fn definition(&self) -> &'static StreamDefinition {
        self.definition
    }

    /// Stream name
    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    /// Cursor the first request starts from
    ///
    /// A stored cursor wins over the configured start date.
    pub fn starting_cursor(&self, stored: Option<&str>) -> Option<String> {
        stored
            .map(str::to_string)
            .or_else(|| self.start_date.clone())
    }

    /// Query parameters for one page, without auth
    ///
    /// `page` holds the paginator's `offset`/`limit` pair.
    pub fn request_params(&self, cursor: Option<&str>, page: StringMap) -> StringMap {
        let mut params = page;
        params.insert("orderBy".to_string(), self.definition.replication_key.to_string());
        if let Some(since) = cursor {
            params.insert("modifiedSince".to_string(), since.to_string());
        }
        params
    }

    /// Normalize one raw API record
    pub fn post_process(&self, raw: JsonValue) -> Result<Record> {
        let JsonValue::Object(mut row) = raw else {
            return Err(Error::decode(format!(
                "{} record is not a JSON object",
                self.definition.name
            )));
        };
        post_process(self.definition, &mut row)?;
        Ok(Record::new(self.definition.name, row))
    }

    /// Fetch one page and ask the paginator what comes next
    pub async fn fetch_page(
        &self,
        cursor: Option<&str>,
        page: StringMap,
        state: &mut PaginationState,
    ) -> Result<(Vec<Record>, NextPage)> {
        let request = RequestConfig::new().queries(self.request_params(cursor, page));

        debug!(stream = self.name(), offset = state.offset, "Fetching page");
        let body = self
            .client
            .get_json_with_config(self.definition.path, request)
            .await?;

        let raw = self.decoder.extract(&body)?;
        let count = raw.len();
        let records = raw
            .into_iter()
            .map(|r| self.post_process(r))
            .collect::<Result<Vec<_>>>()?;

        let next = self.paginator.process_response(&body, count, state)?;
        debug!(
            stream = self.name(),
            records = count,
            done = next.is_done(),
            "Page fetched"
        );

        Ok((records, next))
    }

    /// Lazily fetch pages, one request per poll
    pub fn pages(
        &self,
        cursor: Option<String>,
    ) -> impl Stream<Item = Result<Vec<Record>>> + Send + '_ {
        let state = self.paginator.start();
        let first = self.paginator.initial_params(&state);

        stream::try_unfold((state, Some(first)), move |(mut state, page)| {
            let cursor = cursor.clone();
            async move {
                let Some(page) = page else {
                    return Ok(None);
                };
                let (records, next) = self.fetch_page(cursor.as_deref(), page, &mut state).await?;
                let next = match next {
                    NextPage::Continue { query_params } => Some(query_params),
                    NextPage::Done => None,
                };
                Ok(Some((records, (state, next))))
            }
        })
    }

    /// Lazily yield normalized records across all pages
    ///
    /// The first error ends the stream.
    pub fn records(
        &self,
        cursor: Option<String>,
    ) -> impl Stream<Item = Result<Record>> + Send + '_ {
        self.pages(cursor)
            .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
            .try_flatten()
    }
}
