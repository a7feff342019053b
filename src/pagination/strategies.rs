//! Pagination strategy implementations

use super::types::{NextPage, PaginationState, Paginator};
use crate::decode::lookup_path;
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Path of the per-page result count
const COUNT_PATH: &str = "data.count";

// ============================================================================
// Marvel Pagination
// ============================================================================

/// Offset pagination for the public API
///
/// Requests `?offset=N&limit=100` and keeps going while a page comes back
/// full (`data.count >= limit`). A page holding exactly `limit` results is
/// treated as "maybe more". Developer mode stops after the first page.
#[derive(Debug, Clone)]
pub struct MarvelPaginator {
    /// Offset of the first page
    pub start_value: u32,
    /// Number of records per page
    pub page_size: u32,
    /// Stop after the first page
    pub developer_mode: bool,
}

impl Default for MarvelPaginator {
    fn default() -> Self {
        Self {
            start_value: 0,
            page_size: DEFAULT_PAGE_SIZE,
            developer_mode: false,
        }
    }
}

impl MarvelPaginator {
    /// Create a paginator starting at offset 0 with the default page size
    pub fn new(developer_mode: bool) -> Self {
        Self {
            developer_mode,
            ..Self::default()
        }
    }

    /// Override the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// State positioned at the first page
    pub fn start(&self) -> PaginationState {
        PaginationState::with_offset(self.start_value)
    }

    fn page_params(&self, offset: u32) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("offset".to_string(), offset.to_string());
        params.insert("limit".to_string(), self.page_size.to_string());
        params
    }
}

impl Paginator for MarvelPaginator {
    fn initial_params(&self, state: &PaginationState) -> HashMap<String, String> {
        self.page_params(state.offset)
    }

    fn has_more(&self, body: &Value) -> Result<bool> {
        if self.developer_mode {
            return Ok(false);
        }

        let count = lookup_path(body, COUNT_PATH)
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::RecordExtraction {
                path: COUNT_PATH.to_string(),
                message: "missing or non-integer result count".to_string(),
            })?;

        Ok(count >= u64::from(self.page_size))
    }

    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.add_page(records_count as u64);

        if !self.has_more(body)? {
            state.mark_done();
            return Ok(NextPage::Done);
        }

        state.add_offset(self.page_size);
        Ok(NextPage::with_params(self.page_params(state.offset)))
    }
}
