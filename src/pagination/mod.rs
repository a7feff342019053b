//! Pagination module
//!
//! Offset pagination driven by the `data.count` field of each response.
//!
//! # Overview
//!
//! A `Paginator` inspects the previous page's body and decides whether
//! another page exists. `PaginationState` carries the offset between pages
//! of one stream run.

mod strategies;
mod types;

pub use strategies::{MarvelPaginator, DEFAULT_PAGE_SIZE};
pub use types::{NextPage, PaginationState, Paginator};
