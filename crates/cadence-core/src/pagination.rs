//! Offset/limit pagination for list queries.
//!
//! Callers page through stable, ordered result sets; the response carries
//! the total count so a transport layer can build its own page-info or
//! cursor representation on top.

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// A requested window into an ordered result set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    /// Create a request, clamping the limit to the allowed maximum.
    /// A zero limit falls back to the default page size.
    pub fn new(limit: usize, offset: usize) -> Self {
        let limit = if limit == 0 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT)
        };
        Self { limit, offset }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Window metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// One page of items plus its window metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: PageInfo,
}

impl<T: Clone> Paged<T> {
    /// Slice a window out of an already-ordered list.
    pub fn from_slice(items: &[T], request: PageRequest) -> Self {
        let total = items.len();
        let start = request.offset.min(total);
        let end = start.saturating_add(request.limit).min(total);
        Self {
            items: items[start..end].to_vec(),
            page: PageInfo {
                total,
                limit: request.limit,
                offset: request.offset,
                has_more: end < total,
            },
        }
    }
}
