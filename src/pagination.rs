use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 12;
/// Upper bound on any requested page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A validated page window.
///
/// Both fields are always at least 1 and `page_size` never exceeds
/// [`MAX_PAGE_SIZE`]; the only way to build one is through [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of rows to skip: `(page - 1) * page_size`, saturating.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    #[must_use]
    pub const fn take(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// Pagination block of a [`PageEnvelope`]. Field names are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    /// Page size.
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// One page of results plus the metadata needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageEnvelope<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PageEnvelope<T> {
    /// Combine a fetched page with the total match count.
    ///
    /// `total_pages` is `ceil(total / page_size)`, so an empty result reports
    /// zero pages. A request past the last page keeps its page number and
    /// carries no data.
    #[must_use]
    pub fn assemble(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                page: request.page(),
                limit: request.page_size(),
                total,
                total_pages: total.div_ceil(request.page_size()),
            },
        }
    }
}
