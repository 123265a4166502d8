//! Offset pagination for the feed.

use std::num::NonZeroU32;

use serde::Serialize;
use thiserror::Error;

/// Upper bound for any configured or requested page size.
pub const HARD_MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be zero or greater, got {0}")]
    NegativePage(i64),
    #[error("page_size must be greater than zero, got {0}")]
    NonPositivePageSize(i64),
    #[error("page {0} is out of addressable range")]
    PageOutOfRange(i64),
}

/// Page size defaults and ceilings resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    default_page_size: NonZeroU32,
    max_page_size: NonZeroU32,
}

impl PageLimits {
    /// Builds limits, pulling both values under the hard cap and keeping the
    /// default within the maximum.
    pub fn new(default_page_size: NonZeroU32, max_page_size: NonZeroU32) -> Self {
        let cap = NonZeroU32::new(HARD_MAX_PAGE_SIZE).unwrap_or(NonZeroU32::MIN);
        let max_page_size = max_page_size.min(cap);
        Self {
            default_page_size: default_page_size.min(max_page_size),
            max_page_size,
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size.get()
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size.get()
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(
            NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(HARD_MAX_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
        )
    }
}

/// Validated zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Resolves raw query values; sizes above the maximum are clamped.
    pub fn resolve(
        page: Option<i64>,
        page_size: Option<i64>,
        limits: PageLimits,
    ) -> Result<Self, PaginationError> {
        let page = page.unwrap_or(0);
        if page < 0 {
            return Err(PaginationError::NegativePage(page));
        }
        let page = u32::try_from(page).map_err(|_| PaginationError::PageOutOfRange(page))?;

        let page_size = match page_size {
            None => limits.default_page_size(),
            Some(size) if size <= 0 => return Err(PaginationError::NonPositivePageSize(size)),
            Some(size) => u32::try_from(size)
                .unwrap_or(u32::MAX)
                .min(limits.max_page_size()),
        };

        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }
}

/// One page of results with the total across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub has_more: bool,
}

impl<T> FeedPage<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        let seen = request.offset() + u64::from(request.page_size);
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_count,
            has_more: seen < total_count,
        }
    }
}
