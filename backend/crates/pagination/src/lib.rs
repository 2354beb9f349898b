//! Offset/limit pagination primitives shared by backend endpoints.
//!
//! Inbound adapters accept 1-based `page`/`limit` query parameters and turn
//! them into a [`PageRequest`], which storage code applies as "skip `offset`,
//! then take `limit`". Responses wrap the selected slice in a [`Page`]
//! envelope that also reports the unpaginated total.

use serde::{Deserialize, Serialize};

/// Page size used when the caller omits `limit`.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while validating page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageParamsError {
    /// Pages are numbered from 1.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested page size exceeds [`MAX_LIMIT`].
    #[error("limit must not exceed {max}")]
    LimitTooLarge {
        /// Largest accepted limit.
        max: u32,
    },
}

/// Skip/take window over an ordered sequence.
///
/// `limit == None` means "everything after `offset`".
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let window = PageRequest::new(1, Some(2));
/// assert_eq!(window.apply(vec!['a', 'b', 'c', 'd']), vec!['b', 'c']);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRequest {
    offset: usize,
    limit: Option<usize>,
}

impl PageRequest {
    /// Build a window skipping `offset` items and taking at most `limit`.
    #[must_use]
    pub const fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    /// A window covering the whole sequence.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(0, None)
    }

    /// Number of leading items skipped.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Maximum number of items returned, if bounded.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Apply the window: skip first, then take.
    ///
    /// An offset beyond the end yields an empty vector.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let skipped = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}

/// Validated 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    page: u32,
    limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    /// Validate raw query values, defaulting missing ones to page 1 and
    /// [`DEFAULT_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`PageParamsError`] when the page or limit is zero, or the
    /// limit exceeds [`MAX_LIMIT`].
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageParamsError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if page == 0 {
            return Err(PageParamsError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageParamsError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageParamsError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Convert to a skip/take window: `offset = (page - 1) * limit`.
    #[must_use]
    pub fn to_request(&self) -> PageRequest {
        let limit = self.limit as usize;
        let offset = (self.page.saturating_sub(1) as usize).saturating_mul(limit);
        PageRequest::new(offset, Some(limit))
    }
}

/// Page envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Number of items across all pages.
    pub total: usize,
}

impl<T> Page<T> {
    /// Wrap a page of items.
    #[must_use]
    pub const fn new(items: Vec<T>, params: PageParams, total: usize) -> Self {
        Self {
            items,
            page: params.page,
            limit: params.limit,
            total,
        }
    }

    /// Transform every item while keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
        }
    }
}
