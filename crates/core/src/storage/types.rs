use serde::{Deserialize, Serialize};

use crate::jobs::Job;

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw paging parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Page size bounds, injected from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    /// Resolves a caller query into a bounded request.
    ///
    /// A missing limit gets the default; everything is clamped to `1..=max`.
    pub fn resolve(&self, query: PageQuery) -> PageRequest {
        let max = self.max_size.max(1);
        let limit = query.limit.unwrap_or(self.default_size).clamp(1, max);
        PageRequest {
            limit,
            cursor: query.cursor.filter(|c| !c.is_empty()),
        }
    }
}

/// A bounded page request. Build it with [`PageLimits::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    /// Opaque continuation token from a previous [`Page`].
    pub cursor: Option<String>,
}

impl PageRequest {
    /// First page with the given size.
    pub fn first(limit: u32) -> Self {
        Self {
            limit,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present when more results may follow.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), None)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

/// Result of a hard job delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedJob {
    pub job: Job,
    /// Applications still referencing the deleted job. They are not removed.
    pub dependent_application_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_default_size() {
        let request = PageLimits::default().resolve(PageQuery::default());
        assert_eq!(request, PageRequest::first(DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_resolve_clamps_limit() {
        let limits = PageLimits::default();
        let huge = limits.resolve(PageQuery {
            limit: Some(10_000),
            cursor: None,
        });
        assert_eq!(huge.limit, MAX_PAGE_SIZE);

        let zero = limits.resolve(PageQuery {
            limit: Some(0),
            cursor: None,
        });
        assert_eq!(zero.limit, 1);
    }

    #[test]
    fn test_resolve_drops_empty_cursor() {
        let request = PageLimits::default().resolve(PageQuery {
            limit: None,
            cursor: Some(String::new()),
        });
        assert_eq!(request.cursor, None);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2], Some("next".to_string())).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.next_cursor.as_deref(), Some("next"));
    }
}
