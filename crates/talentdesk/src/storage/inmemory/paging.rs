//! Cursor paging over an in-memory collection.
//!
//! Items are ordered newest first by a sort key of the form
//! `<sortable timestamp>#<id>`. The cursor is the sort key of the last item
//! returned; the next page starts strictly after it.

use chrono::{DateTime, Utc};

use talentdesk_core::schema::sortable_timestamp;
use talentdesk_core::storage::{Page, PageRequest};

/// Sort key used for ordering and as the cursor.
pub fn sort_key(created_at: DateTime<Utc>, id: &str) -> String {
    format!("{}#{id}", sortable_timestamp(created_at))
}

/// Returns one page of `items`, newest first.
pub fn paginate<T>(mut items: Vec<(String, T)>, page: &PageRequest) -> Page<T> {
    items.sort_by(|a, b| b.0.cmp(&a.0));

    let limit = page.limit.max(1) as usize;
    let mut remaining = items
        .into_iter()
        .filter(|(key, _)| page.cursor.as_ref().is_none_or(|cursor| key < cursor));

    let chunk: Vec<(String, T)> = remaining.by_ref().take(limit).collect();
    let has_more = remaining.next().is_some();

    let next_cursor = if has_more {
        chunk.last().map(|(key, _)| key.clone())
    } else {
        None
    };

    Page::new(chunk.into_iter().map(|(_, item)| item).collect(), next_cursor)
}
