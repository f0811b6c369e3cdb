//! Ordering and windowing of a topic's quick posts.

use std::cmp::Ordering;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::db::{self, Database, Post, PostWithUser};

/// Direction of the quick-post total order (`created_at`, then `id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first; the exact reverse of `Asc`.
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// `ORDER BY` body for a `posts` table aliased as `alias`.
    #[must_use]
    pub fn order_by_clause(&self, alias: &str) -> String {
        let dir = match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        };
        format!("{alias}.created_at {dir}, {alias}.id {dir}")
    }

    /// In-memory form of the same order.
    #[must_use]
    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let asc = a
            .created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id));
        match self {
            Self::Asc => asc,
            Self::Desc => asc.reverse(),
        }
    }
}

/// A 1-based page window. Sizes and numbers are clamped to at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: i64,
    page_size: i64,
}

impl PageRequest {
    #[must_use]
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn page_number(&self) -> i64 {
        self.page_number
    }

    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// `(page_number - 1) * page_size`, saturating.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }
}

/// One window of an ordered result set plus the size of the whole set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
}

/// The first `limit` quick posts of a topic, for the inline preview.
///
/// # Errors
///
/// Returns an error if the post store cannot be queried.
pub async fn recent(
    db: &Database,
    topic_id: i64,
    limit: i64,
    direction: SortDirection,
) -> Result<Vec<PostWithUser>> {
    db::get_quick_posts(db.pool(), topic_id, direction, limit.max(1), 0).await
}

/// One page of a topic's quick posts.
///
/// `total_count` is counted separately from the window, so a page past the end
/// is empty but still reports the full count.
///
/// # Errors
///
/// Returns an error if the post store cannot be queried.
pub async fn page(
    db: &Database,
    topic_id: i64,
    request: PageRequest,
    direction: SortDirection,
) -> Result<Page<PostWithUser>> {
    let items = db::get_quick_posts(
        db.pool(),
        topic_id,
        direction,
        request.page_size(),
        request.offset(),
    )
    .await?;
    let total_count = db::count_quick_posts(db.pool(), topic_id).await?;

    Ok(Page {
        items,
        total_count,
        page_number: request.page_number(),
        page_size: request.page_size(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, created_at: &str) -> Post {
        Post {
            id,
            topic_id: 1,
            user_id: None,
            post_number: id + 1,
            raw: String::new(),
            cooked: None,
            post_type: 1,
            reply_to_post_number: None,
            created_at: created_at.to_string(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_offset_is_page_minus_one_times_size() {
        assert_eq!(PageRequest::new(1, 100).offset(), 0);
        assert_eq!(PageRequest::new(2, 100).offset(), 100);
        assert_eq!(PageRequest::new(4, 3).offset(), 9);
    }

    #[test]
    fn test_non_positive_values_are_clamped() {
        let request = PageRequest::new(0, -5);
        assert_eq!(request.page_number(), 1);
        assert_eq!(request.page_size(), 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset_saturates() {
        assert_eq!(PageRequest::new(i64::MAX, i64::MAX).offset(), i64::MAX);
    }

    #[test]
    fn test_ties_break_on_id() {
        let a = post(1, "2024-01-01T00:00:00.000000Z");
        let b = post(2, "2024-01-01T00:00:00.000000Z");
        let c = post(0, "2024-01-02T00:00:00.000000Z");

        let mut posts = vec![c.clone(), b.clone(), a.clone()];
        posts.sort_by(|x, y| SortDirection::Asc.compare(x, y));
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);

        posts.sort_by(|x, y| SortDirection::Desc.compare(x, y));
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 2, 1]);
    }

    #[test]
    fn test_order_by_clause() {
        insta::assert_snapshot!(
            SortDirection::Asc.order_by_clause("p"),
            @"p.created_at ASC, p.id ASC"
        );
        assert_eq!(
            SortDirection::Desc.order_by_clause("p"),
            "p.created_at DESC, p.id DESC"
        );
    }
}
