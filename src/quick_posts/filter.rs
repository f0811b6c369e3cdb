//! Which posts of a topic qualify as quick posts.

use anyhow::Result;

use super::pagination::SortDirection;
use crate::db::{self, Database, Post, PostType};

/// The eligibility predicate: not the opening post, not soft-deleted, regular.
///
/// Mirrors `db::QUICK_POST_PREDICATE`, which applies the same rule in SQL.
#[must_use]
pub fn is_eligible(post: &Post) -> bool {
    post.post_number != 1
        && post.deleted_at.is_none()
        && post.post_type_enum() == Some(PostType::Regular)
}

/// Every quick post of a topic, in the given direction's total order.
///
/// The topic is assumed to exist; callers resolve it first.
///
/// # Errors
///
/// Returns an error if the post store cannot be queried.
pub async fn eligible_posts(
    db: &Database,
    topic_id: i64,
    direction: SortDirection,
) -> Result<Vec<Post>> {
    let mut posts = db::get_eligible_posts(db.pool(), topic_id).await?;
    debug_assert!(posts.iter().all(is_eligible));
    posts.sort_by(|a, b| direction.compare(a, b));
    Ok(posts)
}
