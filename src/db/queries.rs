use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{NewPost, NewTopic, NewUser, Post, PostWithUser, Topic, User};
use crate::quick_posts::SortDirection;

/// Current time as a fixed-width RFC 3339 UTC string.
///
/// Fixed microsecond precision keeps lexical order equal to chronological order,
/// which the `created_at` ordering of quick posts relies on.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

// ========== Users ==========

/// Insert a new user, returning its ID.
pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO users (username, name, trust_level, admin, moderator)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(&user.username)
    .bind(&user.name)
    .bind(user.trust_level)
    .bind(user.admin)
    .bind(user.moderator)
    .execute(pool)
    .await
    .context("Failed to insert user")?;

    Ok(result.last_insert_rowid())
}

/// Get a user by ID.
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by id")
}

/// Get a user by username (case-insensitive).
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE username = ? COLLATE NOCASE")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by username")
}

// ========== Topics ==========

/// Insert a new topic, returning its ID.
pub async fn insert_topic(pool: &SqlitePool, topic: &NewTopic) -> Result<i64> {
    let result = sqlx::query("INSERT INTO topics (title, user_id, created_at) VALUES (?, ?, ?)")
        .bind(&topic.title)
        .bind(topic.user_id)
        .bind(timestamp_now())
        .execute(pool)
        .await
        .context("Failed to insert topic")?;

    Ok(result.last_insert_rowid())
}

/// Get a topic by ID, including soft-deleted topics.
pub async fn get_topic(pool: &SqlitePool, id: i64) -> Result<Option<Topic>> {
    sqlx::query_as("SELECT * FROM topics WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch topic")
}

// ========== Posts ==========

/// Insert a new post, returning its ID.
///
/// The post number is assigned in the same statement as the insert, so
/// concurrent creators in one topic never receive the same number.
pub async fn insert_post(pool: &SqlitePool, post: &NewPost) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO posts (topic_id, user_id, post_number, raw, cooked, post_type,
                           reply_to_post_number, created_at)
        VALUES (
            ?, ?,
            COALESCE(?, (SELECT COALESCE(MAX(post_number), 0) + 1 FROM posts WHERE topic_id = ?)),
            ?, ?, ?, ?, ?
        )
        ",
    )
    .bind(post.topic_id)
    .bind(post.user_id)
    .bind(post.post_number)
    .bind(post.topic_id)
    .bind(&post.raw)
    .bind(&post.cooked)
    .bind(post.post_type.as_i64())
    .bind(post.reply_to_post_number)
    .bind(&post.created_at)
    .execute(pool)
    .await
    .context("Failed to insert post")?;

    Ok(result.last_insert_rowid())
}

/// Get a post by ID.
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    sqlx::query_as("SELECT * FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch post")
}

/// Get a live (not soft-deleted) post by its number within a topic.
pub async fn get_post_by_number(
    pool: &SqlitePool,
    topic_id: i64,
    post_number: i64,
) -> Result<Option<Post>> {
    sqlx::query_as(
        "SELECT * FROM posts WHERE topic_id = ? AND post_number = ? AND deleted_at IS NULL",
    )
    .bind(topic_id)
    .bind(post_number)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch post by number")
}

/// Soft-delete a post.
pub async fn soft_delete_post(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("UPDATE posts SET deleted_at = ? WHERE id = ?")
        .bind(timestamp_now())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to soft-delete post")?;

    Ok(())
}

// ========== Quick Posts ==========

/// SQL form of the quick-post eligibility predicate over a `posts` alias `p`.
///
/// Binds one parameter: the topic id.
pub const QUICK_POST_PREDICATE: &str =
    "p.topic_id = ? AND p.post_number <> 1 AND p.deleted_at IS NULL AND p.post_type = 1";

/// Row shape of a quick post joined with its (optional) author.
#[derive(Debug, sqlx::FromRow)]
struct QuickPostRow {
    #[sqlx(flatten)]
    post: Post,
    author_id: Option<i64>,
    author_username: Option<String>,
    author_name: Option<String>,
    author_avatar_template: Option<String>,
    author_trust_level: Option<i64>,
    author_admin: Option<bool>,
    author_moderator: Option<bool>,
    author_active: Option<bool>,
    author_flair_name: Option<String>,
    author_flair_url: Option<String>,
    author_flair_bg_color: Option<String>,
    author_flair_color: Option<String>,
}

impl QuickPostRow {
    fn into_post_with_user(self) -> PostWithUser {
        let user = match (self.author_id, self.author_username) {
            (Some(id), Some(username)) => Some(User {
                id,
                username,
                name: self.author_name,
                avatar_template: self.author_avatar_template,
                trust_level: self.author_trust_level.unwrap_or(0),
                admin: self.author_admin.unwrap_or(false),
                moderator: self.author_moderator.unwrap_or(false),
                active: self.author_active.unwrap_or(true),
                flair_name: self.author_flair_name,
                flair_url: self.author_flair_url,
                flair_bg_color: self.author_flair_bg_color,
                flair_color: self.author_flair_color,
            }),
            _ => None,
        };

        PostWithUser {
            post: self.post,
            user,
        }
    }
}

/// Every eligible quick post of a topic, unordered.
pub async fn get_eligible_posts(pool: &SqlitePool, topic_id: i64) -> Result<Vec<Post>> {
    let sql = format!("SELECT p.* FROM posts p WHERE {QUICK_POST_PREDICATE}");

    sqlx::query_as(&sql)
        .bind(topic_id)
        .fetch_all(pool)
        .await
        .context("Failed to fetch eligible posts")
}

/// Count eligible quick posts of a topic, independent of any window.
pub async fn count_quick_posts(pool: &SqlitePool, topic_id: i64) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM posts p WHERE {QUICK_POST_PREDICATE}");

    let (count,): (i64,) = sqlx::query_as(&sql)
        .bind(topic_id)
        .fetch_one(pool)
        .await
        .context("Failed to count quick posts")?;

    Ok(count)
}

/// Fetch a window of a topic's quick posts with their authors.
pub async fn get_quick_posts(
    pool: &SqlitePool,
    topic_id: i64,
    direction: SortDirection,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithUser>> {
    let sql = format!(
        r"
        SELECT
            p.*,
            u.id AS author_id,
            u.username AS author_username,
            u.name AS author_name,
            u.avatar_template AS author_avatar_template,
            u.trust_level AS author_trust_level,
            u.admin AS author_admin,
            u.moderator AS author_moderator,
            u.active AS author_active,
            u.flair_name AS author_flair_name,
            u.flair_url AS author_flair_url,
            u.flair_bg_color AS author_flair_bg_color,
            u.flair_color AS author_flair_color
        FROM posts p
        LEFT JOIN users u ON u.id = p.user_id
        WHERE {QUICK_POST_PREDICATE}
        ORDER BY {order}
        LIMIT ? OFFSET ?
        ",
        order = direction.order_by_clause("p"),
    );

    let rows: Vec<QuickPostRow> = sqlx::query_as(&sql)
        .bind(topic_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to fetch quick posts")?;

    Ok(rows
        .into_iter()
        .map(QuickPostRow::into_post_with_user)
        .collect())
}
