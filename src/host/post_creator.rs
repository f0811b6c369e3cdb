//! The host platform's post-creation engine.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::cooker::Cooker;
use crate::config::Config;
use crate::db::{self, Database, NewPost, Post, PostType, User};

/// Options handed to the post-creation engine.
#[derive(Debug, Clone)]
pub struct PostCreateOpts {
    pub actor: User,
    pub topic_id: i64,
    pub raw: String,
    pub reply_to_post_number: Option<i64>,
    pub skip_validations: bool,
}

#[derive(Debug, Error)]
pub enum PostCreatorError {
    /// The post was rejected; one message per failed validation.
    #[error("post failed validation: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait PostCreator: Send + Sync {
    /// Validate and persist a new post.
    ///
    /// # Errors
    ///
    /// Returns `PostCreatorError::Invalid` with every validation message when
    /// the post is rejected, or `PostCreatorError::Other` on storage failure.
    async fn create(&self, opts: &PostCreateOpts) -> Result<Post, PostCreatorError>;
}

/// Creates regular posts in the local SQLite store.
#[derive(Clone)]
pub struct SqlitePostCreator {
    db: Database,
    cooker: Arc<dyn Cooker>,
    min_post_length: usize,
    max_post_length: usize,
}

impl SqlitePostCreator {
    #[must_use]
    pub fn new(db: Database, cooker: Arc<dyn Cooker>, config: &Config) -> Self {
        Self {
            db,
            cooker,
            min_post_length: config.min_post_length,
            max_post_length: config.max_post_length,
        }
    }

    async fn validate(&self, opts: &PostCreateOpts) -> anyhow::Result<Vec<String>> {
        let mut errors = Vec::new();

        let length = opts.raw.trim().chars().count();
        if length == 0 {
            errors.push("Body can't be blank".to_string());
        } else if length < self.min_post_length {
            errors.push(format!(
                "Body is too short (minimum is {} characters)",
                self.min_post_length
            ));
        } else if length > self.max_post_length {
            errors.push(format!(
                "Body is limited to {} characters; you entered {length}.",
                self.max_post_length
            ));
        }

        if let Some(number) = opts.reply_to_post_number {
            let target = db::get_post_by_number(self.db.pool(), opts.topic_id, number).await?;
            if target.is_none() {
                errors.push(format!("Reply target post #{number} does not exist in this topic"));
            }
        }

        Ok(errors)
    }

    /// A reply needs a live opening post ahead of it; without one it would
    /// itself be numbered 1 and never be listed.
    async fn has_opening_post(&self, topic_id: i64) -> anyhow::Result<bool> {
        Ok(db::get_post_by_number(self.db.pool(), topic_id, 1)
            .await?
            .is_some())
    }
}

#[async_trait]
impl PostCreator for SqlitePostCreator {
    async fn create(&self, opts: &PostCreateOpts) -> Result<Post, PostCreatorError> {
        if !self.has_opening_post(opts.topic_id).await? {
            debug!(topic_id = opts.topic_id, "Reply refused: topic has no opening post");
            return Err(PostCreatorError::Invalid(vec![
                "Topic has no opening post to reply to".to_string(),
            ]));
        }

        if !opts.skip_validations {
            let errors = self.validate(opts).await?;
            if !errors.is_empty() {
                debug!(topic_id = opts.topic_id, user_id = opts.actor.id, ?errors, "Post rejected");
                return Err(PostCreatorError::Invalid(errors));
            }
        }

        let new_post = NewPost {
            topic_id: opts.topic_id,
            user_id: Some(opts.actor.id),
            post_number: None,
            raw: opts.raw.clone(),
            cooked: Some(self.cooker.cook(&opts.raw)),
            post_type: PostType::Regular,
            reply_to_post_number: opts.reply_to_post_number,
            created_at: db::timestamp_now(),
        };

        let id = db::insert_post(self.db.pool(), &new_post).await?;
        let post = db::get_post(self.db.pool(), id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("post {id} vanished after insert"))?;

        debug!(post_id = post.id, post_number = post.post_number, "Post created");
        Ok(post)
    }
}
