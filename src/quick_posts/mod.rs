//! Quick posts: a bounded, paginated feed of lightweight replies on a topic.

mod create;
pub mod filter;
pub mod pagination;
mod serializer;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use create::CreateQuickPost;
pub use pagination::{Page, PageRequest, SortDirection};
pub use serializer::{serialize_quick_post, PublicPost, PublicUser};

use crate::config::Config;
use crate::db::{self, Database, Topic, User};
use crate::error::{QuickPostError, QuickPostResult};
use crate::host::{Cooker, Guardian, ParagraphCooker, PostCreator, SiteGuardian, SqlitePostCreator};

/// Which slice of a topic's quick posts a listing asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub all_quick_posts: bool,
}

impl ListQuery {
    /// Preview listings return only the first few posts.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        !self.all_quick_posts && self.page.is_none()
    }
}

/// Response body of `GET /t/{topic_id}/quick_posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPostList {
    pub quick_posts: Vec<PublicPost>,
    pub total_posts: i64,
    pub current_page: i64,
}

/// Entry point for listing and creating quick posts.
///
/// Holds no per-request state; every call recomputes from the post store.
#[derive(Clone)]
pub struct QuickPosts {
    config: Arc<Config>,
    db: Database,
    cooker: Arc<dyn Cooker>,
    guardian: Arc<dyn Guardian>,
    post_creator: Arc<dyn PostCreator>,
}

impl QuickPosts {
    /// Build the service with the default host collaborators.
    #[must_use]
    pub fn new(config: Arc<Config>, db: Database) -> Self {
        let cooker: Arc<dyn Cooker> = Arc::new(ParagraphCooker);
        let post_creator = Arc::new(SqlitePostCreator::new(db.clone(), cooker.clone(), &config));
        Self::with_collaborators(config, db, cooker, Arc::new(SiteGuardian), post_creator)
    }

    #[must_use]
    pub fn with_collaborators(
        config: Arc<Config>,
        db: Database,
        cooker: Arc<dyn Cooker>,
        guardian: Arc<dyn Guardian>,
        post_creator: Arc<dyn PostCreator>,
    ) -> Self {
        Self {
            config,
            db,
            cooker,
            guardian,
            post_creator,
        }
    }

    /// Fail with `FeatureDisabled` when the feature flag is off.
    ///
    /// # Errors
    ///
    /// Returns `QuickPostError::FeatureDisabled` if quick posts are turned off.
    pub fn ensure_enabled(&self) -> QuickPostResult<()> {
        if self.config.quick_posts_enabled {
            Ok(())
        } else {
            Err(QuickPostError::FeatureDisabled)
        }
    }

    async fn find_topic(&self, topic_id: i64) -> QuickPostResult<Topic> {
        db::get_topic(self.db.pool(), topic_id)
            .await?
            .ok_or(QuickPostError::TopicNotFound)
    }

    /// List a topic's quick posts: the preview window or one full page.
    ///
    /// # Errors
    ///
    /// Fails with `FeatureDisabled` before touching the store, then with
    /// `PermissionDenied`, `TopicNotFound`, or `Internal` on storage failure.
    pub async fn list(
        &self,
        topic_id: i64,
        query: &ListQuery,
        actor: Option<&User>,
    ) -> QuickPostResult<QuickPostList> {
        self.ensure_enabled()?;
        let actor = actor.ok_or_else(QuickPostError::not_logged_in)?;
        let topic = self.find_topic(topic_id).await?;
        if !self.guardian.can_see_topic(actor, &topic) {
            return Err(QuickPostError::not_permitted());
        }

        let direction = self.config.sort_direction;
        let page = if query.is_preview() {
            let limit = i64::from(self.config.recent_limit);
            let items = pagination::recent(&self.db, topic.id, limit, direction).await?;
            let total_count = db::count_quick_posts(self.db.pool(), topic.id).await?;
            Page {
                items,
                total_count,
                page_number: 1,
                page_size: limit,
            }
        } else {
            let request = PageRequest::new(
                i64::from(query.page.unwrap_or(1)),
                i64::from(self.config.page_size),
            );
            pagination::page(&self.db, topic.id, request, direction).await?
        };

        debug!(
            topic_id = topic.id,
            user_id = actor.id,
            page = page.page_number,
            returned = page.items.len(),
            total = page.total_count,
            "Listed quick posts"
        );

        let quick_posts = page
            .items
            .iter()
            .map(|item| {
                serialize_quick_post(
                    &item.post,
                    item.user.as_ref(),
                    self.guardian.can_see_raw(actor, &item.post),
                    self.cooker.as_ref(),
                )
            })
            .collect();

        Ok(QuickPostList {
            quick_posts,
            total_posts: page.total_count,
            current_page: page.page_number,
        })
    }
}
