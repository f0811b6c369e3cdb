use tracing::info;

use super::{serialize_quick_post, PublicPost, QuickPosts};
use crate::db::User;
use crate::error::{QuickPostError, QuickPostResult};
use crate::host::{PostCreateOpts, PostCreatorError};

/// Parameters of a quick-post creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateQuickPost {
    pub topic_id: i64,
    pub raw: Option<String>,
    pub reply_to_post_number: Option<i64>,
}

impl QuickPosts {
    /// Validate a request and hand it to the post-creation engine.
    ///
    /// Creation is not idempotent: two identical submissions create two posts.
    ///
    /// # Errors
    ///
    /// Fails, in order of checking, with `FeatureDisabled`, `PermissionDenied`
    /// (no actor), `MissingParams`, `TopicNotFound`, `PermissionDenied`
    /// (refused by the guardian) or `PostCreationFailed`.
    pub async fn create(
        &self,
        params: CreateQuickPost,
        actor: Option<&User>,
    ) -> QuickPostResult<PublicPost> {
        self.ensure_enabled()?;
        let actor = actor.ok_or_else(QuickPostError::not_logged_in)?;

        let raw = params
            .raw
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| QuickPostError::MissingParams("raw".to_string()))?;

        let topic = self.find_topic(params.topic_id).await?;
        if !self.guardian.can_create_post(actor, &topic) {
            return Err(QuickPostError::not_permitted());
        }

        let opts = PostCreateOpts {
            actor: actor.clone(),
            topic_id: topic.id,
            raw,
            reply_to_post_number: params.reply_to_post_number,
            skip_validations: false,
        };

        let post = match self.post_creator.create(&opts).await {
            Ok(post) => post,
            Err(PostCreatorError::Invalid(errors)) => {
                return Err(QuickPostError::PostCreationFailed(errors))
            }
            Err(PostCreatorError::Other(e)) => return Err(QuickPostError::Internal(e)),
        };

        info!(
            topic_id = topic.id,
            post_id = post.id,
            post_number = post.post_number,
            user_id = actor.id,
            "Quick post created"
        );

        Ok(serialize_quick_post(
            &post,
            Some(actor),
            true,
            self.cooker.as_ref(),
        ))
    }
}
