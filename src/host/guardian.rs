//! Authorization decisions delegated to the host platform.

use crate::db::{Post, Topic, User};

/// Answers whether an actor may see or post to a topic.
pub trait Guardian: Send + Sync {
    fn can_see_topic(&self, actor: &User, topic: &Topic) -> bool;

    fn can_create_post(&self, actor: &User, topic: &Topic) -> bool;

    /// Whether the raw source of `post` may be shown to `actor`.
    fn can_see_raw(&self, actor: &User, post: &Post) -> bool;
}

/// Default site rules.
///
/// - inactive users can do nothing
/// - deleted or unlisted topics are staff-only
/// - closed or archived topics accept posts from staff only
/// - raw text is visible to the author and staff
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteGuardian;

impl Guardian for SiteGuardian {
    fn can_see_topic(&self, actor: &User, topic: &Topic) -> bool {
        if !actor.active {
            return false;
        }
        if topic.deleted_at.is_some() || !topic.visible {
            return actor.is_staff();
        }
        true
    }

    fn can_create_post(&self, actor: &User, topic: &Topic) -> bool {
        if !self.can_see_topic(actor, topic) {
            return false;
        }
        if topic.closed || topic.archived {
            return actor.is_staff();
        }
        true
    }

    fn can_see_raw(&self, actor: &User, post: &Post) -> bool {
        actor.is_staff() || post.user_id == Some(actor.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, moderator: bool) -> User {
        User {
            id,
            username: format!("user{id}"),
            name: None,
            avatar_template: None,
            trust_level: 1,
            admin: false,
            moderator,
            active: true,
            flair_name: None,
            flair_url: None,
            flair_bg_color: None,
            flair_color: None,
        }
    }

    fn topic() -> Topic {
        Topic {
            id: 42,
            title: "A topic".to_string(),
            user_id: Some(1),
            closed: false,
            archived: false,
            visible: true,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            deleted_at: None,
        }
    }

    fn post(user_id: i64) -> Post {
        Post {
            id: 7,
            topic_id: 42,
            user_id: Some(user_id),
            post_number: 2,
            raw: "raw".to_string(),
            cooked: None,
            post_type: 1,
            reply_to_post_number: None,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_open_topic_allows_posting() {
        assert!(SiteGuardian.can_create_post(&user(2, false), &topic()));
    }

    #[test]
    fn test_closed_topic_is_staff_only() {
        let closed = Topic {
            closed: true,
            ..topic()
        };
        assert!(!SiteGuardian.can_create_post(&user(2, false), &closed));
        assert!(SiteGuardian.can_create_post(&user(3, true), &closed));
        assert!(SiteGuardian.can_see_topic(&user(2, false), &closed));
    }

    #[test]
    fn test_deleted_topic_is_hidden_from_regular_users() {
        let deleted = Topic {
            deleted_at: Some("2024-02-01T00:00:00.000000Z".to_string()),
            ..topic()
        };
        assert!(!SiteGuardian.can_see_topic(&user(2, false), &deleted));
        assert!(SiteGuardian.can_see_topic(&user(3, true), &deleted));
    }

    #[test]
    fn test_inactive_user_is_refused() {
        let inactive = User {
            active: false,
            ..user(2, false)
        };
        assert!(!SiteGuardian.can_see_topic(&inactive, &topic()));
        assert!(!SiteGuardian.can_create_post(&inactive, &topic()));
    }

    #[test]
    fn test_raw_visible_to_author_and_staff() {
        assert!(SiteGuardian.can_see_raw(&user(2, false), &post(2)));
        assert!(!SiteGuardian.can_see_raw(&user(5, false), &post(2)));
        assert!(SiteGuardian.can_see_raw(&user(3, true), &post(2)));
    }
}
