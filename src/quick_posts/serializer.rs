//! Public wire shape of a quick post.

use serde::{Deserialize, Serialize};

use crate::db::{Post, User};
use crate::host::Cooker;

/// Public projection of a post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_template: Option<String>,
    #[serde(default)]
    pub trust_level: i64,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub moderator: bool,
    #[serde(default)]
    pub staff: bool,
    #[serde(default)]
    pub flair_name: Option<String>,
    #[serde(default)]
    pub flair_url: Option<String>,
    #[serde(default)]
    pub flair_bg_color: Option<String>,
    #[serde(default)]
    pub flair_color: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            avatar_template: user.avatar_template.clone(),
            trust_level: user.trust_level,
            admin: user.admin,
            moderator: user.moderator,
            staff: user.is_staff(),
            flair_name: user.flair_name.clone(),
            flair_url: user.flair_url.clone(),
            flair_bg_color: user.flair_bg_color.clone(),
            flair_color: user.flair_color.clone(),
        }
    }
}

/// A quick post as returned over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPost {
    pub id: i64,
    pub post_number: i64,
    pub created_at: String,
    pub cooked: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub topic_id: i64,
    #[serde(default)]
    pub reply_to_post_number: Option<i64>,
    #[serde(default)]
    pub user: Option<PublicUser>,
}

/// Project a post to its public attributes.
///
/// A missing or blank stored `cooked` body is rendered from `raw` on the fly
/// and not written back.
#[must_use]
pub fn serialize_quick_post(
    post: &Post,
    user: Option<&User>,
    viewer_can_see_raw: bool,
    cooker: &dyn Cooker,
) -> PublicPost {
    let cooked = match post.cooked.as_deref() {
        Some(cooked) if !cooked.trim().is_empty() => cooked.to_string(),
        _ => cooker.cook(&post.raw),
    };

    PublicPost {
        id: post.id,
        post_number: post.post_number,
        created_at: post.created_at.clone(),
        cooked,
        raw: viewer_can_see_raw.then(|| post.raw.clone()),
        topic_id: post.topic_id,
        reply_to_post_number: post.reply_to_post_number,
        user: user.map(PublicUser::from),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::host::ParagraphCooker;

    struct CountingCooker(AtomicUsize);

    impl Cooker for CountingCooker {
        fn cook(&self, raw: &str) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            format!("<p>{raw}</p>")
        }
    }

    fn post(cooked: Option<&str>) -> Post {
        Post {
            id: 10,
            topic_id: 42,
            user_id: Some(5),
            post_number: 3,
            raw: "hello there".to_string(),
            cooked: cooked.map(String::from),
            post_type: 1,
            reply_to_post_number: Some(2),
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            deleted_at: None,
        }
    }

    fn user() -> User {
        User {
            id: 5,
            username: "alice".to_string(),
            name: Some("Alice".to_string()),
            avatar_template: None,
            trust_level: 2,
            admin: false,
            moderator: true,
            active: true,
            flair_name: Some("helpers".to_string()),
            flair_url: None,
            flair_bg_color: Some("ff0000".to_string()),
            flair_color: None,
        }
    }

    #[test]
    fn test_stored_cooked_is_used() {
        let cooker = CountingCooker(AtomicUsize::new(0));
        let public = serialize_quick_post(&post(Some("<p>stored</p>")), None, false, &cooker);
        assert_eq!(public.cooked, "<p>stored</p>");
        assert_eq!(cooker.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_or_blank_cooked_is_rendered_each_time() {
        let cooker = CountingCooker(AtomicUsize::new(0));
        let first = serialize_quick_post(&post(None), None, false, &cooker);
        let second = serialize_quick_post(&post(Some("  ")), None, false, &cooker);
        assert_eq!(first.cooked, "<p>hello there</p>");
        assert_eq!(second.cooked, "<p>hello there</p>");
        assert_eq!(cooker.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_raw_only_when_viewer_may_see_it() {
        let hidden = serialize_quick_post(&post(None), None, false, &ParagraphCooker);
        assert!(hidden.raw.is_none());
        let json = serde_json::to_value(&hidden).unwrap();
        assert!(json.get("raw").is_none());

        let shown = serialize_quick_post(&post(None), None, true, &ParagraphCooker);
        assert_eq!(shown.raw.as_deref(), Some("hello there"));
    }

    #[test]
    fn test_user_projection() {
        let author = user();
        let public = serialize_quick_post(&post(None), Some(&author), false, &ParagraphCooker);
        let user = public.user.as_ref().expect("user should be embedded");
        assert_eq!(user.username, "alice");
        assert!(user.staff);
        assert!(user.moderator);
        assert_eq!(user.trust_level, 2);
        assert_eq!(user.flair_name.as_deref(), Some("helpers"));

        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(json["topic_id"], 42);
        assert_eq!(json["reply_to_post_number"], 2);
        assert_eq!(json["user"]["flair_bg_color"], "ff0000");
    }

    #[test]
    fn test_minimal_user_deserializes_with_defaults() {
        let user: PublicUser = serde_json::from_str(r#"{"id": 1, "username": "bob"}"#).unwrap();
        assert!(!user.staff);
        assert_eq!(user.trust_level, 0);
    }
}
