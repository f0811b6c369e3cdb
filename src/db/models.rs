use serde::{Deserialize, Serialize};

/// Discourse post types. Only regular posts are shown as quick posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Regular,
    ModeratorAction,
    SmallAction,
    Whisper,
}

impl PostType {
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Regular => 1,
            Self::ModeratorAction => 2,
            Self::SmallAction => 3,
            Self::Whisper => 4,
        }
    }

    #[must_use]
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Regular),
            2 => Some(Self::ModeratorAction),
            3 => Some(Self::SmallAction),
            4 => Some(Self::Whisper),
            _ => None,
        }
    }
}

/// A forum user. Quick posts only ever read users.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub avatar_template: Option<String>,
    pub trust_level: i64,
    pub admin: bool,
    pub moderator: bool,
    pub active: bool,
    pub flair_name: Option<String>,
    pub flair_url: Option<String>,
    pub flair_bg_color: Option<String>,
    pub flair_color: Option<String>,
}

impl User {
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.admin || self.moderator
    }
}

/// A discussion topic.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub user_id: Option<i64>,
    pub closed: bool,
    pub archived: bool,
    pub visible: bool,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

/// A post within a topic.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub topic_id: i64,
    pub user_id: Option<i64>,
    pub post_number: i64,
    pub raw: String,
    pub cooked: Option<String>,
    pub post_type: i64,
    pub reply_to_post_number: Option<i64>,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Post {
    #[must_use]
    pub fn post_type_enum(&self) -> Option<PostType> {
        PostType::from_i64(self.post_type)
    }
}

/// A post together with its author, as loaded for listings.
#[derive(Debug, Clone)]
pub struct PostWithUser {
    pub post: Post,
    pub user: Option<User>,
}

/// Data for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: Option<String>,
    pub trust_level: i64,
    pub admin: bool,
    pub moderator: bool,
}

/// Data for inserting a new topic.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub title: String,
    pub user_id: Option<i64>,
}

/// Data for inserting a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub topic_id: i64,
    pub user_id: Option<i64>,
    /// Explicit post number; `None` takes the next free number in the topic.
    pub post_number: Option<i64>,
    pub raw: String,
    pub cooked: Option<String>,
    pub post_type: PostType,
    pub reply_to_post_number: Option<i64>,
    pub created_at: String,
}
