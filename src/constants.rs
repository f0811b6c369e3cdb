//! Shared constants used across the application.

use crate::quick_posts::SortDirection;

/// Number of quick posts shown in the inline preview feed.
pub const RECENT_LIMIT: u32 = 3;

/// Page size of the full quick-post listing.
pub const FULL_PAGE_SIZE: u32 = 100;

/// Ordering applied to both the preview feed and the full listing.
///
/// Historical versions of the feature disagreed on this; oldest-first is current.
pub const DEFAULT_SORT_DIRECTION: SortDirection = SortDirection::Asc;

pub const DEFAULT_MIN_POST_LENGTH: usize = 10;
pub const DEFAULT_MAX_POST_LENGTH: usize = 32_000;

/// Header the host platform uses to identify the acting user on API requests.
pub const API_USERNAME_HEADER: &str = "Api-Username";

/// User agent sent by the client adapter.
pub const CLIENT_USER_AGENT: &str = "discourse-quick-posts/0.1";
