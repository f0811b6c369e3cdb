//! Canonicalization of quick-post responses across server versions.
//!
//! Every known historical field name is listed once in [`ALIASES`]; the first
//! alias present with the right shape for a canonical field wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::quick_posts::PublicPost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CanonicalField {
    Content,
    TotalCount,
    PageNumber,
}

struct FieldAlias {
    path: &'static [&'static str],
    canonical: CanonicalField,
}

const ALIASES: &[FieldAlias] = &[
    FieldAlias { path: &["quick_posts"], canonical: CanonicalField::Content },
    FieldAlias { path: &["posts"], canonical: CanonicalField::Content },
    FieldAlias { path: &["quickPosts"], canonical: CanonicalField::Content },
    FieldAlias { path: &["data"], canonical: CanonicalField::Content },
    FieldAlias { path: &["total_posts"], canonical: CanonicalField::TotalCount },
    FieldAlias { path: &["meta", "total_count"], canonical: CanonicalField::TotalCount },
    FieldAlias { path: &["meta", "total_posts"], canonical: CanonicalField::TotalCount },
    FieldAlias { path: &["total_count"], canonical: CanonicalField::TotalCount },
    FieldAlias { path: &["totalCount"], canonical: CanonicalField::TotalCount },
    FieldAlias { path: &["current_page"], canonical: CanonicalField::PageNumber },
    FieldAlias { path: &["meta", "page_number"], canonical: CanonicalField::PageNumber },
    FieldAlias { path: &["meta", "current_page"], canonical: CanonicalField::PageNumber },
    FieldAlias { path: &["page"], canonical: CanonicalField::PageNumber },
];

/// Wrapper keys a created record may arrive under.
const RECORD_WRAPPERS: &[&str] = &["quick_post", "post"];

/// Canonical listing handed to callers regardless of server version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPostPage {
    pub content: Vec<PublicPost>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total_count: i64,
    pub page_number: i64,
}

fn lookup<'a>(body: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(body, |value, key| value.get(key))
        .filter(|value| !value.is_null())
}

fn as_count(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

impl CanonicalField {
    /// Whether a candidate value has the shape this field needs.
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Content => value.is_array(),
            Self::TotalCount | Self::PageNumber => as_count(value).is_some(),
        }
    }
}

/// First alias whose value has the right shape; wrong-typed candidates fall through.
fn resolve(body: &Value, canonical: CanonicalField) -> Option<&Value> {
    ALIASES
        .iter()
        .filter(|alias| alias.canonical == canonical)
        .filter_map(|alias| lookup(body, alias.path))
        .find(|value| canonical.accepts(value))
}

/// Normalize a listing response into `{content, meta}`.
///
/// A body without any known list field yields an empty listing. A missing
/// total falls back to the number of items, a missing page to the requested one.
///
/// # Errors
///
/// Returns an error if the list is present but its items are not posts.
pub fn normalize_listing(
    body: &Value,
    requested_page: Option<u32>,
) -> Result<QuickPostPage, serde_json::Error> {
    let content_value = if body.is_array() {
        Some(body)
    } else {
        resolve(body, CanonicalField::Content)
    };

    let content: Vec<PublicPost> = match content_value {
        Some(list) => Vec::<PublicPost>::deserialize(list)?,
        None => Vec::new(),
    };

    let total_count = resolve(body, CanonicalField::TotalCount)
        .and_then(as_count)
        .unwrap_or(content.len() as i64);
    let page_number = resolve(body, CanonicalField::PageNumber)
        .and_then(as_count)
        .unwrap_or_else(|| i64::from(requested_page.unwrap_or(1).max(1)));

    Ok(QuickPostPage {
        content,
        meta: PageMeta {
            total_count,
            page_number,
        },
    })
}

/// Strip a known wrapper key from a created-record response.
#[must_use]
pub fn unwrap_record(body: Value) -> Value {
    let Value::Object(mut map) = body else {
        return body;
    };
    for key in RECORD_WRAPPERS {
        if map.get(*key).is_some_and(Value::is_object) {
            return map.remove(*key).unwrap_or(Value::Null);
        }
    }
    Value::Object(map)
}
