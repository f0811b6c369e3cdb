//! Pure translation of client operations into request descriptors.

use reqwest::Method;
use url::Url;

/// Arguments of a quick-post `find_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindArgs {
    /// Page of the full listing. Implies the full listing.
    pub page: Option<u32>,
    /// Request the full paginated listing instead of the preview.
    pub all_posts: bool,
}

/// Method, path and query parameters of one HTTP call, independent of transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl RequestDescriptor {
    /// Path plus encoded query string, e.g. `/t/42/quick_posts?page=2`.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{}?{query}", self.path)
    }

    /// Resolve against a base URL, keeping any sub-folder the base carries.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.join(self.path.trim_start_matches('/'))?;
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

fn quick_posts_path(topic_id: i64) -> String {
    format!("/t/{topic_id}/quick_posts")
}

/// Request for a preview or a page of the full listing.
#[must_use]
pub fn path_for(topic_id: i64, args: &FindArgs) -> RequestDescriptor {
    let mut query = Vec::new();
    if args.all_posts {
        query.push(("all_quick_posts", "true".to_string()));
    }
    if let Some(page) = args.page {
        query.push(("page", page.max(1).to_string()));
    }

    RequestDescriptor {
        method: Method::GET,
        path: quick_posts_path(topic_id),
        query,
    }
}

/// Request creating a quick post; the body is sent separately.
#[must_use]
pub fn create_request(topic_id: i64) -> RequestDescriptor {
    RequestDescriptor {
        method: Method::POST,
        path: quick_posts_path(topic_id),
        query: Vec::new(),
    }
}
