//! HTTP client for the quick-post endpoints.
//!
//! Requests are described by [`request`] and responses canonicalized by
//! [`normalize`], so callers see one shape no matter which server version
//! answered.

pub mod normalize;
pub mod request;

use reqwest::Response;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::constants::{API_USERNAME_HEADER, CLIENT_USER_AGENT};
use crate::error::ErrorKind;
use crate::quick_posts::{PublicPost, PublicUser};

pub use normalize::{normalize_listing, unwrap_record, PageMeta, QuickPostPage};
pub use request::{create_request, path_for, FindArgs, RequestDescriptor};

/// Failure observed by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded with status {status}: {body}")]
    Server { status: u16, body: Value },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Error kind reported by the server, if the payload carried one.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Server { body, .. } => body
                .get("error_type")
                .and_then(Value::as_str)
                .and_then(ErrorKind::from_str),
            _ => None,
        }
    }

    /// Human-readable message from the server payload.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { body, .. } => body.get("error").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Field-level messages of a rejected creation.
    #[must_use]
    pub fn field_errors(&self) -> Vec<String> {
        match self {
            Self::Server { body, .. } => body
                .get("errors")
                .and_then(Value::as_array)
                .map(|errors| {
                    errors
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// Client for one Discourse site, acting as an optional current user.
#[derive(Debug, Clone)]
pub struct QuickPostClient {
    http: reqwest::Client,
    base_url: Url,
    current_actor: Option<PublicUser>,
}

impl QuickPostClient {
    /// Build a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, current_actor: Option<PublicUser>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .gzip(true)
            .build()?;
        Ok(Self::with_http_client(http, Url::parse(base_url)?, current_actor))
    }

    /// Build a client on top of an existing `reqwest::Client`.
    ///
    /// Timeouts and proxies are whatever that client was configured with.
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        mut base_url: Url,
        current_actor: Option<PublicUser>,
    ) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            current_actor,
        }
    }

    #[must_use]
    pub fn current_actor(&self) -> Option<&PublicUser> {
        self.current_actor.as_ref()
    }

    fn build(&self, descriptor: &RequestDescriptor) -> Result<reqwest::RequestBuilder, ClientError> {
        let url = descriptor.url(&self.base_url)?;
        debug!(method = %descriptor.method, %url, "Quick post request");

        let mut builder = self.http.request(descriptor.method.clone(), url);
        if let Some(actor) = &self.current_actor {
            builder = builder.header(API_USERNAME_HEADER, &actor.username);
        }
        Ok(builder)
    }

    /// Fetch the preview or one page of the full listing.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, an error payload, or a body
    /// whose list items are not posts.
    pub async fn find_all(
        &self,
        topic_id: i64,
        args: &FindArgs,
    ) -> Result<QuickPostPage, ClientError> {
        let descriptor = path_for(topic_id, args);
        let response = self.build(&descriptor)?.send().await?;
        let body = read_body(response).await?;
        Ok(normalize_listing(&body, args.page)?)
    }

    /// Create a quick post and return the canonical record.
    ///
    /// A record without an embedded author is attributed to the current actor.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, an error payload, or an
    /// unrecognizable record.
    pub async fn create_record(
        &self,
        topic_id: i64,
        raw: &str,
        reply_to_post_number: Option<i64>,
    ) -> Result<PublicPost, ClientError> {
        let descriptor = create_request(topic_id);
        let mut payload = json!({ "raw": raw });
        if let Some(reply_to) = reply_to_post_number {
            payload["reply_to_post_number"] = json!(reply_to);
        }

        let response = self.build(&descriptor)?.json(&payload).send().await?;
        let body = read_body(response).await?;

        let mut post: PublicPost = serde_json::from_value(unwrap_record(body))?;
        if post.user.is_none() {
            post.user.clone_from(&self.current_actor);
        }
        Ok(post)
    }
}

/// Read a response body, turning error statuses and error payloads into `Server`.
async fn read_body(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }

    let body: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text)?
    };

    if body.get("error").is_some_and(Value::is_string) {
        return Err(ClientError::Server {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_accessors() {
        let err = ClientError::Server {
            status: 422,
            body: json!({
                "error": "The post could not be created",
                "error_type": "post_creation_failed",
                "errors": ["Body is too short (minimum is 10 characters)"]
            }),
        };
        assert_eq!(err.kind(), Some(ErrorKind::PostCreationFailed));
        assert_eq!(err.server_message(), Some("The post could not be created"));
        assert_eq!(err.field_errors().len(), 1);
    }

    #[test]
    fn test_non_json_error_has_no_kind() {
        let err = ClientError::Server {
            status: 502,
            body: Value::String("<html>Bad Gateway</html>".to_string()),
        };
        assert_eq!(err.kind(), None);
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let base = Url::parse("https://forum.example.com/community").unwrap();
        let client = QuickPostClient::with_http_client(reqwest::Client::new(), base, None);
        assert_eq!(client.base_url.as_str(), "https://forum.example.com/community/");
    }
}
