//! Error taxonomy shared by the quick-post endpoints and the client adapter.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error kind, sent as `error_type` in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FeatureDisabled,
    TopicNotFound,
    MissingParams,
    PermissionDenied,
    PostCreationFailed,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeatureDisabled => "feature_disabled",
            Self::TopicNotFound => "topic_not_found",
            Self::MissingParams => "missing_params",
            Self::PermissionDenied => "permission_denied",
            Self::PostCreationFailed => "post_creation_failed",
            Self::Internal => "internal",
        }
    }

    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "feature_disabled" => Some(Self::FeatureDisabled),
            "topic_not_found" | "not_found" => Some(Self::TopicNotFound),
            "missing_params" | "invalid_parameters" => Some(Self::MissingParams),
            "permission_denied" | "invalid_access" | "not_logged_in" => {
                Some(Self::PermissionDenied)
            }
            "post_creation_failed" => Some(Self::PostCreationFailed),
            "internal" => Some(Self::Internal),
            _ => None,
        }
    }
}

/// Failure of a quick-post operation.
#[derive(Debug, Error)]
pub enum QuickPostError {
    #[error("Quick posts are disabled on this site.")]
    FeatureDisabled,
    #[error("The requested topic could not be found.")]
    TopicNotFound,
    #[error("Missing or invalid parameter: {0}")]
    MissingParams(String),
    #[error("{0}")]
    PermissionDenied(String),
    #[error("The post could not be created: {}", .0.join(", "))]
    PostCreationFailed(Vec<String>),
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl QuickPostError {
    /// Denial for a request with no resolvable acting user.
    #[must_use]
    pub fn not_logged_in() -> Self {
        Self::PermissionDenied("You need to be logged in to do that.".to_string())
    }

    /// Denial issued by the authorization collaborator.
    #[must_use]
    pub fn not_permitted() -> Self {
        Self::PermissionDenied("You are not permitted to view the requested resource.".to_string())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FeatureDisabled => ErrorKind::FeatureDisabled,
            Self::TopicNotFound => ErrorKind::TopicNotFound,
            Self::MissingParams(_) => ErrorKind::MissingParams,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::PostCreationFailed(_) => ErrorKind::PostCreationFailed,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Field-level messages, present only for creation failures.
    #[must_use]
    pub fn field_errors(&self) -> Option<&[String]> {
        match self {
            Self::PostCreationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type QuickPostResult<T> = Result<T, QuickPostError>;

/// JSON body of every failed quick-post request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub error_type: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl QuickPostError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::FeatureDisabled | Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::TopicNotFound => StatusCode::NOT_FOUND,
            Self::MissingParams(_) => StatusCode::BAD_REQUEST,
            Self::PostCreationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        let error = match self {
            Self::Internal(_) => "An internal error occurred.".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            error,
            error_type: self.kind(),
            errors: self.field_errors().map(<[String]>::to_vec),
        }
    }
}

impl IntoResponse for QuickPostError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            tracing::error!("Quick post request failed: {e:#}");
        } else {
            tracing::debug!(error_type = self.kind().as_str(), "Quick post request refused: {self}");
        }
        (self.status(), Json(self.to_body())).into_response()
    }
}
