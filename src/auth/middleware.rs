use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sqlx::SqlitePool;

use crate::constants::API_USERNAME_HEADER;
use crate::db::{self as queries, User};
use crate::error::QuickPostResult;

/// Acting user named by the `Api-Username` header, resolved on demand.
///
/// Extraction never touches the database and never rejects; handlers resolve
/// the user only after the feature flag has been checked.
#[derive(Debug, Clone)]
pub struct MaybeActor {
    username: Option<String>,
    pool: SqlitePool,
}

impl MaybeActor {
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Look up the named user. Unknown or missing names resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns `QuickPostError::Internal` if the user store cannot be queried.
    pub async fn resolve(&self) -> QuickPostResult<Option<User>> {
        let Some(username) = self.username() else {
            return Ok(None);
        };
        Ok(queries::get_user_by_username(&self.pool, username).await?)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeActor
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(API_USERNAME_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from);

        Ok(MaybeActor {
            username,
            pool: SqlitePool::from_ref(state),
        })
    }
}
