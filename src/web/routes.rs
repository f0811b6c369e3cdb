use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;

use super::AppState;
use crate::auth::MaybeActor;
use crate::error::{QuickPostError, QuickPostResult};
use crate::quick_posts::{CreateQuickPost, ListQuery, PublicPost, QuickPostList};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/t/:topic_id/quick_posts",
            get(list_quick_posts).post(create_quick_post),
        )
        .route("/healthz", get(health))
}

/// Topic ids arrive as strings so a malformed id is reported as a missing
/// topic instead of a plain-text extractor rejection.
fn parse_topic_id(raw: &str) -> QuickPostResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(QuickPostError::TopicNotFound)
}

// ========== JSON API Routes ==========

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<u32>,
    all_quick_posts: Option<String>,
}

impl ListParams {
    fn into_query(self) -> ListQuery {
        ListQuery {
            page: self.page,
            all_quick_posts: self.all_quick_posts.as_deref() == Some("true"),
        }
    }
}

async fn list_quick_posts(
    State(state): State<AppState>,
    actor: MaybeActor,
    Path(topic_id): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> QuickPostResult<Json<QuickPostList>> {
    state.quick_posts.ensure_enabled()?;
    let topic_id = parse_topic_id(&topic_id)?;
    let Query(params) =
        params.map_err(|e| QuickPostError::MissingParams(e.body_text()))?;
    let actor = actor.resolve().await?;

    let list = state
        .quick_posts
        .list(topic_id, &params.into_query(), actor.as_ref())
        .await?;

    Ok(Json(list))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {
    raw: Option<String>,
    reply_to_post_number: Option<i64>,
}

async fn create_quick_post(
    State(state): State<AppState>,
    actor: MaybeActor,
    Path(topic_id): Path<String>,
    body: Result<Json<CreateBody>, JsonRejection>,
) -> QuickPostResult<Json<PublicPost>> {
    state.quick_posts.ensure_enabled()?;
    let topic_id = parse_topic_id(&topic_id)?;

    // An unreadable body is treated as one without `raw`.
    let body = body.map(|Json(body)| body).unwrap_or_default();

    let params = CreateQuickPost {
        topic_id,
        raw: body.raw,
        reply_to_post_number: body.reply_to_post_number,
    };

    let actor = actor.resolve().await?;
    let post = state.quick_posts.create(params, actor.as_ref()).await?;
    Ok(Json(post))
}

async fn health() -> &'static str {
    "OK"
}
