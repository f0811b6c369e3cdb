//! Client adapter tests against mocked and live servers.

use discourse_quick_posts::client::{ClientError, FindArgs, QuickPostClient};
use discourse_quick_posts::config::Config;
use discourse_quick_posts::db::{
    insert_post, insert_topic, insert_user, Database, NewPost, NewTopic, NewUser, PostType,
};
use discourse_quick_posts::error::ErrorKind;
use discourse_quick_posts::quick_posts::PublicUser;
use discourse_quick_posts::web::{create_app, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn actor() -> PublicUser {
    serde_json::from_value(json!({"id": 7, "username": "dana", "trust_level": 2})).unwrap()
}

fn post_json(id: i64, with_user: bool) -> Value {
    let mut post = json!({
        "id": id,
        "post_number": id + 1,
        "created_at": "2024-05-01T12:00:00.000000Z",
        "cooked": "<p>quick</p>",
        "topic_id": 42,
        "reply_to_post_number": null
    });
    if with_user {
        post["user"] = json!({"id": 3, "username": "erin"});
    }
    post
}

async fn client_for(server: &MockServer) -> QuickPostClient {
    QuickPostClient::new(&server.uri(), Some(actor())).unwrap()
}

#[tokio::test]
async fn test_preview_request_and_current_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/42/quick_posts"))
        .and(header("Api-Username", "dana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quick_posts": [post_json(1, true), post_json(2, true)],
            "total_posts": 9,
            "current_page": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .await
        .find_all(42, &FindArgs::default())
        .await
        .unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.meta.total_count, 9);
    assert_eq!(page.meta.page_number, 1);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn test_full_listing_from_legacy_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/42/quick_posts"))
        .and(query_param("all_quick_posts", "true"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [post_json(5, true)],
            "meta": {"total_posts": 101, "current_page": 2}
        })))
        .mount(&server)
        .await;

    let args = FindArgs {
        page: Some(2),
        all_posts: true,
    };
    let page = client_for(&server).await.find_all(42, &args).await.unwrap();
    assert_eq!(page.content[0].id, 5);
    assert_eq!(page.meta.total_count, 101);
    assert_eq!(page.meta.page_number, 2);
}

#[tokio::test]
async fn test_missing_totals_fall_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quickPosts": [post_json(1, true), post_json(2, true), post_json(3, true)]
        })))
        .mount(&server)
        .await;

    let args = FindArgs {
        page: Some(4),
        all_posts: true,
    };
    let page = client_for(&server).await.find_all(42, &args).await.unwrap();
    assert_eq!(page.meta.total_count, 3);
    assert_eq!(page.meta.page_number, 4);
}

#[tokio::test]
async fn test_create_unwraps_and_backfills_author() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/t/42/quick_posts"))
        .and(header("Api-Username", "dana"))
        .and(body_json(json!({"raw": "sounds good to me", "reply_to_post_number": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quick_post": post_json(11, false)
        })))
        .mount(&server)
        .await;

    let post = client_for(&server)
        .await
        .create_record(42, "sounds good to me", Some(3))
        .await
        .unwrap();
    assert_eq!(post.id, 11);
    assert_eq!(post.user.unwrap().username, "dana");
}

#[tokio::test]
async fn test_create_keeps_server_author() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "post": post_json(12, true)
        })))
        .mount(&server)
        .await;

    let post = client_for(&server)
        .await
        .create_record(42, "another reply", None)
        .await
        .unwrap();
    assert_eq!(post.user.unwrap().username, "erin");
}

#[tokio::test]
async fn test_error_status_carries_kind_and_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": "The post could not be created: Body is too short",
            "error_type": "post_creation_failed",
            "errors": ["Body is too short (minimum is 10 characters)"]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .create_record(42, "short", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 422, .. }));
    assert_eq!(err.kind(), Some(ErrorKind::PostCreationFailed));
    assert_eq!(err.field_errors().len(), 1);
}

#[tokio::test]
async fn test_error_payload_with_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Quick posts are disabled on this site.",
            "error_type": "feature_disabled"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .find_all(42, &FindArgs::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::FeatureDisabled));
    assert_eq!(
        err.server_message(),
        Some("Quick posts are disabled on this site.")
    );
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = QuickPostClient::new(&uri, None).unwrap();
    let err = client.find_all(42, &FindArgs::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.kind(), None);
}

#[tokio::test]
async fn test_round_trip_against_live_server() {
    let dir = TempDir::new().unwrap();
    let db = Database::new(&dir.path().join("test.db")).await.unwrap();
    let user_id = insert_user(
        db.pool(),
        &NewUser {
            username: "dana".to_string(),
            name: Some("Dana".to_string()),
            trust_level: 2,
            admin: false,
            moderator: false,
        },
    )
    .await
    .unwrap();
    let topic_id = insert_topic(
        db.pool(),
        &NewTopic {
            title: "Live topic".to_string(),
            user_id: Some(user_id),
        },
    )
    .await
    .unwrap();
    insert_post(
        db.pool(),
        &NewPost {
            topic_id,
            user_id: Some(user_id),
            post_number: None,
            raw: "Opening post".to_string(),
            cooked: None,
            post_type: PostType::Regular,
            reply_to_post_number: None,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
        },
    )
    .await
    .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_app(AppState::new(Config::for_testing(), db));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = QuickPostClient::new(&format!("http://{addr}"), Some(actor())).unwrap();

    let created = client
        .create_record(topic_id, "Posted through the client", Some(1))
        .await
        .unwrap();
    assert_eq!(created.raw.as_deref(), Some("Posted through the client"));
    assert_eq!(created.user.as_ref().unwrap().username, "dana");

    let page = client.find_all(topic_id, &FindArgs::default()).await.unwrap();
    assert_eq!(page.meta.total_count, 1);
    assert_eq!(page.meta.page_number, 1);
    assert_eq!(page.content, vec![created]);

    let err = client
        .create_record(topic_id, "   ", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::MissingParams));
}
