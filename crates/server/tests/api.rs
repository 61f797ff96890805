use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use base64::Engine as _;
use http_body_util::BodyExt;
use sea_orm::Database;
use tower::ServiceExt;

use migration::MigratorTrait;
use server::{ServerState, router};

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

async fn register(app: &Router, username: &str) {
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"username":"{username}","password":"secret"}}"#
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, basic_auth(user, "secret"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn body_json(res: Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn transactions_require_authentication() {
    let app = test_app().await;

    let res = send_json(&app, "GET", "/transactions", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    register(&app, "alice").await;
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/transactions")
                .header(header::AUTHORIZATION, basic_auth("alice", "wrong"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_duplicates() {
    let app = test_app().await;

    register(&app, "alice").await;
    let res = send_json(
        &app,
        "POST",
        "/register",
        None,
        Some(r#"{"username":"alice","password":"secret"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_get_and_ownership_end_to_end() {
    let app = test_app().await;
    register(&app, "alice").await;
    register(&app, "bob").await;

    let res = send_json(
        &app,
        "POST",
        "/transactions",
        Some("alice"),
        Some(
            r#"{"title":"Coffee","amount_minor":500,"kind":"expense","category":"Food","occurred_at":"2025-01-10T09:00:00Z"}"#,
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = body_json(res).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["title"], "Coffee");
    assert_eq!(created["kind"], "expense");

    // The owner reads it back.
    let res = send_json(&app, "GET", &format!("/transactions/{id}"), Some("alice"), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Another user is rejected with 403, not 404.
    let res = send_json(&app, "GET", &format!("/transactions/{id}"), Some("bob"), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // A missing id is 404 for everyone.
    let missing = uuid::Uuid::new_v4();
    let res = send_json(
        &app,
        "GET",
        &format!("/transactions/{missing}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // A malformed id never reaches the engine.
    let res = send_json(&app, "GET", "/transactions/not-a-uuid", Some("alice"), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Filtered listing sees exactly the one expense.
    let res = send_json(&app, "GET", "/transactions?kind=expense", Some("alice"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let listing = body_json(res).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["pages"], 1);
    assert_eq!(listing["transactions"].as_array().unwrap().len(), 1);

    // An unrecognized kind is ignored, not refused.
    let res = send_json(&app, "GET", "/transactions?kind=bogus", Some("alice"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let listing = body_json(res).await;
    assert_eq!(listing["total"], 1);

    // The other user's listing stays empty.
    let res = send_json(&app, "GET", "/transactions", Some("bob"), None).await;
    let listing = body_json(res).await;
    assert_eq!(listing["total"], 0);
    assert_eq!(listing["pages"], 0);
}

#[tokio::test]
async fn create_without_required_fields_is_rejected() {
    let app = test_app().await;
    register(&app, "alice").await;

    // Blank title fails engine validation.
    let res = send_json(
        &app,
        "POST",
        "/transactions",
        Some("alice"),
        Some(r#"{"title":"  ","amount_minor":100,"kind":"expense"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("title"));

    let res = send_json(
        &app,
        "POST",
        "/transactions",
        Some("alice"),
        Some(r#"{"title":"Coffee","amount_minor":-5,"kind":"expense"}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_round_trip() {
    let app = test_app().await;
    register(&app, "alice").await;

    let res = send_json(
        &app,
        "POST",
        "/transactions",
        Some("alice"),
        Some(r#"{"title":"Coffee","amount_minor":500,"kind":"expense","category":"Food"}"#),
    )
    .await;
    let created = body_json(res).await;
    let id = created["id"].as_str().unwrap().to_string();

    let res = send_json(
        &app,
        "PUT",
        &format!("/transactions/{id}"),
        Some("alice"),
        Some(r#"{"amount_minor":800}"#),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await;
    assert_eq!(updated["amount_minor"], 800);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);
    assert_eq!(updated["title"], "Coffee");

    let res = send_json(
        &app,
        "DELETE",
        &format!("/transactions/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let deleted = body_json(res).await;
    assert_eq!(deleted["deleted"], true);

    let res = send_json(&app, "GET", &format!("/transactions/{id}"), Some("alice"), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn summary_and_analytics_report_owner_scoped_views() {
    let app = test_app().await;
    register(&app, "alice").await;

    for body in [
        r#"{"title":"Salary","amount_minor":100000,"kind":"income","category":"Work"}"#,
        r#"{"title":"Coffee","amount_minor":500,"kind":"expense","category":"Food"}"#,
        r#"{"title":"Mystery","amount_minor":300,"kind":"expense"}"#,
    ] {
        let res = send_json(&app, "POST", "/transactions", Some("alice"), Some(body)).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = send_json(&app, "GET", "/transactions/summary", Some("alice"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let summary = body_json(res).await;
    assert_eq!(summary["total_income_minor"], 100000);
    assert_eq!(summary["total_expense_minor"], 800);
    assert!(!summary["monthly"].as_array().unwrap().is_empty());
    let categories = summary["categories"].as_array().unwrap();
    assert_eq!(categories[0]["category"], "Work");
    assert_eq!(categories[0]["total_minor"], 100000);

    let res = send_json(&app, "GET", "/transactions/analytics", Some("alice"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let analytics = body_json(res).await;
    // Expense-only categories, unset coalesced to "Uncategorized".
    let totals = analytics["category_totals"].as_array().unwrap();
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0]["category"], "Food");
    assert_eq!(totals[0]["total_minor"], 500);
    assert_eq!(totals[1]["category"], "Uncategorized");
    assert_eq!(totals[1]["total_minor"], 300);
}
