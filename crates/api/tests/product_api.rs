//! Integration tests for `/api/v1/products`: submission, visibility,
//! listing, status lifecycle and detail edits.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{expect_status, get_auth, login_as, post_json_auth, product_body, put_json_auth};
use launchpad_core::roles::Role;
use launchpad_events::EventKind;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn submit(app: &Router, token: &str, title: &str) -> Value {
    let response = post_json_auth(app, "/api/v1/products", token, product_body(title)).await;
    expect_status(response, StatusCode::CREATED).await["data"].clone()
}

async fn set_status(app: &Router, token: &str, id: i64, body: Value) -> axum::response::Response {
    put_json_auth(app, &format!("/api/v1/products/{id}/status"), token, body).await
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn entrepreneur_submits_pending_product(pool: PgPool) {
    let (owner, token) = login_as(&pool, "owner@example.com", Role::Entrepreneur).await;
    let (app, bus) = common::build_test_app_with_bus(pool);
    let mut events = bus.subscribe();

    let product = submit(&app, &token, "  Solar Kiosk  ").await;

    assert_eq!(product["status"], "pending");
    assert_eq!(product["owner_id"], owner.id);
    assert_eq!(product["title"], "Solar Kiosk");
    assert!(product["funding_amount"].is_null());

    let event = events.try_recv().expect("submission should publish an event");
    assert_eq!(event.kind, EventKind::ProductSubmitted);
    assert_eq!(event.source_entity_id, product["id"].as_i64().unwrap());
    assert_eq!(event.actor_user_id, Some(owner.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_requires_fields(pool: PgPool) {
    let (_, token) = login_as(&pool, "owner@example.com", Role::Entrepreneur).await;
    let app = common::build_test_app(pool);

    let mut body = product_body("Blank description");
    body["description"] = json!("   ");
    let response = post_json_auth(&app, "/api/v1/products", &token, body).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let mut body = product_body("Bad video");
    body["video_url"] = json!("not a url");
    let response = post_json_auth(&app, "/api/v1/products", &token, body).await;
    expect_status(response, StatusCode::BAD_REQUEST).await;

    let mut body = product_body("Bad image");
    body["images"] = json!(["https://img.example.com/ok.png", "not a url"]);
    let response = post_json_auth(&app, "/api/v1/products", &token, body).await;
    let json = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mentors_cannot_submit(pool: PgPool) {
    let (_, token) = login_as(&pool, "mentor@example.com", Role::Mentor).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(&app, "/api/v1/products", &token, product_body("Nope")).await;
    expect_status(response, StatusCode::FORBIDDEN).await;
}

// ---------------------------------------------------------------------------
// Visibility and listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn entrepreneurs_only_see_their_own_products(pool: PgPool) {
    let (_, alice) = login_as(&pool, "alice@example.com", Role::Entrepreneur).await;
    let (_, bob) = login_as(&pool, "bob@example.com", Role::Entrepreneur).await;
    let (_, mentor) = login_as(&pool, "mentor@example.com", Role::Mentor).await;
    let app = common::build_test_app(pool);

    let product = submit(&app, &alice, "Alice's Idea").await;
    let uri = format!("/api/v1/products/{}", product["id"]);

    // Hidden products look missing rather than forbidden.
    let json = expect_status(get_auth(&app, &uri, &bob).await, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");

    let listed = expect_status(get_auth(&app, "/api/v1/products", &bob).await, StatusCode::OK).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 0);

    let json = expect_status(get_auth(&app, &uri, &mentor).await, StatusCode::OK).await;
    assert_eq!(json["data"]["title"], "Alice's Idea");
    assert!(json["data"]["mentorship"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_newest_first_and_filters_by_status(pool: PgPool) {
    let (_, admin) = login_as(&pool, "admin@example.com", Role::Admin).await;
    let (_, owner) = login_as(&pool, "owner@example.com", Role::Entrepreneur).await;
    let app = common::build_test_app(pool);

    let first = submit(&app, &owner, "First").await;
    let second = submit(&app, &owner, "Second").await;
    let approve = set_status(&app, &admin, first["id"].as_i64().unwrap(), json!({ "status": "approved" })).await;
    expect_status(approve, StatusCode::OK).await;

    let all = expect_status(get_auth(&app, "/api/v1/products", &admin).await, StatusCode::OK).await;
    let titles: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    // Approving "First" bumped its updated_at.
    assert_eq!(titles, ["First", "Second"]);

    let pending = expect_status(
        get_auth(&app, "/api/v1/products?status=pending", &owner).await,
        StatusCode::OK,
    )
    .await;
    let data = pending["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], second["id"]);

    let bad = get_auth(&app, "/api/v1/products?status=shipped", &owner).await;
    expect_status(bad, StatusCode::BAD_REQUEST).await;
}

// ---------------------------------------------------------------------------
// Status lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_walks_product_to_funded(pool: PgPool) {
    let (admin_user, admin) = login_as(&pool, "admin@example.com", Role::Admin).await;
    let (_, owner) = login_as(&pool, "owner@example.com", Role::Entrepreneur).await;
    let (app, bus) = common::build_test_app_with_bus(pool);

    let id = submit(&app, &owner, "Fundable").await["id"].as_i64().unwrap();
    let mut events = bus.subscribe();

    let approved = expect_status(
        set_status(&app, &admin, id, json!({ "status": "approved" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(approved["data"]["status"], "approved");

    let funded = expect_status(
        set_status(&app, &admin, id, json!({ "status": "funded", "funding_amount": 50_000 })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(funded["data"]["status"], "funded");
    assert_eq!(funded["data"]["funding_amount"], 50_000);

    let first = events.try_recv().unwrap();
    assert_eq!(first.kind, EventKind::ProductStatusChanged);
    assert_eq!(first.actor_user_id, Some(admin_user.id));
    assert_eq!(first.payload["from"], "pending");
    assert_eq!(first.payload["to"], "approved");
    let second = events.try_recv().unwrap();
    assert_eq!(second.payload["funding_amount"], 50_000);

    // Repeating the same funding is a no-op; a different amount is refused.
    let same = expect_status(
        set_status(&app, &admin, id, json!({ "status": "funded", "funding_amount": 50_000 })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(same["data"]["funding_amount"], 50_000);
    assert!(events.try_recv().is_err());

    let refund = set_status(&app, &admin, id, json!({ "status": "funded", "funding_amount": 999 })).await;
    let json = expect_status(refund, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");

    let detail = expect_status(
        get_auth(&app, &format!("/api/v1/products/{id}"), &admin).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(detail["data"]["funding_amount"], 50_000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn funding_amount_rules(pool: PgPool) {
    let (_, admin) = login_as(&pool, "admin@example.com", Role::Admin).await;
    let (_, owner) = login_as(&pool, "owner@example.com", Role::Entrepreneur).await;
    let app = common::build_test_app(pool);

    let id = submit(&app, &owner, "Money").await["id"].as_i64().unwrap();
    expect_status(
        set_status(&app, &admin, id, json!({ "status": "approved" })).await,
        StatusCode::OK,
    )
    .await;

    for body in [
        json!({ "status": "funded" }),
        json!({ "status": "funded", "funding_amount": 0 }),
        json!({ "status": "funded", "funding_amount": -5 }),
        json!({ "status": "approved", "funding_amount": 10 }),
    ] {
        let json = expect_status(set_status(&app, &admin, id, body).await, StatusCode::BAD_REQUEST).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn illegal_transitions_conflict(pool: PgPool) {
    let (_, admin) = login_as(&pool, "admin@example.com", Role::Admin).await;
    let (_, owner) = login_as(&pool, "owner@example.com", Role::Entrepreneur).await;
    let app = common::build_test_app(pool);

    let id = submit(&app, &owner, "Doomed").await["id"].as_i64().unwrap();

    // pending -> funded skips approval.
    let skip = set_status(&app, &admin, id, json!({ "status": "funded", "funding_amount": 1 })).await;
    expect_status(skip, StatusCode::CONFLICT).await;

    expect_status(
        set_status(&app, &admin, id, json!({ "status": "rejected" })).await,
        StatusCode::OK,
    )
    .await;

    // Rejected is terminal, even for admins.
    let revive = set_status(&app, &admin, id, json!({ "status": "approved" })).await;
    expect_status(revive, StatusCode::CONFLICT).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_cannot_decide(pool: PgPool) {
    let (_, owner) = login_as(&pool, "owner@example.com", Role::Entrepreneur).await;
    let (_, mentor) = login_as(&pool, "mentor@example.com", Role::Mentor).await;
    let app = common::build_test_app(pool);

    let id = submit(&app, &owner, "Self-approve").await["id"].as_i64().unwrap();

    for token in [&owner, &mentor] {
        let response = set_status(&app, token, id, json!({ "status": "approved" })).await;
        expect_status(response, StatusCode::FORBIDDEN).await;
    }

    // Re-sending pending for a pending product is a no-op for the owner.
    let noop = expect_status(
        set_status(&app, &owner, id, json!({ "status": "pending" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(noop["data"]["status"], "pending");

    let bogus = set_status(&app, &owner, id, json!({ "status": "launched" })).await;
    expect_status(bogus, StatusCode::BAD_REQUEST).await;
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_edits_only_while_pending(pool: PgPool) {
    let (_, admin) = login_as(&pool, "admin@example.com", Role::Admin).await;
    let (_, owner) = login_as(&pool, "owner@example.com", Role::Entrepreneur).await;
    let (_, other) = login_as(&pool, "other@example.com", Role::Entrepreneur).await;
    let app = common::build_test_app(pool);

    let id = submit(&app, &owner, "Draft").await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/products/{id}");

    let edited = expect_status(
        put_json_auth(&app, &uri, &owner, product_body("Draft v2")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(edited["data"]["title"], "Draft v2");
    assert_eq!(edited["data"]["status"], "pending");

    let stranger = put_json_auth(&app, &uri, &other, product_body("Hijack")).await;
    expect_status(stranger, StatusCode::NOT_FOUND).await;

    expect_status(
        set_status(&app, &admin, id, json!({ "status": "approved" })).await,
        StatusCode::OK,
    )
    .await;

    let locked = put_json_auth(&app, &uri, &owner, product_body("Draft v3")).await;
    expect_status(locked, StatusCode::FORBIDDEN).await;

    let by_admin = expect_status(
        put_json_auth(&app, &uri, &admin, product_body("Curated")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(by_admin["data"]["title"], "Curated");
    assert_eq!(by_admin["data"]["status"], "approved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_product_is_not_found(pool: PgPool) {
    let (_, admin) = login_as(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    expect_status(get_auth(&app, "/api/v1/products/999999", &admin).await, StatusCode::NOT_FOUND)
        .await;
}
