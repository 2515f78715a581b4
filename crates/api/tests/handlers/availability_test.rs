use axum::http::StatusCode;
use konsul_core::models::{AvailabilityResponse, Role, SetAvailabilityResponse};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_log::test;
use uuid::Uuid;

use crate::test_utils::{bearer, TestContext};

const PATH: &str = "/api/psychologist/availability";

fn read_path(owner: Uuid) -> String {
    format!("/api/psychologists/{}/availability", owner)
}

fn slot(day: &str, start: &str, end: &str) -> Value {
    json!({ "day": day, "start": start, "end": end })
}

async fn read_schedule(ctx: &TestContext, owner: Uuid) -> Vec<Value> {
    let response = ctx.server.get(&read_path(owner)).await;
    response.assert_status_ok();
    response.json::<Value>()["slots"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

#[test(tokio::test)]
async fn test_set_then_get_returns_slots_in_weekday_order() {
    let ctx = TestContext::new();
    let (psychologist, token) = ctx.login_as(Role::Psikolog).await;

    let response = bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [
            slot("Rabu", "10:00:00", "15:00:00"),
            slot("Senin", "09:00:00", "12:00:00"),
        ]}))
        .await;

    response.assert_status_ok();
    let body = response.json::<SetAvailabilityResponse>();
    assert_eq!(body.owner_id, psychologist.id);
    assert_eq!(body.slots_count, 2);

    let response = ctx.server.get(&read_path(psychologist.id)).await;
    response.assert_status_ok();
    let schedule = response.json::<AvailabilityResponse>();
    assert_eq!(schedule.owner_id, psychologist.id);
    assert_eq!(
        serde_json::to_value(&schedule.slots).unwrap(),
        json!([
            slot("Senin", "09:00:00", "12:00:00"),
            slot("Rabu", "10:00:00", "15:00:00"),
        ])
    );
}

#[test(tokio::test)]
async fn test_post_is_accepted_as_put() {
    let ctx = TestContext::new();
    let (psychologist, token) = ctx.login_as(Role::Psikolog).await;

    bearer(ctx.server.post(PATH), &token)
        .json(&json!({ "slots": [slot("Jumat", "08:00:00", "08:30:00")] }))
        .await
        .assert_status_ok();

    assert_eq!(read_schedule(&ctx, psychologist.id).await.len(), 1);
}

#[test(tokio::test)]
async fn test_overlap_is_rejected_and_nothing_written() {
    let ctx = TestContext::new();
    let (psychologist, token) = ctx.login_as(Role::Psikolog).await;

    let response = bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [
            slot("Senin", "09:00:00", "10:00:00"),
            slot("Senin", "09:30:00", "11:00:00"),
        ]}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "overlapping slots for Senin: 09:00:00-10:00:00 and 09:30:00-11:00:00" })
    );
    assert!(read_schedule(&ctx, psychologist.id).await.is_empty());
}

#[test(tokio::test)]
async fn test_short_slot_is_rejected() {
    let ctx = TestContext::new();
    let (_, token) = ctx.login_as(Role::Psikolog).await;

    let response = bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [slot("Senin", "09:00:00", "09:20:00")] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("minimum consultation duration is 30 minutes"));
    assert_eq!(ctx.availability.row_count().await, 0);
}

#[test(tokio::test)]
async fn test_end_before_start_is_rejected() {
    let ctx = TestContext::new();
    let (_, token) = ctx.login_as(Role::Psikolog).await;

    let response = bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [slot("Selasa", "15:00:00", "09:00:00")] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "slot 0 (Selasa 15:00:00-09:00:00): start time must be before end time" })
    );
}

#[test(tokio::test)]
async fn test_unknown_day_is_rejected() {
    let ctx = TestContext::new();
    let (_, token) = ctx.login_as(Role::Psikolog).await;

    let response = bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [slot("Monday", "09:00:00", "10:00:00")] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("invalid day: Monday"));
}

#[test(tokio::test)]
async fn test_empty_payload_is_rejected_and_keeps_schedule() {
    let ctx = TestContext::new();
    let (psychologist, token) = ctx.login_as(Role::Psikolog).await;
    bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [slot("Senin", "09:00:00", "12:00:00")] }))
        .await
        .assert_status_ok();

    let response = bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "slots must not be empty" }));
    assert_eq!(read_schedule(&ctx, psychologist.id).await.len(), 1);
}

#[test(tokio::test)]
async fn test_delete_clears_schedule() {
    let ctx = TestContext::new();
    let (psychologist, token) = ctx.login_as(Role::Psikolog).await;
    bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [slot("Senin", "09:00:00", "12:00:00")] }))
        .await
        .assert_status_ok();

    bearer(ctx.server.delete(PATH), &token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(read_schedule(&ctx, psychologist.id).await.is_empty());
}

#[test(tokio::test)]
async fn test_repeated_put_is_idempotent() {
    let ctx = TestContext::new();
    let (psychologist, token) = ctx.login_as(Role::Psikolog).await;
    let payload = json!({ "slots": [
        slot("Kamis", "13:00:00", "14:00:00"),
        slot("Kamis", "08:00:00", "09:00:00"),
    ]});

    bearer(ctx.server.put(PATH), &token).json(&payload).await.assert_status_ok();
    let first = read_schedule(&ctx, psychologist.id).await;
    bearer(ctx.server.put(PATH), &token).json(&payload).await.assert_status_ok();
    let second = read_schedule(&ctx, psychologist.id).await;

    assert_eq!(first, second);
    assert_eq!(ctx.availability.row_count().await, 2);
}

#[test(tokio::test)]
async fn test_storage_failure_keeps_previous_schedule() {
    let ctx = TestContext::new();
    let (psychologist, token) = ctx.login_as(Role::Psikolog).await;
    bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [slot("Senin", "09:00:00", "12:00:00")] }))
        .await
        .assert_status_ok();
    let before = read_schedule(&ctx, psychologist.id).await;

    ctx.availability.fail_inserts(true);
    let response = bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [slot("Rabu", "10:00:00", "15:00:00")] }))
        .await;
    ctx.availability.fail_inserts(false);

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": "internal server error" }));
    assert_eq!(read_schedule(&ctx, psychologist.id).await, before);
}

#[test(tokio::test)]
async fn test_read_failure_is_opaque() {
    let ctx = TestContext::new();
    ctx.availability.set_unavailable(true);

    let response = ctx.server.get(&read_path(Uuid::new_v4())).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().contains("connection refused"));
}

#[test(tokio::test)]
async fn test_get_filters_by_day() {
    let ctx = TestContext::new();
    let (psychologist, token) = ctx.login_as(Role::Psikolog).await;
    bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [
            slot("Senin", "13:00:00", "14:00:00"),
            slot("Rabu", "08:00:00", "09:00:00"),
            slot("Senin", "08:00:00", "09:00:00"),
        ]}))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .get(&read_path(psychologist.id))
        .add_query_param("day", "Senin")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["slots"],
        json!([
            slot("Senin", "08:00:00", "09:00:00"),
            slot("Senin", "13:00:00", "14:00:00"),
        ])
    );
}

#[test(tokio::test)]
async fn test_get_with_unknown_day_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&read_path(Uuid::new_v4()))
        .add_query_param("day", "senin")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "invalid day: senin" }));
}

#[test(tokio::test)]
async fn test_get_unknown_owner_is_empty() {
    let ctx = TestContext::new();

    assert!(read_schedule(&ctx, Uuid::new_v4()).await.is_empty());
}

#[test(tokio::test)]
async fn test_schedules_are_per_owner() {
    let ctx = TestContext::new();
    let (first, first_token) = ctx.login_as(Role::Psikolog).await;
    let (second, second_token) = ctx.login_as(Role::Psikolog).await;

    bearer(ctx.server.put(PATH), &first_token)
        .json(&json!({ "slots": [slot("Senin", "09:00:00", "12:00:00")] }))
        .await
        .assert_status_ok();
    bearer(ctx.server.put(PATH), &second_token)
        .json(&json!({ "slots": [slot("Sabtu", "09:00:00", "10:00:00")] }))
        .await
        .assert_status_ok();
    bearer(ctx.server.delete(PATH), &first_token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(read_schedule(&ctx, first.id).await.is_empty());
    assert_eq!(
        read_schedule(&ctx, second.id).await,
        vec![slot("Sabtu", "09:00:00", "10:00:00")]
    );
}

#[test(tokio::test)]
async fn test_malformed_owner_id_answers_with_json_error() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/psychologists/not-a-uuid/availability").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Validation error: "), "{}", error);
}

#[test(tokio::test)]
async fn test_malformed_body_answers_with_json_error() {
    let ctx = TestContext::new();
    let (_, token) = ctx.login_as(Role::Psikolog).await;

    let response = bearer(ctx.server.put(PATH), &token)
        .json(&json!({ "slots": [{ "day": "Senin" }] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Validation error: "), "{}", error);
    assert_eq!(ctx.availability.row_count().await, 0);
}
