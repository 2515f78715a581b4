use axum::http::StatusCode;
use konsul_core::{
    models::{
        user::{LoginResponse, UserResponse},
        NewUser, Role,
    },
    repositories::UserRepository,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_log::test;

use crate::test_utils::{bearer, TestContext, JWT_SECRET};

fn registration(username: &str, email: &str) -> Value {
    json!({ "username": username, "email": email, "password": "rahasia123" })
}

#[test(tokio::test)]
async fn test_register_creates_client() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/auth/register")
        .json(&registration("budi", " Budi@Example.com "))
        .await;

    response.assert_status(StatusCode::CREATED);
    let user = response.json::<UserResponse>();
    assert_eq!(user.username, "budi");
    assert_eq!(user.email, "budi@example.com");
    assert_eq!(user.role, Role::Klien);
    assert!(response.json::<Value>().get("password_hash").is_none());
}

#[test(tokio::test)]
async fn test_register_rejects_duplicate_email() {
    let ctx = TestContext::new();
    ctx.server
        .post("/auth/register")
        .json(&registration("budi", "budi@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .post("/auth/register")
        .json(&registration("budi2", "BUDI@example.com"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Conflict: email already exists" })
    );
}

#[test(tokio::test)]
async fn test_register_rejects_duplicate_username() {
    let ctx = TestContext::new();
    ctx.server
        .post("/auth/register")
        .json(&registration("budi", "budi@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .post("/auth/register")
        .json(&registration("budi", "other@example.com"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert!(response.text().contains("username already exists"));
}

#[test(tokio::test)]
async fn test_register_validates_payload() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({ "username": "bu", "email": "not-an-email", "password": "short" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Validation error: email must be a valid email address, \
                 password must be at least 8 characters, \
                 username must be between 3 and 50 characters" })
    );
}

#[test(tokio::test)]
async fn test_login_returns_token_for_registered_user() {
    let ctx = TestContext::new();
    ctx.server
        .post("/auth/register")
        .json(&registration("sari", "sari@example.com"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "email": "SARI@example.com", "password": "rahasia123" }))
        .await;

    response.assert_status_ok();
    let login = response.json::<LoginResponse>();
    assert_eq!(login.user.email, "sari@example.com");

    let claims = ctx.tokens.verify(&login.token).unwrap();
    assert_eq!(claims.sub, login.user.id);
    assert_eq!(claims.role, Role::Klien);
}

#[test(tokio::test)]
async fn test_login_rejects_bad_credentials() {
    let ctx = TestContext::new();
    let user = ctx.create_user(Role::Klien, "rahasia123").await;

    for (email, password) in [
        (user.email.as_str(), "wrong-password"),
        ("nobody@example.com", "rahasia123"),
    ] {
        let response = ctx
            .server
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Authentication error: invalid credentials" })
        );
    }
}

#[test(tokio::test)]
async fn test_profile_returns_caller() {
    let ctx = TestContext::new();
    let (user, token) = ctx.login_as(Role::Psikolog).await;

    let response = bearer(ctx.server.get("/api/profile"), &token).await;

    response.assert_status_ok();
    let profile = response.json::<UserResponse>();
    assert_eq!(profile.id, user.id);
    assert_eq!(profile.role, Role::Psikolog);
}

#[test(tokio::test)]
async fn test_profile_of_deleted_user_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.tokens.issue(uuid::Uuid::new_v4(), Role::Klien).unwrap();

    bearer(ctx.server.get("/api/profile"), &token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test(tokio::test)]
async fn test_admin_registers_psychologist() {
    let ctx = TestContext::new();
    let (_, token) = ctx.login_as(Role::Admin).await;

    let response = bearer(ctx.server.post("/api/admin/register-psychologist"), &token)
        .json(&registration("dr_ani", "ani@example.com"))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<UserResponse>().role, Role::Psikolog);
}

#[test(tokio::test)]
async fn test_only_admin_registers_psychologist() {
    let ctx = TestContext::new();

    for role in [Role::Klien, Role::Psikolog] {
        let (_, token) = ctx.login_as(role).await;

        bearer(ctx.server.post("/api/admin/register-psychologist"), &token)
            .json(&registration("dr_ani", "ani@example.com"))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}

#[test(tokio::test)]
async fn test_token_signed_elsewhere_is_rejected() {
    let ctx = TestContext::new();
    let (user, _) = ctx.login_as(Role::Admin).await;
    let forged = konsul_api::middleware::auth::TokenKeys::new(&format!("{JWT_SECRET}-other"), 1)
        .issue(user.id, Role::Admin)
        .unwrap();

    bearer(ctx.server.get("/api/profile"), &forged)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test(tokio::test)]
async fn test_login_with_corrupt_stored_hash_is_rejected() {
    let ctx = TestContext::new();
    ctx.users
        .create(NewUser {
            username: "rusak".to_string(),
            email: "rusak@example.com".to_string(),
            password_hash: "not-a-phc-string".to_string(),
            role: Role::Klien,
        })
        .await
        .unwrap();

    ctx.server
        .post("/auth/login")
        .json(&json!({ "email": "rusak@example.com", "password": "rahasia123" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
