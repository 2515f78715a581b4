//! # Authentication Module
//!
//! Password hashing, access tokens and the bearer-token extractor used by
//! protected routes.
//!
//! Passwords are stored as Argon2 PHC strings. Access tokens are HS256 JWTs
//! carrying the user id and role.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use eyre::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use konsul_core::{errors::KonsulError, models::Role};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::error_handling::AppError;

const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated per call and the result is returned in
/// PHC string format.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash.
///
/// Returns `Ok(false)` on a mismatch and an error only when the stored hash
/// cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is malformed: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signing material for access tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration_hours: i64,
}

impl TokenKeys {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiration_hours,
        }
    }

    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiration_hours)).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

/// The authenticated caller, taken from the `Authorization: Bearer` header.
///
/// Rejects with 401 when the header is missing or the token does not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Role guard: 403 unless the caller has exactly `role`.
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError(KonsulError::Authorization(format!(
                "{} role required",
                role
            ))))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
            .ok_or_else(|| {
                AppError(KonsulError::Authentication(
                    "missing bearer token".to_string(),
                ))
            })?;

        let keys = TokenKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|err| {
            debug!(error = %err, "Rejected access token");
            AppError(KonsulError::Authentication(
                "invalid or expired token".to_string(),
            ))
        })?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

/// Caller holding the `psikolog` role.
///
/// Runs as a parts extractor, so a wrong role is answered with 403 before
/// the request body is read.
#[derive(Debug, Clone, Copy)]
pub struct Psychologist(pub AuthUser);

/// Caller holding the `admin` role. Checked before the body, like
/// [`Psychologist`].
#[derive(Debug, Clone, Copy)]
pub struct Admin(pub AuthUser);

async fn authorize<S>(parts: &mut Parts, state: &S, role: Role) -> Result<AuthUser, AppError>
where
    S: Send + Sync,
    TokenKeys: FromRef<S>,
{
    let user = AuthUser::from_request_parts(parts, state).await?;
    user.require(role)?;
    Ok(user)
}

#[async_trait]
impl<S> FromRequestParts<S> for Psychologist
where
    S: Send + Sync,
    TokenKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Psikolog).await.map(Psychologist)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Admin
where
    S: Send + Sync,
    TokenKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts, state, Role::Admin).await.map(Admin)
    }
}
