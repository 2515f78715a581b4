//! Creates the initial admin account if it does not exist yet.
//!
//! Reads `DATABASE_URL`, `ADMIN_EMAIL` (default `admin@example.com`),
//! `ADMIN_USERNAME` (default `admin`) and `ADMIN_PASSWORD` (required).

use color_eyre::eyre::{eyre, Result, WrapErr};
use dotenv::dotenv;
use konsul_api::middleware::auth::hash_password;
use konsul_core::{
    models::{user::normalize_email, NewUser, Role},
    repositories::UserRepository,
};
use konsul_db::{repositories::PgUserRepository, schema::initialize_database};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().init();
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;
    let email = normalize_email(
        &env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
    );
    let username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = env::var("ADMIN_PASSWORD")
        .wrap_err("ADMIN_PASSWORD environment variable must be set")?;
    if password.len() < 8 {
        return Err(eyre!("ADMIN_PASSWORD must be at least 8 characters"));
    }

    let db_pool = konsul_db::create_pool(&database_url, 1).await?;
    initialize_database(&db_pool).await?;
    let users = PgUserRepository::new(db_pool);

    info!(%email, "Checking for existing admin user");
    if let Some(existing) = users.get_by_email(email.clone()).await? {
        info!(user_id = %existing.id, role = %existing.role, "User already exists, nothing to do");
        return Ok(());
    }

    let admin = users
        .create(NewUser {
            username,
            email,
            password_hash: hash_password(&password)?,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = %admin.id, email = %admin.email, "Admin user created");

    Ok(())
}
