use crate::models::{DbSession, DbUser};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use sqlx::PgExecutor;

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, role, created_at";

/// Hashes a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing password: {}", e))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        argon2::PasswordHash::new(hash).map_err(|e| eyre!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn create_user<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    email: &str,
    phone: Option<&str>,
    password_hash: &str,
    role: &str,
) -> Result<DbUser> {
    tracing::debug!("Creating user: email={}, role={}", email, role);

    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        INSERT INTO users (name, email, phone, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(password_hash)
    .bind(role)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

/// Row lock on the user, serialising balance checks made for them.
pub async fn lock_user<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn list_users<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbUser>> {
    let users = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY name ASC, id ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(users)
}

pub async fn update_user<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    name: &str,
    email: &str,
    phone: Option<&str>,
    password_hash: &str,
    role: &str,
) -> Result<DbUser> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET name = $2, email = $3, phone = $4, password_hash = $5, role = $6
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(password_hash)
    .bind(role)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

pub async fn create_session<'e, E: PgExecutor<'e>>(
    executor: E,
    token: &str,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<DbSession> {
    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token, user_id, expires_at)
        VALUES ($1, $2, $3)
        RETURNING token, user_id, expires_at, created_at
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(executor)
    .await?;

    Ok(session)
}

pub async fn get_session<'e, E: PgExecutor<'e>>(
    executor: E,
    token: &str,
) -> Result<Option<DbSession>> {
    let session = sqlx::query_as::<_, DbSession>(
        "SELECT token, user_id, expires_at, created_at FROM sessions WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(executor)
    .await?;

    Ok(session)
}

pub async fn delete_session<'e, E: PgExecutor<'e>>(executor: E, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn delete_expired_sessions<'e, E: PgExecutor<'e>>(
    executor: E,
    now: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
        .bind(now)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
