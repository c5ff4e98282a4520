use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use studio_core::errors::{StudioError, StudioResult};
use studio_core::models::user::{Credentials, NewUser, Session, User, UserUpdate};
use studio_core::services::UserService;
use tracing::info;

use crate::models::convert_all;
use crate::repositories::users;
use crate::DbPool;

const TOKEN_LENGTH: usize = 48;
const INVALID_LOGIN: &str = "Invalid email or password";

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub struct PgUserService {
    pool: DbPool,
    session_ttl: Duration,
}

impl PgUserService {
    pub fn new(pool: DbPool, session_ttl: Duration) -> Self {
        Self { pool, session_ttl }
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn register(&self, user: NewUser) -> StudioResult<User> {
        let email = user.email.to_lowercase();
        if users::get_user_by_email(&self.pool, &email).await?.is_some() {
            return Err(StudioError::Conflict(format!(
                "Email {} is already registered",
                email
            )));
        }

        let hash = users::hash_password(&user.password)?;
        let row = users::create_user(
            &self.pool,
            &user.name,
            &email,
            user.phone.as_deref(),
            &hash,
            user.role.as_str(),
        )
        .await?;

        info!("Registered user {} ({})", row.id, row.email);
        Ok(User::try_from(row)?)
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> StudioResult<User> {
        let existing = users::get_user_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StudioError::not_found("User", id))?;

        let email = update.email.to_lowercase();
        if email != existing.email {
            if let Some(other) = users::get_user_by_email(&self.pool, &email).await? {
                if other.id != id {
                    return Err(StudioError::Conflict(format!(
                        "Email {} is already registered",
                        email
                    )));
                }
            }
        }

        let hash = match update.password.as_deref() {
            Some(password) => users::hash_password(password)?,
            None => existing.password_hash.clone(),
        };
        let role = match update.role {
            Some(role) => role.as_str().to_string(),
            None => existing.role.clone(),
        };

        let row = users::update_user(
            &self.pool,
            id,
            &update.name,
            &email,
            update.phone.as_deref(),
            &hash,
            &role,
        )
        .await?;

        Ok(User::try_from(row)?)
    }

    async fn get_user(&self, id: i64) -> StudioResult<User> {
        let row = users::get_user_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StudioError::not_found("User", id))?;
        Ok(User::try_from(row)?)
    }

    async fn list_users(&self) -> StudioResult<Vec<User>> {
        let rows = users::list_users(&self.pool).await?;
        Ok(convert_all(rows)?)
    }

    async fn login(&self, credentials: Credentials) -> StudioResult<Session> {
        let email = credentials.email.to_lowercase();
        let Some(row) = users::get_user_by_email(&self.pool, &email).await? else {
            return Err(StudioError::Authentication(INVALID_LOGIN.to_string()));
        };
        if !users::verify_password(&credentials.password, &row.password_hash)? {
            return Err(StudioError::Authentication(INVALID_LOGIN.to_string()));
        }

        let now = Utc::now();
        users::delete_expired_sessions(&self.pool, now).await?;

        let token = generate_token();
        let session =
            users::create_session(&self.pool, &token, row.id, now + self.session_ttl).await?;

        info!("User {} logged in", row.id);
        Ok(Session {
            token: session.token,
            user: User::try_from(row)?,
            expires_at: session.expires_at,
        })
    }

    async fn authenticate(&self, token: &str) -> StudioResult<User> {
        let session = users::get_session(&self.pool, token)
            .await?
            .ok_or_else(|| StudioError::Authentication("Invalid session".to_string()))?;

        if session.expires_at <= Utc::now() {
            users::delete_session(&self.pool, token).await?;
            return Err(StudioError::Authentication("Session expired".to_string()));
        }

        let row = users::get_user_by_id(&self.pool, session.user_id)
            .await?
            .ok_or_else(|| StudioError::Authentication("Invalid session".to_string()))?;
        Ok(User::try_from(row)?)
    }

    async fn logout(&self, token: &str) -> StudioResult<()> {
        users::delete_session(&self.pool, token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_long_and_distinct() {
        let first = generate_token();
        let second = generate_token();
        assert_eq!(first.len(), TOKEN_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
