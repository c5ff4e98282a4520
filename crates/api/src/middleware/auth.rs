//! # Authentication Module
//!
//! Requests authenticate with `Authorization: Bearer <session token>`. The
//! extractors here resolve the token through the user service; handlers then
//! take [`AuthUser`] or [`AdminUser`] as an argument.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use studio_core::errors::StudioError;
use studio_core::models::user::User;

use crate::{middleware::error_handling::AppError, ApiState};

/// Token carried by the `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, StudioError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| StudioError::Authentication("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| StudioError::Authentication("Malformed Authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| StudioError::Authentication("Expected a Bearer token".to_string()))?;
    Ok(token)
}

/// The raw session token, for logging out.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(&parts.headers)?.to_string()))
    }
}

/// Any signed-in user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    /// Members may only act on their own records; admins on anyone's.
    pub fn ensure_can_access(&self, user_id: i64) -> Result<(), StudioError> {
        if self.0.id == user_id || self.0.is_admin() {
            Ok(())
        } else {
            Err(StudioError::Authorization(
                "You may only access your own account".to_string(),
            ))
        }
    }

    /// The user an action applies to: the requested one for admins, the
    /// caller otherwise.
    pub fn acting_for(&self, requested: Option<i64>) -> Result<i64, StudioError> {
        match requested {
            Some(user_id) => {
                self.ensure_can_access(user_id)?;
                Ok(user_id)
            }
            None => Ok(self.0.id),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user = state.services.users.authenticate(token).await?;
        Ok(AuthUser(user))
    }
}

/// A signed-in user with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError(StudioError::Authorization(
                "Admin role required".to_string(),
            )));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use studio_core::models::user::UserRole;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn user(id: i64, role: UserRole) -> AuthUser {
        AuthUser(User {
            id,
            name: "Someone".to_string(),
            email: "someone@example.com".to_string(),
            phone: None,
            role,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc123")).unwrap(), "abc123");
    }

    #[test]
    fn missing_or_foreign_schemes_are_rejected() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(StudioError::Authentication(_))
        ));
        assert!(bearer_token(&headers("Basic abc")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
    }

    #[test]
    fn members_act_only_for_themselves() {
        let member = user(7, UserRole::Member);
        assert_eq!(member.acting_for(None).unwrap(), 7);
        assert_eq!(member.acting_for(Some(7)).unwrap(), 7);
        assert!(matches!(
            member.acting_for(Some(8)),
            Err(StudioError::Authorization(_))
        ));
    }

    #[test]
    fn admins_act_for_anyone() {
        let admin = user(1, UserRole::Admin);
        assert_eq!(admin.acting_for(Some(8)).unwrap(), 8);
        assert!(admin.ensure_can_access(99).is_ok());
    }
}
