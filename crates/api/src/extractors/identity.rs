//! Client-supplied identity extractor.
//!
//! Identity arrives as request headers and is trusted as-is: there is no
//! credential behind the role flag. Every operation receives the caller's
//! context explicitly instead of reading ambient session state.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use domain::models::{UserContext, UserRole};

use crate::error::ApiError;

/// Header carrying the caller's opaque user id (e-mail in practice).
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Header carrying the caller's display name.
pub const USER_NAME_HEADER: &str = "X-User-Name";

/// Header carrying the caller's role flag (`user` or `admin`).
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// The calling user, for user-level routes.
#[derive(Debug, Clone)]
pub struct Identity(pub UserContext);

/// The calling user, restricted to the admin role.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub UserContext);

fn context_from_parts(parts: &Parts) -> Result<UserContext, ApiError> {
    let user_id = parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))?
        .to_string();

    // Fall back to the id's local part, the way the login form derives a
    // display name from the e-mail address.
    let display_name = parts
        .headers
        .get(USER_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            user_id
                .split('@')
                .next()
                .unwrap_or(user_id.as_str())
                .to_string()
        });

    let role = match parts.headers.get(USER_ROLE_HEADER) {
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| ApiError::Validation("Malformed role header".to_string()))?;
            raw.trim()
                .to_lowercase()
                .parse::<UserRole>()
                .map_err(ApiError::Validation)?
        }
        None => UserRole::User,
    };

    Ok(UserContext::new(user_id, display_name, role))
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context_from_parts(parts).map(Identity)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = context_from_parts(parts)?;
        if !ctx.is_admin() {
            return Err(ApiError::Forbidden(
                "Admin role required for this operation".to_string(),
            ));
        }
        Ok(AdminIdentity(ctx))
    }
}
