//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use helm_core::error::CoreError;
use helm_core::types::UserId;

use crate::auth::jwt::validate_token;
use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;

/// The user a request acts for, from a Bearer token in `Authorization`.
///
/// Without the header, falls back to `DEV_USER_ID` when configured.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());

        let Some(header) = header else {
            return resolve_user(None, &state.config);
        };

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        resolve_user(Some(token), &state.config)
    }
}

/// Resolve a raw token (header or `?token=` query) to a user.
pub fn resolve_user(token: Option<&str>, config: &ServerConfig) -> Result<AuthUser, AppError> {
    match token {
        Some(token) => {
            let claims = validate_token(token, &config.jwt).map_err(|_| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            })?;
            Ok(AuthUser {
                user_id: claims.sub,
            })
        }
        None => config
            .dev_user_id
            .map(|user_id| AuthUser { user_id })
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            }),
    }
}
