use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::db::get_user_from_token;

/// Extractor that validates the Authorization header and provides the authenticated user.
///
/// Accepts `Token <t>` and `Bearer <t>`:
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User
/// }
/// ```
pub struct AuthUser(pub User);

/// Like [`AuthUser`], but a request without an Authorization header is anonymous.
///
/// A header that is present but malformed or expired is still rejected.
pub struct OptionalAuthUser(pub Option<User>);

/// The raw token of an authenticated request, for endpoints that act on the session itself.
pub struct BearerToken(pub String);

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
    /// The token could not be checked at all (pool or query failure).
    Lookup(ApiError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::Lookup(err) => return err.into_response(),
            AuthError::MissingHeader => "Authentication credentials were not provided",
            AuthError::InvalidHeader => "Invalid Authorization header",
            AuthError::InvalidFormat => "Invalid Authorization header format",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Pull the token out of an Authorization header value.
fn parse_authorization(value: &str) -> Result<&str, AuthError> {
    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidFormat)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }
    Ok(token)
}

fn header_token(parts: &Parts) -> Result<Option<String>, AuthError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;
    parse_authorization(auth_str).map(|token| Some(token.to_string()))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match OptionalAuthUser::from_request_parts(parts, state).await? {
            OptionalAuthUser(Some(user)) => Ok(AuthUser(user)),
            OptionalAuthUser(None) => Err(AuthError::MissingHeader),
        }
    }
}

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = header_token(parts)? else {
            return Ok(OptionalAuthUser(None));
        };

        let pool = Arc::<DbPool>::from_ref(state);
        let user = get_user_from_token(&pool, &token)
            .await
            .map_err(AuthError::Lookup)?
            .ok_or(AuthError::InvalidToken)?;

        Ok(OptionalAuthUser(Some(user)))
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_token(parts)?
            .map(BearerToken)
            .ok_or(AuthError::MissingHeader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_scheme() {
        assert!(matches!(parse_authorization("Token abc123"), Ok("abc123")));
    }

    #[test]
    fn test_bearer_scheme() {
        assert!(matches!(parse_authorization("Bearer abc123"), Ok("abc123")));
    }

    #[test]
    fn test_unknown_scheme() {
        assert!(matches!(
            parse_authorization("Basic dXNlcjpwYXNz"),
            Err(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_empty_token() {
        assert!(matches!(
            parse_authorization("Token   "),
            Err(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let (parts, _) = axum::http::Request::builder()
            .uri("/api/recipes")
            .body(())
            .unwrap()
            .into_parts();
        assert!(matches!(header_token(&parts), Ok(None)));
    }

    #[test]
    fn test_bad_token_is_unauthorized() {
        assert_eq!(
            AuthError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_lookup_failure_is_server_error() {
        let err = AuthError::Lookup(ApiError::Internal("session query failed".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
