//! Principal extraction for route handlers.
//!
//! The API trusts an upstream gateway to authenticate callers and forward
//! the caller's user id in an `x-user-id` header. There is no session or
//! token handling here; a request without a usable header is rejected with
//! 401 before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use basketwatch_core::UserId;

use crate::error::set_sentry_user;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that resolves the authenticated principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_lists(
///     State(state): State<AppState>,
///     CurrentUser(user_id): CurrentUser,
/// ) -> Result<Json<Vec<ShoppingList>>, ApiError> {
///     // user_id is the caller; ownership checks compare against it
/// }
/// ```
#[derive(Debug)]
pub struct CurrentUser(pub UserId);

/// Error returned when a request carries no usable principal.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// The `x-user-id` header is absent.
    MissingHeader,
    /// The `x-user-id` header is not a positive integer.
    MalformedHeader,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingHeader => "Missing x-user-id header",
            Self::MalformedHeader => "Malformed x-user-id header",
        };
        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(AuthRejection::MissingHeader)?;

        let id = value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .ok_or(AuthRejection::MalformedHeader)?;

        let user_id = UserId::new(id);
        set_sentry_user(user_id);

        Ok(Self(user_id))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<CurrentUser, AuthRejection> {
        let (mut parts, ()) = request.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    fn request_with_header(value: &str) -> Request<()> {
        Request::builder()
            .header(USER_ID_HEADER, value)
            .body(())
            .unwrap()
    }

    #[tokio::test]
    async fn test_parses_user_id_header() {
        let user = extract(request_with_header("42")).await.unwrap();
        assert_eq!(user.0, UserId::new(42));
    }

    #[tokio::test]
    async fn test_trims_surrounding_whitespace() {
        let user = extract(request_with_header(" 7 ")).await.unwrap();
        assert_eq!(user.0, UserId::new(7));
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let result = extract(Request::builder().body(()).unwrap()).await;
        assert_eq!(result.unwrap_err(), AuthRejection::MissingHeader);
    }

    #[tokio::test]
    async fn test_non_numeric_header_is_rejected() {
        let result = extract(request_with_header("alice")).await;
        assert_eq!(result.unwrap_err(), AuthRejection::MalformedHeader);
    }

    #[tokio::test]
    async fn test_non_positive_ids_are_rejected() {
        assert_eq!(
            extract(request_with_header("0")).await.unwrap_err(),
            AuthRejection::MalformedHeader
        );
        assert_eq!(
            extract(request_with_header("-3")).await.unwrap_err(),
            AuthRejection::MalformedHeader
        );
    }
}
