use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use portal_search::SearchError;

use crate::routes::ApiError;

/// Header carrying the authenticated user's ID, set by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The caller as asserted by the gateway headers.
///
/// A missing or blank user ID rejects the request with 401. The role is left
/// optional so that the search itself reports a missing role as
/// `MISSING_USER_INFO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub user_role: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id =
            header_value(parts, USER_ID_HEADER).ok_or(SearchError::Unauthenticated)?;

        Ok(Caller {
            user_id,
            user_role: header_value(parts, USER_ROLE_HEADER),
        })
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Caller, ApiError> {
        let (mut parts, _) = request.into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_both_headers() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "u-1")
            .header(USER_ROLE_HEADER, " admin ")
            .body(())
            .unwrap();

        let caller = extract(request).await.unwrap();
        assert_eq!(caller.user_id, "u-1");
        assert_eq!(caller.user_role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn missing_id_is_unauthorized() {
        let request = Request::builder()
            .header(USER_ROLE_HEADER, "admin")
            .body(())
            .unwrap();

        let err = extract(request).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn blank_role_is_absent() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "u-1")
            .header(USER_ROLE_HEADER, "   ")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.unwrap().user_role, None);
    }
}
