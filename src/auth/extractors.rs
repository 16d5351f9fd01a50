use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use super::jwt::{JwtKeys, TokenKind};

/// Name of the cookie carrying the access token.
pub const SESSION_COOKIE: &str = "token";

/// Extracts and validates the access token, returning the user ID.
///
/// The token is taken from `Authorization: Bearer <token>` when present,
/// otherwise from the session cookie set at login.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let token = match parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            Some(header) => header
                .strip_prefix("Bearer ")
                .or_else(|| header.strip_prefix("bearer "))
                .map(str::to_owned)
                .ok_or((
                    StatusCode::UNAUTHORIZED,
                    "Invalid Authorization header".to_string(),
                ))?,
            None => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|c| c.value().to_owned())
                .filter(|v| !v.is_empty())
                .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?,
        };

        let claims = match keys.verify(&token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                ));
            }
        };

        if claims.kind != TokenKind::Access {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Access token required".to_string(),
            ));
        }

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::Request;

    async fn extract(req: Request<()>, state: &AppState) -> Result<AuthUser, (StatusCode, String)> {
        let (mut parts, _) = req.into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn accepts_bearer_header() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let token = JwtKeys::from_ref(&state).sign_access(user_id).unwrap();
        let req = Request::builder()
            .header("authorization", format!("Bearer {token}"))
            .body(())
            .unwrap();
        let AuthUser(id) = extract(req, &state).await.expect("authorized");
        assert_eq!(id, user_id);
    }

    #[tokio::test]
    async fn accepts_session_cookie() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let token = JwtKeys::from_ref(&state).sign_access(user_id).unwrap();
        let req = Request::builder()
            .header("cookie", format!("theme=dark; {SESSION_COOKIE}={token}"))
            .body(())
            .unwrap();
        let AuthUser(id) = extract(req, &state).await.expect("authorized");
        assert_eq!(id, user_id);
    }

    #[tokio::test]
    async fn rejects_missing_token() {
        let state = AppState::fake();
        let req = Request::builder().body(()).unwrap();
        let (status, _) = extract(req, &state).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_refresh_token() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign_refresh(Uuid::new_v4()).unwrap();
        let req = Request::builder()
            .header("authorization", format!("Bearer {token}"))
            .body(())
            .unwrap();
        let (status, msg) = extract(req, &state).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "Access token required");
    }

    #[tokio::test]
    async fn rejects_non_bearer_scheme() {
        let state = AppState::fake();
        let req = Request::builder()
            .header("authorization", "Basic Zm9vOmJhcg==")
            .body(())
            .unwrap();
        let (status, _) = extract(req, &state).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
