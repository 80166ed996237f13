use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, Identity, Session};
use crate::state::AppState;

/// Resolve the bearer token into a `Session` and attach it to the request.
///
/// Never rejects: a missing or bad token leaves the request anonymous and
/// the guards in each handler decide what that means.
pub async fn session_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let session = resolve_session(request.headers(), &state.config.security.jwt_secret);
    request.extensions_mut().insert(session);
    next.run(request).await
}

pub fn resolve_session(headers: &HeaderMap, secret: &str) -> Session {
    let token = match extract_jwt_from_headers(headers) {
        Ok(Some(token)) => token,
        Ok(None) => return Session::anonymous(),
        Err(msg) => {
            tracing::debug!("Ignoring Authorization header: {}", msg);
            return Session::anonymous();
        }
    };

    match validate_jwt(token, secret).and_then(Identity::try_from) {
        Ok(identity) => Session::authenticated(identity),
        Err(e) => {
            tracing::debug!("Treating request as anonymous: {}", e);
            Session::anonymous()
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<&str>, &'static str> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token"),
        Some(token) => Ok(Some(token.trim())),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{issue_token, Role};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn valid_token_yields_identity() {
        let identity = Identity {
            id: 7,
            email: "c@example.com".into(),
            name: None,
            role: Role::Contributor,
            image: None,
        };
        let token = issue_token(&identity, SECRET, 1).unwrap();

        let session = resolve_session(&headers_with(&format!("Bearer {}", token)), SECRET);
        assert_eq!(session.identity(), Some(&identity));
    }

    #[test]
    fn missing_or_bad_tokens_are_anonymous() {
        assert!(resolve_session(&HeaderMap::new(), SECRET).identity().is_none());
        assert!(resolve_session(&headers_with("Bearer "), SECRET).identity().is_none());
        assert!(resolve_session(&headers_with("Basic abc"), SECRET).identity().is_none());
        assert!(resolve_session(&headers_with("Bearer not.a.jwt"), SECRET).identity().is_none());
    }

    #[test]
    fn token_signed_with_another_secret_is_anonymous() {
        let identity = Identity {
            id: 1,
            email: "a@example.com".into(),
            name: None,
            role: Role::Admin,
            image: None,
        };
        let token = issue_token(&identity, "other-secret", 1).unwrap();
        assert!(resolve_session(&headers_with(&format!("Bearer {}", token)), SECRET).identity().is_none());
    }
}
