use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use super::role::Role;
use crate::error::CmsError;

/// Caller identity resolved from the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Per-request session context.
///
/// Inserted into request extensions by the session middleware and handed to
/// the guards explicitly. A request without a valid token carries an
/// anonymous session rather than being rejected up front.
#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self { identity: Some(identity) }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().cloned().unwrap_or_default())
    }
}

/// Soft check: the current identity, if any. Never fails.
pub fn get_current_user(session: &Session) -> Option<Identity> {
    session.identity().cloned()
}

pub fn require_auth(session: &Session) -> Result<Identity, CmsError> {
    get_current_user(session).ok_or(CmsError::Unauthorized)
}

/// The single tier comparison every role guard goes through
pub fn require_role(session: &Session, required: Role) -> Result<Identity, CmsError> {
    let identity = require_auth(session)?;

    if !identity.role.satisfies(required) {
        tracing::warn!(
            "Forbidden: user {} has role '{}', '{}' required",
            identity.id,
            identity.role,
            required
        );
        return Err(CmsError::Forbidden { required });
    }

    Ok(identity)
}

pub fn require_admin(session: &Session) -> Result<Identity, CmsError> {
    require_role(session, Role::Admin)
}

pub fn require_editor(session: &Session) -> Result<Identity, CmsError> {
    require_role(session, Role::Editor)
}

pub fn require_contributor(session: &Session) -> Result<Identity, CmsError> {
    require_role(session, Role::Contributor)
}
