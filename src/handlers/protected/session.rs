use crate::auth::{require_auth, Identity, Session};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/dashboard/whoami - identity carried by the caller's token
pub async fn whoami(session: Session) -> ApiResult<Identity> {
    let identity = require_auth(&session)?;
    Ok(ApiResponse::success(identity))
}
