pub mod guard;
pub mod jwt;
pub mod role;

pub use guard::{
    get_current_user, require_admin, require_auth, require_contributor, require_editor, require_role, Identity,
    Session,
};
pub use jwt::{generate_jwt, issue_token, validate_jwt, Claims, JwtError};
pub use role::Role;
