//! Resource access functions.
//!
//! Each service validates its input, runs the uniqueness pre-checks and
//! delegates storage to the shared `ContentStore`. Authorization is not
//! checked here; handlers call the guards first.

pub mod categories;
pub mod divisions;
pub mod posts;
pub mod showcase;
pub mod users;
pub mod validation;

pub use categories::CategoryService;
pub use divisions::DivisionService;
pub use posts::PostService;
pub use showcase::ShowcaseService;
pub use users::UserService;
