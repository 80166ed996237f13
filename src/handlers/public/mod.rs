// handlers/public/mod.rs - Public site handlers (no session required)
//
// Read-only views of published content. Drafts never leave this tier.

pub mod categories;
pub mod divisions;
pub mod posts;
pub mod showcase;

pub use categories::list_categories;
pub use divisions::{get_division, list_divisions};
pub use posts::{get_post, list_posts};
pub use showcase::{list_achievements, list_journey};
