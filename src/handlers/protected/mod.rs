// handlers/protected/mod.rs - Dashboard handlers (session required)
//
// Every handler runs its role guard before touching a service. The role
// each route needs is listed next to the route in `api::dashboard_routes`.

use serde::{Deserialize, Serialize};

pub mod categories;
pub mod divisions;
pub mod posts;
pub mod session;
pub mod users;

pub use session::whoami;

/// `?slug=` for the availability checks
#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct SlugAvailability {
    pub slug: String,
    pub available: bool,
}
