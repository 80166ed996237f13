// handlers/mod.rs - Two-tier handler layout
//
// Public (anonymous readers) → Protected (dashboard, role-guarded per route)

pub mod protected;
pub mod public;
