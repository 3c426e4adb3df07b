//! Database models split into domain-specific modules.

pub mod demand;
pub mod stats;
pub mod user;

pub use demand::*;
pub use stats::*;
pub use user::*;
