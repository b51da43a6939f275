//! User domain module.
//!
//! - `model`: the active identity (`User`, `UserKind`)
//! - `anonymous`: generation and recognition of guest identifiers

mod anonymous;
mod model;

pub use anonymous::{ANONYMOUS_ID_PREFIX, generate_anonymous_id, is_anonymous_id};
pub use model::{GUEST_NAME, User, UserKind};
