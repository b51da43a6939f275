//! Session domain module.
//!
//! - `model`: the backend-owned conversation thread (`ChatSession`)
//! - `message`: transcript entries (`Message`, `MessageRole`)

mod message;
mod model;

pub use message::{Message, MessageRole};
pub use model::ChatSession;
