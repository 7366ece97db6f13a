//! HTTP request handlers.

mod chat;
mod health;
pub(crate) mod problem_details;

pub use chat::{chat, reset};
pub use health::health;
