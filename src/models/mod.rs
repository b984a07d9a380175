//! Data model module
//!
//! Inbound chat API models and upstream provider wire shapes

pub mod chat;
pub mod upstream;

pub use chat::{ChatRequest, ChatResponse};
