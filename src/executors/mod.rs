//! Executors Layer
//!
//! HTTP orchestration that wires transformers with a vendor endpoint.

pub mod chat;

pub use chat::{HeaderBuilder, HttpChatExecutor};
