//! Unified request, response and streaming types shared by every adapter.

pub mod chat;
pub mod response;
pub mod stream;
pub mod vendor;

pub use chat::{ChatMessage, ChatRequest, MessageRole, SystemPromptPlacement};
pub use response::{ChatResponse, Completion, Usage};
pub use stream::{ChatStream, StreamChunk, StreamDelta};
pub use vendor::Vendor;
