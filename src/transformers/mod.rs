//! Transformers layer
//!
//! Each vendor supplies three small pieces: a request transformer producing
//! the wire body, a response transformer extracting a
//! [`Completion`](crate::types::Completion), and (for SSE vendors) a stream
//! chunk transformer. The shared executor drives them.

pub mod request;
pub mod response;
pub mod stream;

pub use request::{RequestTransformer, merge_extra};
pub use response::ResponseTransformer;
pub use stream::StreamChunkTransformer;
