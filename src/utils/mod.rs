//! Utility modules shared by the vendor adapters.

pub mod error_handling;
pub mod streaming;
pub mod url;

pub use streaming::StreamFactory;
pub use url::join_url;
