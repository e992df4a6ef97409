//! Parameter mapping shared by the request transformers

pub mod token_limit;

pub use token_limit::{DEFAULT_NEW_GENERATION_MARKERS, TokenLimit, TokenLimitParam, TokenLimitPolicy};
