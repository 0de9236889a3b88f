//! Shared vocabulary for the tyflow pipeline.
//!
//! - [`span`]: byte-offset spans and on-demand line/column lookup
//! - [`token`]: the token kinds produced by `tyflow-lexer`

pub mod span;
pub mod token;
