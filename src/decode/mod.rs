//! Decode tagged JSON back into expression trees.
//!
//! Decoding is a recursive descent with no shared state. Each node kind has
//! its own [`FromJson`] implementation that checks the node's tag before
//! reading any field, and the first failure anywhere in the tree is returned
//! unchanged; no partial tree is ever produced.

mod common;
mod expressions;
mod text;

pub use common::{
    DEFAULT_MAX_DEPTH, DecodeError, DecodeOptions, Decoder, Fields, FromJson, TagError,
    decode_all, kind_name, read_tag,
};
pub use text::check_nesting;
pub(crate) use text::parse_unbounded;
