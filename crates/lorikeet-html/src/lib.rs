//! Dual-context HTML fragment deserializer for Lorikeet.
//!
//! # Scope
//!
//! This crate implements the hard part of rendering received messages: it
//! converts an untrusted HTML fragment into the safe, structured
//! [`Document`] model without a prior sanitization pass.
//!
//! - **Tag allow-listing** - only the fixed sets of inline and block tags
//!   produce output; everything else is stripped while its
//!   safely-representable content is preserved
//! - **Attribute allow-listing by omission** - only a small constant table
//!   of attributes is ever read, so `onmouseover` and friends are never
//!   even consulted
//! - **Dual traversal contexts** - block context may produce any part,
//!   inline context unwraps block-only elements down to their inline
//!   content
//! - **Graceful degradation** - malformed, unsafe or unrecognized input
//!   degrades to the richest safe representation; deserialization never
//!   fails
//!
//! The fragment grammar this targets is the suggested HTML subset of
//! [§ m.room.message msgtypes](https://spec.matrix.org/v1.11/client-server-api/#mroommessage-msgtypes).

/// The dual-context recursive classifier.
pub mod deserializer;

pub use deserializer::{DEFAULT_MAX_DEPTH, Deserializer, deserialize};
pub use lorikeet_model::{Document, FormatTag, Part};
