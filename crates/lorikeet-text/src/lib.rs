//! Plain-text link detection and mention recognition for Lorikeet.
//!
//! # Scope
//!
//! This crate provides the two text-level collaborators the deserializer
//! consumes:
//! - **Linkifier** - splits a text run into an ordered, gapless sequence of
//!   plain and link tokens
//! - **Mention Recognizer** - inspects an href and extracts a user
//!   identifier when the link follows the
//!   [matrix.to navigation](https://spec.matrix.org/v1.11/appendices/#matrixto-navigation)
//!   convention
//!
//! Both are traits so callers can inject their own detection rules; the
//! default implementations are regex-based.

/// Plain-text link detection.
pub mod linkify;
/// Mention-link recognition.
pub mod mentions;

pub use linkify::{Linkifier, TextToken, UrlLinkifier};
pub use mentions::{Mention, MentionRecognizer, PermalinkRecognizer};
