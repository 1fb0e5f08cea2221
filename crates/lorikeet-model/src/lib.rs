//! Structured message document model for the Lorikeet deserializer.
//!
//! This crate defines the typed part hierarchy produced when an untrusted
//! HTML fragment (a Matrix `formatted_body`, see
//! [§ m.room.message msgtypes](https://spec.matrix.org/v1.11/client-server-api/#mroommessage-msgtypes))
//! is deserialized into something a renderer can display safely.
//!
//! # Design
//!
//! Parts form a closed tagged union rather than an open class hierarchy, so
//! the allow-list dispatch over them is an exhaustive `match` the compiler
//! can verify. All parts are immutable value objects compared by structural
//! (deep) equality; there are no identity semantics and no mutation after
//! construction.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The fixed allow-list of generic formatting wrappers.
///
/// These are the only tags a [`Part::Format`] may carry. Everything outside
/// this set either maps to a dedicated [`Part`] variant (headings, lists,
/// links, ...) or is stripped entirely, with its content preserved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    /// Emphasis (`<em>`).
    Em,
    /// Strong emphasis (`<strong>`).
    Strong,
    /// Inline code (`<code>`).
    Code,
    /// Strikethrough (`<del>`).
    Del,
    /// Generic inline wrapper (`<span>`).
    Span,
    /// Paragraph (`<p>`).
    P,
    /// Generic block wrapper (`<div>`).
    Div,
    /// Block quotation (`<blockquote>`).
    Blockquote,
}

impl FormatTag {
    /// Whether this wrapper belongs to the basic-inline set.
    ///
    /// Inline wrappers are producible in both traversal contexts; the
    /// remaining wrappers are block-level and only reachable from block
    /// context.
    #[must_use]
    pub const fn is_inline(self) -> bool {
        matches!(
            self,
            Self::Em | Self::Strong | Self::Code | Self::Del | Self::Span
        )
    }
}

/// One node of the structured output document.
///
/// A part is either a leaf (text run, line break, rule, image, code block)
/// or carries an ordered sequence of child parts. The top-level sequence of
/// a [`Document`] may freely mix block-level and inline-level variants; no
/// artificial wrapping is imposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    /// A plain text run.
    Text(String),

    /// A generic allowed wrapper, e.g. emphasis or a paragraph.
    Format {
        /// Which wrapper this is.
        tag: FormatTag,
        /// Ordered child parts.
        children: Vec<Part>,
    },

    /// An explicit line break (`<br>`).
    NewLine,

    /// A horizontal divider (`<hr>`).
    Rule,

    /// A hyperlink.
    Link {
        /// Raw href exactly as carried by the fragment.
        href: String,
        /// Ordered child parts (the link text).
        children: Vec<Part>,
    },

    /// A hyperlink recognized as referring to a specific user.
    ///
    /// Pills come from
    /// [matrix.to navigation](https://spec.matrix.org/v1.11/appendices/#matrixto-navigation)
    /// permalinks and are rendered distinctly from generic links.
    Pill {
        /// The mentioned user's identifier, e.g. `@alice:example.org`.
        user_id: String,
        /// Raw href the pill was recognized from.
        href: String,
        /// Ordered child parts (the display text).
        children: Vec<Part>,
    },

    /// An inline image scoped to the trusted media repository.
    Image {
        /// Resolved, displayable URL (never the raw `src`).
        url: String,
        /// Best-effort width in pixels, absent when missing or unparsable.
        width: Option<u32>,
        /// Best-effort height in pixels, absent when missing or unparsable.
        height: Option<u32>,
        /// Raw `alt` attribute, if present.
        alt: Option<String>,
        /// Raw `title` attribute, if present.
        title: Option<String>,
    },

    /// A section heading.
    Header {
        /// Heading level, 1 through 6.
        level: u8,
        /// Ordered child parts (the heading text).
        children: Vec<Part>,
    },

    /// An ordered or unordered list.
    List {
        /// Starting index. Present only for ordered lists; `None` means
        /// unordered (or default rendering).
        start: Option<i64>,
        /// One entry per list item, each an ordered part sequence.
        items: Vec<Vec<Part>>,
    },

    /// A fenced code block.
    CodeBlock {
        /// Language label, possibly empty.
        language: String,
        /// Literal text content; nested markup is flattened, not interpreted.
        text: String,
    },
}

/// The deserialized form of one received HTML fragment.
///
/// The raw source string is retained verbatim alongside the structured
/// output purely for fallback/audit purposes; it is never re-derived from
/// the parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The original fragment, byte for byte.
    pub raw_html: String,
    /// Top-level part sequence in document order.
    pub parts: Vec<Part>,
}

impl Document {
    /// Wrap a raw fragment and its deserialized parts.
    #[must_use]
    pub fn new(raw_html: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            raw_html: raw_html.into(),
            parts,
        }
    }
}
