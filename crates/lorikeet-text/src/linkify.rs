//! Splitting plain text into link and non-link tokens.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bare URL runs inside otherwise plain text.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"']+"#).expect("URL pattern compiles")
});

/// Punctuation that ends a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[u8] = b".,;:!?)";

/// One token of a linkified text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextToken {
    /// A non-link literal substring.
    Plain(String),
    /// A literal substring detected as a link.
    Link(String),
}

impl TextToken {
    /// The literal substring this token covers.
    #[must_use]
    pub fn literal(&self) -> &str {
        match self {
            Self::Plain(s) | Self::Link(s) => s,
        }
    }
}

/// Splits a string into an ordered token sequence covering the whole input.
///
/// Invariant: concatenating the tokens' literals reproduces the input
/// exactly; there are no gaps and no overlaps.
pub trait Linkifier {
    /// Tokenize `text` into plain and link runs, in document order.
    fn tokenize(&self, text: &str) -> Vec<TextToken>;
}

/// Default regex-based linkifier.
///
/// Detects `http://`, `https://` and `www.` runs. Trailing sentence
/// punctuation is left outside the link, so "see https://example.org."
/// links `https://example.org` and keeps the full stop as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlLinkifier;

impl Linkifier for UrlLinkifier {
    fn tokenize(&self, text: &str) -> Vec<TextToken> {
        let mut tokens = Vec::new();
        let mut cursor = 0;
        for found in URL_PATTERN.find_iter(text) {
            let mut end = found.end();
            while end > found.start() && TRAILING_PUNCTUATION.contains(&text.as_bytes()[end - 1])
            {
                end -= 1;
            }
            if found.start() > cursor {
                tokens.push(TextToken::Plain(text[cursor..found.start()].to_owned()));
            }
            tokens.push(TextToken::Link(text[found.start()..end].to_owned()));
            cursor = end;
        }
        if cursor < text.len() {
            tokens.push(TextToken::Plain(text[cursor..].to_owned()));
        }
        tokens
    }
}
