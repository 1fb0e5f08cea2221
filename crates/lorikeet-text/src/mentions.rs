//! Recognizing hyperlinks that mention a specific user.

use once_cell::sync::Lazy;
use regex::Regex;

/// User permalinks per
/// [matrix.to navigation](https://spec.matrix.org/v1.11/appendices/#matrixto-navigation).
///
/// The `@` sigil may arrive percent-encoded as `%40`. Room, alias and event
/// permalinks carry other sigils and deliberately do not match.
static USER_PERMALINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://matrix\.to/#/(?:@|%40)([^/?#:]+:[^/?#]+?)(?:\?.*)?$")
        .expect("permalink pattern compiles")
});

/// A recognized user mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// The mentioned user's identifier, e.g. `@alice:example.org`.
    pub user_id: String,
}

/// Inspects an href and extracts a user identifier if the link follows the
/// recognized mention-link convention.
pub trait MentionRecognizer {
    /// Recognize `href` as a user mention, if it is one.
    fn recognize(&self, href: &str) -> Option<Mention>;
}

/// Default recognizer for matrix.to user permalinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermalinkRecognizer;

impl MentionRecognizer for PermalinkRecognizer {
    fn recognize(&self, href: &str) -> Option<Mention> {
        USER_PERMALINK.captures(href).map(|caps| Mention {
            user_id: format!("@{}", &caps[1]),
        })
    }
}
