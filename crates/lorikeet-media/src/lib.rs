//! Trusted media repository resolution for Lorikeet.
//!
//! Inline images in a received fragment may only come from the homeserver's
//! media repository, addressed by
//! [`mxc://` URIs](https://spec.matrix.org/v1.11/client-server-api/#matrix-content-mxc-uris).
//! Anything else - `http(s)` hotlinks, `data:` blobs, `javascript:` and
//! friends - must never reach a renderer, so resolution of a raw `src`
//! string is the gate: resolvable means displayable.

use thiserror::Error;
use url::Url;

/// Resolves a raw image `src` to a displayable URL.
///
/// Returns `None` for anything outside the trusted media scheme/namespace;
/// the caller then degrades the image away rather than rendering it.
pub trait MediaResolver {
    /// Resolve `src`, or reject it.
    fn resolve(&self, src: &str) -> Option<Url>;
}

/// The media repository base URL was not a valid URL.
#[derive(Debug, Error)]
#[error("invalid media repository base URL: {0}")]
pub struct InvalidBaseUrl(#[from] url::ParseError);

/// A homeserver media repository.
///
/// Maps `mxc://<server-name>/<media-id>` onto the repository's HTTP
/// download endpoint
/// ([§ GET /_matrix/media/v3/download](https://spec.matrix.org/v1.11/client-server-api/#get_matrixmediav3downloadservernamemediaid)).
#[derive(Debug, Clone)]
pub struct MediaRepository {
    base: Url,
}

impl MediaRepository {
    /// Create a repository rooted at `base`, e.g. `https://chat.example.org`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBaseUrl`] when `base` does not parse as a URL.
    pub fn new(base: &str) -> Result<Self, InvalidBaseUrl> {
        Ok(Self {
            base: Url::parse(base)?,
        })
    }
}

impl MediaResolver for MediaRepository {
    fn resolve(&self, src: &str) -> Option<Url> {
        let uri = Url::parse(src).ok()?;
        if uri.scheme() != "mxc" {
            return None;
        }
        let server = uri.host_str()?;
        // Exactly one non-empty path segment: the media ID.
        let media_id = uri.path().strip_prefix('/')?;
        if media_id.is_empty() || media_id.contains('/') {
            return None;
        }
        self.base
            .join(&format!("_matrix/media/v3/download/{server}/{media_id}"))
            .ok()
    }
}
