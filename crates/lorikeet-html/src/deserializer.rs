//! Walking a fragment tree into a part sequence.

use std::str::FromStr;

use lorikeet_dom::{FragmentTree, NodeId};
use lorikeet_media::MediaResolver;
use lorikeet_model::{Document, FormatTag, Part};
use lorikeet_text::{Linkifier, MentionRecognizer, PermalinkRecognizer, TextToken, UrlLinkifier};

/// Default bound on traversal depth.
///
/// Recursion depth tracks the input tree's nesting depth, which an attacker
/// controls, so it must be bounded. Subtrees below the cap contribute
/// nothing.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Attributes the deserializer is permitted to read, per tag.
///
/// This table is the whole attribute surface: every attribute not named
/// here is never consulted, and therefore never reaches the output. No
/// explicit stripping step exists or is needed.
const READABLE_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("A", &["href"]),
    ("IMG", &["src", "width", "height", "alt", "title"]),
    ("OL", &["start"]),
    ("CODE", &["class"]),
];

/// Traversal mode for one node sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Both block-level and inline-level parts may be produced. List items
    /// and generic block wrappers recurse in this context too.
    Block,
    /// Only inline-level parts may be produced; block-only elements lose
    /// their structural meaning and are unwrapped.
    Inline,
}

/// The per-element classification decision.
///
/// Keeping the fallback behavior a first-class value (instead of
/// early-return control flow) makes the degradation rules testable on
/// their own.
enum Step {
    /// The element maps to exactly this part.
    Produced(Part),
    /// The element itself produces nothing; recurse into its children
    /// under the current context and splice the results in place.
    Unwrap,
    /// The element produces nothing at all.
    Drop,
}

/// Converts untrusted HTML fragments into [`Document`] values.
///
/// One value can deserialize any number of fragments; there is no state
/// between calls, so concurrent use from multiple threads is safe.
pub struct Deserializer {
    linkifier: Box<dyn Linkifier>,
    mentions: Box<dyn MentionRecognizer>,
    max_depth: usize,
}

impl Default for Deserializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deserializer {
    /// A deserializer with the default collaborators: the regex URL
    /// linkifier, the matrix.to permalink recognizer, and
    /// [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            linkifier: Box::new(UrlLinkifier),
            mentions: Box::new(PermalinkRecognizer),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the plain-text linkifier.
    #[must_use]
    pub fn with_linkifier(mut self, linkifier: Box<dyn Linkifier>) -> Self {
        self.linkifier = linkifier;
        self
    }

    /// Replace the mention-link recognizer.
    #[must_use]
    pub fn with_mention_recognizer(mut self, mentions: Box<dyn MentionRecognizer>) -> Self {
        self.mentions = mentions;
        self
    }

    /// Replace the traversal depth bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Deserialize one raw fragment.
    ///
    /// Never fails: worst case the part sequence is empty or partial. The
    /// raw fragment is retained verbatim on the returned [`Document`].
    #[must_use]
    pub fn deserialize(&self, raw_html: &str, media: &dyn MediaResolver) -> Document {
        let tree = FragmentTree::parse(raw_html);
        let parts = self.walk(&tree, media, tree.roots(), Context::Block, 0);
        Document::new(raw_html, parts)
    }

    /// Classify every node of `nodes` under `context`, in document order.
    fn walk(
        &self,
        tree: &FragmentTree,
        media: &dyn MediaResolver,
        nodes: &[NodeId],
        context: Context,
        depth: usize,
    ) -> Vec<Part> {
        let mut parts = Vec::new();
        if depth > self.max_depth {
            return parts;
        }
        for &id in nodes {
            if let Some(text) = tree.as_text(id) {
                self.linkify_into(text, &mut parts);
            } else if tree.as_element(id).is_some() {
                match self.classify(tree, media, id, context, depth) {
                    Step::Produced(part) => parts.push(part),
                    Step::Unwrap => {
                        parts.extend(self.walk(tree, media, tree.children(id), context, depth + 1));
                    }
                    Step::Drop => {}
                }
            }
        }
        parts
    }

    /// Decide what one element contributes under `context`.
    fn classify(
        &self,
        tree: &FragmentTree,
        media: &dyn MediaResolver,
        id: NodeId,
        context: Context,
        depth: usize,
    ) -> Step {
        let Some(element) = tree.as_element(id) else {
            return Step::Drop;
        };
        let tag = element.tag_name.as_str();

        // Inline-eligible elements, recognized in both contexts.
        match tag {
            "A" => return self.classify_anchor(tree, media, id, depth),
            "BR" => return Step::Produced(Part::NewLine),
            _ => {}
        }
        if let Ok(format) = FormatTag::from_str(tag) {
            if format.is_inline() {
                let children = self.walk(tree, media, tree.children(id), Context::Inline, depth + 1);
                return Step::Produced(Part::Format {
                    tag: format,
                    children,
                });
            }
            // P, DIV, BLOCKQUOTE: block-only wrappers.
            if context == Context::Inline {
                return Step::Unwrap;
            }
            let child_context = if format == FormatTag::P {
                Context::Inline
            } else {
                Context::Block
            };
            let children = self.walk(tree, media, tree.children(id), child_context, depth + 1);
            return Step::Produced(Part::Format {
                tag: format,
                children,
            });
        }

        if context == Context::Inline {
            // A block-only or unknown tag where only inline is expected:
            // strip the wrapper, keep its inline-eligible descendants.
            return Step::Unwrap;
        }
        match tag {
            "H1" | "H2" | "H3" | "H4" | "H5" | "H6" => {
                let level = tag.as_bytes()[1] - b'0';
                let children = self.walk(tree, media, tree.children(id), Context::Inline, depth + 1);
                Step::Produced(Part::Header { level, children })
            }
            "OL" => self.classify_list(tree, media, id, true, depth),
            "UL" => self.classify_list(tree, media, id, false, depth),
            "PRE" => Self::classify_pre(tree, id),
            "HR" => Step::Produced(Part::Rule),
            "IMG" => Self::classify_image(tree, media, id),
            _ => Step::Unwrap,
        }
    }

    /// Anchors resolve through the mention recognizer: a recognized user
    /// permalink becomes a pill, anything else a generic link. An anchor
    /// with no `href` is treated as an unknown wrapper.
    fn classify_anchor(
        &self,
        tree: &FragmentTree,
        media: &dyn MediaResolver,
        id: NodeId,
        depth: usize,
    ) -> Step {
        let Some(href) = read_attr(tree, id, "A", "href").map(str::to_owned) else {
            return Step::Unwrap;
        };
        let children = self.walk(tree, media, tree.children(id), Context::Inline, depth + 1);
        match self.mentions.recognize(&href) {
            Some(mention) => Step::Produced(Part::Pill {
                user_id: mention.user_id,
                href,
                children,
            }),
            None => Step::Produced(Part::Link { href, children }),
        }
    }

    /// Lists keep only their direct `<li>` children; everything else at
    /// that level (stray text, other elements) is silently dropped. Item
    /// content is classified without an inline restriction, so nested
    /// lists and code blocks survive inside items.
    fn classify_list(
        &self,
        tree: &FragmentTree,
        media: &dyn MediaResolver,
        id: NodeId,
        ordered: bool,
        depth: usize,
    ) -> Step {
        // The starting index exists only on ordered lists; a `start`
        // attribute on <ul> is never read.
        let start = if ordered {
            Some(
                read_attr(tree, id, "OL", "start")
                    .and_then(parse_leading_int)
                    .unwrap_or(1),
            )
        } else {
            None
        };
        let mut items = Vec::new();
        for &child in tree.children(id) {
            if tree
                .as_element(child)
                .is_some_and(|data| data.tag_name == "LI")
            {
                items.push(self.walk(tree, media, tree.children(child), Context::Block, depth + 2));
            }
        }
        Step::Produced(Part::List { start, items })
    }

    /// A `<pre>` whose first child is a `<code>` element becomes a code
    /// block; its text is flattened, never interpreted. Any other `<pre>`
    /// unwraps, so the content degrades to ordinary extraction instead of
    /// vanishing.
    fn classify_pre(tree: &FragmentTree, id: NodeId) -> Step {
        let code = tree.children(id).first().copied().filter(|&child| {
            tree.as_element(child)
                .is_some_and(|data| data.tag_name == "CODE")
        });
        let Some(code) = code else {
            return Step::Unwrap;
        };
        let language = read_attr(tree, code, "CODE", "class")
            .map(code_language)
            .unwrap_or_default();
        Step::Produced(Part::CodeBlock {
            language,
            text: tree.text_content(code),
        })
    }

    /// Images are only representable when the media resolver accepts their
    /// `src`; otherwise the element unwraps and, having no children,
    /// disappears.
    fn classify_image(tree: &FragmentTree, media: &dyn MediaResolver, id: NodeId) -> Step {
        let resolved = read_attr(tree, id, "IMG", "src").and_then(|src| media.resolve(src));
        let Some(url) = resolved else {
            return Step::Unwrap;
        };
        let dimension = |name: &str| {
            read_attr(tree, id, "IMG", name)
                .and_then(parse_leading_int)
                .and_then(|value| u32::try_from(value).ok())
        };
        Step::Produced(Part::Image {
            url: String::from(url),
            width: dimension("width"),
            height: dimension("height"),
            alt: read_attr(tree, id, "IMG", "alt").map(str::to_owned),
            title: read_attr(tree, id, "IMG", "title").map(str::to_owned),
        })
    }

    /// Run a text node through the linkifier, appending one part per token.
    fn linkify_into(&self, text: &str, parts: &mut Vec<Part>) {
        for token in self.linkifier.tokenize(text) {
            match token {
                TextToken::Plain(literal) => parts.push(Part::Text(literal)),
                TextToken::Link(literal) => parts.push(Part::Link {
                    href: literal.clone(),
                    children: vec![Part::Text(literal)],
                }),
            }
        }
    }
}

/// Deserialize a raw fragment with the default collaborators.
#[must_use]
pub fn deserialize(raw_html: &str, media: &dyn MediaResolver) -> Document {
    Deserializer::new().deserialize(raw_html, media)
}

/// Read an attribute if and only if the allow-list table permits it for
/// this tag. All attribute access goes through here.
fn read_attr<'t>(tree: &'t FragmentTree, id: NodeId, tag: &str, name: &str) -> Option<&'t str> {
    let permitted = READABLE_ATTRIBUTES
        .iter()
        .any(|(table_tag, names)| *table_tag == tag && names.contains(&name));
    debug_assert!(permitted, "attribute {name} is not readable on {tag}");
    if permitted { tree.attr(id, name) } else { None }
}

/// Leading-digit integer parse.
///
/// Historical quirk, kept: a value like `"1A"` is accepted as 1. A value
/// with no leading digit is not a number.
fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Extract a language label from a `class` attribute value.
///
/// Scans the space-separated tokens for the first one of the form
/// `language-<label>`; tokens whose label begins with an underscore are
/// skipped. No match means the empty label.
fn code_language(class: &str) -> String {
    class
        .split(' ')
        .filter_map(|token| token.strip_prefix("language-"))
        .find(|label| !label.starts_with('_'))
        .map(str::to_owned)
        .unwrap_or_default()
}
