//! Integration tests for the fragment deserializer.

use lorikeet_html::{Deserializer, Document, FormatTag, Part, deserialize};
use lorikeet_media::MediaRepository;

/// Helper to deserialize against a repository rooted at chat.example.org.
fn parse(html: &str) -> Document {
    deserialize(html, &repo())
}

fn repo() -> MediaRepository {
    MediaRepository::new("https://chat.example.org").expect("valid base")
}

fn text(content: &str) -> Part {
    Part::Text(content.to_owned())
}

fn format(tag: FormatTag, children: Vec<Part>) -> Part {
    Part::Format { tag, children }
}

#[test]
fn plain_text_is_a_single_text_part() {
    let doc = parse("just plain text");
    assert_eq!(doc.parts, vec![text("just plain text")]);
}

#[test]
fn empty_input_yields_empty_parts() {
    let doc = parse("");
    assert_eq!(doc.parts, Vec::new());
    assert_eq!(doc.raw_html, "");
}

#[test]
fn inline_markup_interleaves_with_text() {
    let doc = parse("before <em>x</em> after");
    assert_eq!(
        doc.parts,
        vec![
            text("before "),
            format(FormatTag::Em, vec![text("x")]),
            text(" after"),
        ]
    );
}

#[test]
fn top_level_freely_mixes_block_and_inline() {
    let doc = parse("intro<h1>Title</h1>outro");
    assert_eq!(
        doc.parts,
        vec![
            text("intro"),
            Part::Header {
                level: 1,
                children: vec![text("Title")],
            },
            text("outro"),
        ]
    );
}

#[test]
fn ordered_list_defaults_to_start_one() {
    let doc = parse("<ol><li>Lorem</li><li>Ipsum</li></ol>");
    assert_eq!(
        doc.parts,
        vec![Part::List {
            start: Some(1),
            items: vec![vec![text("Lorem")], vec![text("Ipsum")]],
        }]
    );
}

#[test]
fn ordered_list_reads_start_attribute() {
    let doc = parse(r#"<ol start="3"><li>Lorem</li></ol>"#);
    assert_eq!(
        doc.parts,
        vec![Part::List {
            start: Some(3),
            items: vec![vec![text("Lorem")]],
        }]
    );
}

#[test]
fn ordered_list_start_keeps_leading_digit_quirk() {
    let doc = parse(r#"<ol start="1A"><li>x</li></ol>"#);
    assert_eq!(
        doc.parts,
        vec![Part::List {
            start: Some(1),
            items: vec![vec![text("x")]],
        }]
    );

    let doc = parse(r#"<ol start="nope"><li>x</li></ol>"#);
    assert_eq!(
        doc.parts,
        vec![Part::List {
            start: Some(1),
            items: vec![vec![text("x")]],
        }]
    );
}

#[test]
fn unordered_list_never_carries_a_start() {
    let doc = parse(r#"<ul start="5"><li>x</li></ul>"#);
    assert_eq!(
        doc.parts,
        vec![Part::List {
            start: None,
            items: vec![vec![text("x")]],
        }]
    );
}

#[test]
fn list_keeps_only_list_item_children() {
    let doc = parse("<ul>stray<li>a</li><span>skip</span><li>b</li></ul>");
    assert_eq!(
        doc.parts,
        vec![Part::List {
            start: None,
            items: vec![vec![text("a")], vec![text("b")]],
        }]
    );
}

#[test]
fn list_items_allow_block_content() {
    let doc = parse("<ol><li>one<ul><li>sub</li></ul></li></ol>");
    assert_eq!(
        doc.parts,
        vec![Part::List {
            start: Some(1),
            items: vec![vec![
                text("one"),
                Part::List {
                    start: None,
                    items: vec![vec![text("sub")]],
                },
            ]],
        }]
    );
}

#[test]
fn list_item_outside_a_list_unwraps() {
    let doc = parse("<li>loose</li>");
    assert_eq!(doc.parts, vec![text("loose")]);
}

#[test]
fn auto_closed_paragraphs_become_siblings() {
    let doc = parse("<p>hello<p>world</p></p>");
    assert_eq!(
        doc.parts,
        vec![
            format(FormatTag::P, vec![text("hello")]),
            format(FormatTag::P, vec![text("world")]),
        ]
    );
}

#[test]
fn block_inside_inline_degrades_to_inline_content() {
    let doc = parse("<span><p><code>Hello</code></p></span>");
    assert_eq!(
        doc.parts,
        vec![format(
            FormatTag::Span,
            vec![format(FormatTag::Code, vec![text("Hello")])],
        )]
    );
}

#[test]
fn heading_inside_inline_loses_structure() {
    let doc = parse("<span><h1>X</h1></span>");
    assert_eq!(doc.parts, vec![format(FormatTag::Span, vec![text("X")])]);
}

#[test]
fn unknown_tags_are_transparent() {
    let doc = parse("<span><dfn><code>Hello</code></dfn><footer><em>World</em></footer></span>");
    assert_eq!(
        doc.parts,
        vec![format(
            FormatTag::Span,
            vec![
                format(FormatTag::Code, vec![text("Hello")]),
                format(FormatTag::Em, vec![text("World")]),
            ],
        )]
    );
}

#[test]
fn disallowed_attributes_never_reach_the_output() {
    let doc = parse(r#"<em onmouseover="window.location='https://evil.example'">Hello</em>"#);
    assert_eq!(doc.parts, vec![format(FormatTag::Em, vec![text("Hello")])]);
}

#[test]
fn line_break_emits_newline() {
    let doc = parse("a<br>b");
    assert_eq!(doc.parts, vec![text("a"), Part::NewLine, text("b")]);
}

#[test]
fn horizontal_rule_emits_rule() {
    let doc = parse("<hr>");
    assert_eq!(doc.parts, vec![Part::Rule]);
}

#[test]
fn blockquote_children_stay_block_level() {
    let doc = parse("<blockquote><p>quoted</p></blockquote>");
    assert_eq!(
        doc.parts,
        vec![format(
            FormatTag::Blockquote,
            vec![format(FormatTag::P, vec![text("quoted")])],
        )]
    );
}

#[test]
fn fenced_code_with_language_label() {
    let doc = parse(r#"<pre><code class="language-rust">let x = 1;</code></pre>"#);
    assert_eq!(
        doc.parts,
        vec![Part::CodeBlock {
            language: "rust".to_owned(),
            text: "let x = 1;".to_owned(),
        }]
    );
}

#[test]
fn code_language_skips_underscore_tokens() {
    let doc = parse(r#"<pre><code class="language-_meta language-go">x</code></pre>"#);
    assert_eq!(
        doc.parts,
        vec![Part::CodeBlock {
            language: "go".to_owned(),
            text: "x".to_owned(),
        }]
    );
}

#[test]
fn code_without_language_has_empty_label() {
    let doc = parse("<pre><code>raw()</code></pre>");
    assert_eq!(
        doc.parts,
        vec![Part::CodeBlock {
            language: String::new(),
            text: "raw()".to_owned(),
        }]
    );
}

#[test]
fn code_block_flattens_nested_markup() {
    let doc = parse("<pre><code>a<b>c</b>d</code></pre>");
    assert_eq!(
        doc.parts,
        vec![Part::CodeBlock {
            language: String::new(),
            text: "acd".to_owned(),
        }]
    );
}

#[test]
fn pre_without_immediate_code_child_unwraps() {
    let doc = parse("<pre>plain <em>x</em></pre>");
    assert_eq!(
        doc.parts,
        vec![text("plain "), format(FormatTag::Em, vec![text("x")])]
    );
}

#[test]
fn repository_image_resolves_with_metadata() {
    let doc = parse(
        r#"<img src="mxc://example.org/abc123" width="100" height="50" alt="a cat" title="Cat">"#,
    );
    assert_eq!(
        doc.parts,
        vec![Part::Image {
            url: "https://chat.example.org/_matrix/media/v3/download/example.org/abc123"
                .to_owned(),
            width: Some(100),
            height: Some(50),
            alt: Some("a cat".to_owned()),
            title: Some("Cat".to_owned()),
        }]
    );
}

#[test]
fn image_dimensions_are_best_effort() {
    let doc = parse(r#"<img src="mxc://example.org/abc" width="120px" height="tall">"#);
    assert_eq!(
        doc.parts,
        vec![Part::Image {
            url: "https://chat.example.org/_matrix/media/v3/download/example.org/abc".to_owned(),
            width: Some(120),
            height: None,
            alt: None,
            title: None,
        }]
    );
}

#[test]
fn unscoped_images_disappear() {
    assert_eq!(parse(r#"<img src="https://evil.example/c.png">"#).parts, Vec::new());
    assert_eq!(parse(r#"<img src="javascript:alert(1)">"#).parts, Vec::new());
    assert_eq!(parse("<img>").parts, Vec::new());
}

#[test]
fn anchor_becomes_link() {
    let doc = parse(r#"<a href="https://example.org">site</a>"#);
    assert_eq!(
        doc.parts,
        vec![Part::Link {
            href: "https://example.org".to_owned(),
            children: vec![text("site")],
        }]
    );
}

#[test]
fn user_permalink_becomes_pill() {
    let doc = parse(r#"<a href="https://matrix.to/#/@alice:example.org">Alice</a>"#);
    assert_eq!(
        doc.parts,
        vec![Part::Pill {
            user_id: "@alice:example.org".to_owned(),
            href: "https://matrix.to/#/@alice:example.org".to_owned(),
            children: vec![text("Alice")],
        }]
    );
}

#[test]
fn anchor_without_href_unwraps() {
    let doc = parse("<a>naked</a>");
    assert_eq!(doc.parts, vec![text("naked")]);
}

#[test]
fn bare_urls_in_text_become_links() {
    let doc = parse("see https://example.org now");
    assert_eq!(
        doc.parts,
        vec![
            text("see "),
            Part::Link {
                href: "https://example.org".to_owned(),
                children: vec![text("https://example.org")],
            },
            text(" now"),
        ]
    );
}

#[test]
fn raw_source_is_kept_verbatim() {
    let input = r#"<p>broken<script>alert(1)</script><p>more"#;
    let doc = parse(input);
    assert_eq!(doc.raw_html, input);
}

#[test]
fn deserialization_is_idempotent() {
    let input = "<span><p><code>Hello</code></p></span><ol start=\"2\"><li>x</li></ol>";
    let repo = repo();
    let first = deserialize(input, &repo);
    let second = deserialize(input, &repo);
    assert_eq!(first, second);
}

#[test]
fn depth_cap_truncates_deep_nesting() {
    let deep = "<div><div><div>deep</div></div></div>";
    let doc = Deserializer::new()
        .with_max_depth(2)
        .deserialize(deep, &repo());
    assert_eq!(
        doc.parts,
        vec![format(
            FormatTag::Div,
            vec![format(FormatTag::Div, vec![format(FormatTag::Div, Vec::new())])],
        )]
    );
}
