//! HTML markup for rendered decorations
//!
//! Each tagged span becomes a `<span class="deco-{kind}">`, nested exactly as
//! the decoration tree nests. Payloads travel in a `data-payload` attribute
//! so a web view can attach behavior (e.g. open a link target) without
//! re-matching the text.

use crate::decorations::{DecorationTag, Rendered, Segment};

/// CSS class prefix for decoration spans.
pub const CLASS_PREFIX: &str = "deco-";

/// Base styles for the built-in markdown decoration kinds.
const BASE_CSS: &str = r#"
.deco-heading { font-weight: 600; color: rgb(0, 100, 180); }
.deco-bold { font-weight: 700; }
.deco-italic { font-style: italic; }
.deco-strikethrough { text-decoration: line-through; }
.deco-code { font-family: monospace; background-color: rgb(233, 236, 239); }
.deco-link, .deco-reference { color: rgb(0, 100, 180); text-decoration: underline; cursor: pointer; }
.deco-image { color: rgb(120, 120, 120); }
pre.decorated { white-space: pre-wrap; }
"#;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Convert rendered output to an HTML fragment.
///
/// Text is escaped; whitespace is kept verbatim, so the fragment is meant to
/// sit inside a `pre` or `white-space: pre-wrap` container.
pub fn to_html(rendered: &Rendered<'_, DecorationTag>) -> String {
    let mut out = String::new();
    write_segments(&rendered.segments, &mut out);
    out
}

/// Generate a complete standalone HTML document around the rendered buffer.
pub fn generate_html_document(rendered: &Rendered<'_, DecorationTag>, title: Option<&str>) -> String {
    let doc_title = title.unwrap_or("Decorated Document");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="generator" content="Ferrite">
    <title>{title}</title>
    <style>
{base_css}
    </style>
</head>
<body>
<pre class="decorated">{body}</pre>
</body>
</html>"#,
        title = html_escape(doc_title),
        base_css = BASE_CSS,
        body = to_html(rendered),
    )
}

fn write_segments(segments: &[Segment<'_, DecorationTag>], out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(&html_escape(text)),
            Segment::Span(span) => {
                out.push_str("<span class=\"");
                out.push_str(CLASS_PREFIX);
                out.push_str(&class_name(&span.tag.kind));
                out.push('"');
                if let Some(payload) = &span.tag.payload {
                    out.push_str(" data-payload=\"");
                    out.push_str(&html_escape(payload));
                    out.push('"');
                }
                out.push('>');
                write_segments(&span.children, out);
                out.push_str("</span>");
            }
        }
    }
}

/// Reduce a tag kind to characters safe in a CSS class name.
fn class_name(kind: &str) -> String {
    kind.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
