//! HTML to plain text for section bodies.
//!
//! Block elements become line breaks, links keep their target in parentheses, and
//! whitespace is squashed while paragraph breaks survive as a single blank line.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Elements dropped with everything inside them.
const DROPPED: &[&str] = &["script", "style", "nav", "noscript", "template"];

/// Elements whose start and end mark a line break in the extracted text.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "details", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "li", "main", "ol", "p", "pre", "section", "summary", "table", "tbody",
    "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Convert raw section markup to clean text. Never fails; empty input gives empty output.
pub fn clean(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(raw);
    let mut text = String::with_capacity(raw.len());
    push_text(fragment.root_element(), &mut text);
    normalize_whitespace(&text)
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_inline(text, out),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    push_element(child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// Text-node whitespace, source newlines included, is never a line break.
fn push_inline(text: &str, out: &mut String) {
    out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
}

fn push_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if DROPPED.contains(&name) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }
    if name == "a" {
        push_text(element, out);
        if let Some(href) = element.value().attr("href").map(str::trim) {
            if !href.is_empty() {
                out.push_str(" (");
                out.push_str(href);
                out.push(')');
            }
        }
        return;
    }
    let block = BLOCKS.contains(&name);
    if block {
        out.push('\n');
    }
    push_text(element, out);
    if block {
        out.push('\n');
    }
}

/// Squash horizontal whitespace to one space, trim each line, cap blank lines at one, trim the result.
fn normalize_whitespace(s: &str) -> String {
    let mut joined = String::with_capacity(s.len());
    for (i, line) in s.split('\n').enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.push_str(&squash_line(line));
    }

    let mut out = String::with_capacity(joined.len());
    let mut newlines = 0usize;
    for c in joined.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out.trim().to_string()
}

fn squash_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;
    for c in line.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}
