// ABOUTME: HTML serializer that minifies while it writes: whitespace collapse, comment removal, CSS minification.
// ABOUTME: Honors a skip set so extracted nodes never reappear in their parent's markup.

use std::collections::HashSet;

use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Element;
use scraper::Node;

use super::css;
use super::MinifyOptions;
use crate::error::LoaderError;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\n\r\x0C]+").unwrap());

pub(super) struct Writer<'a> {
    opts: MinifyOptions,
    skip: &'a HashSet<NodeId>,
    out: String,
}

impl<'a> Writer<'a> {
    pub(super) fn new(opts: MinifyOptions, skip: &'a HashSet<NodeId>) -> Self {
        Self {
            opts,
            skip,
            out: String::new(),
        }
    }

    pub(super) fn finish(self) -> String {
        self.out
    }

    pub(super) fn write_node(
        &mut self,
        node: NodeRef<'_, Node>,
        preserve_ws: bool,
    ) -> Result<(), LoaderError> {
        if self.skip.contains(&node.id()) {
            return Ok(());
        }
        match node.value() {
            Node::Element(el) => self.write_element(node, el, preserve_ws)?,
            Node::Text(t) => self.write_text(t, preserve_ws),
            Node::Comment(c) => {
                if !self.opts.remove_comments || is_retained_comment(c) {
                    self.out.push_str("<!--");
                    self.out.push_str(c);
                    self.out.push_str("-->");
                }
            }
            // <template> contents live in a fragment hung under the element.
            Node::Fragment => {
                for child in node.children() {
                    self.write_node(child, preserve_ws)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn write_element(
        &mut self,
        node: NodeRef<'_, Node>,
        el: &Element,
        preserve_ws: bool,
    ) -> Result<(), LoaderError> {
        let name = el.name();
        self.out.push('<');
        self.out.push_str(name);

        for (k, v) in el.attrs() {
            let value = match k {
                "style" if self.opts.minify_css && !has_binding(v) => {
                    css::minify_declarations(v)?
                }
                "class" if self.opts.collapse_whitespace => {
                    WHITESPACE_RE.replace_all(v.trim(), " ").into_owned()
                }
                _ => v.to_string(),
            };
            self.out.push(' ');
            self.out.push_str(k);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attr(&value));
            self.out.push('"');
        }
        self.out.push('>');

        if is_void_element(name) {
            return Ok(());
        }

        if is_raw_text_element(name) {
            let mut raw = String::new();
            for child in node.children() {
                if self.skip.contains(&child.id()) {
                    continue;
                }
                if let Node::Text(t) = child.value() {
                    raw.push_str(t);
                }
            }
            if name == "style" && self.opts.minify_css {
                self.out.push_str(&css::minify_stylesheet(&raw)?);
            } else {
                self.out.push_str(&raw);
            }
        } else {
            let preserve = preserve_ws || matches!(name, "pre" | "textarea");
            for child in node.children() {
                self.write_node(child, preserve)?;
            }
        }

        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        Ok(())
    }

    fn write_text(&mut self, text: &str, preserve_ws: bool) {
        if preserve_ws || !self.opts.collapse_whitespace {
            self.out.push_str(&escape_text(text));
            return;
        }
        if !self.opts.conservative_collapse && text.trim().is_empty() {
            return;
        }
        let collapsed = WHITESPACE_RE.replace_all(text, " ");
        // Adjacent text nodes (left by removed comments or skipped nodes) share one space.
        let text: &str = &collapsed;
        let text = if self.out.ends_with(' ') {
            text.strip_prefix(' ').unwrap_or(text)
        } else {
            text
        };
        self.out.push_str(&escape_text(text));
    }
}

/// Data-binding annotations (`{{expr}}`, `[[expr]]`) are resolved at runtime, not CSS.
fn has_binding(value: &str) -> bool {
    value.contains("{{") || value.contains("[[")
}

/// Conditional comments and `<!--! ... -->` survive comment removal.
fn is_retained_comment(comment: &str) -> bool {
    comment.starts_with('!') || comment.starts_with("[if ") || comment.starts_with("<![endif]")
}

/// Escape text content
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape attribute value
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
}

/// Check if tag is void element
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose text children are written without escaping.
fn is_raw_text_element(tag: &str) -> bool {
    matches!(
        tag,
        "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext" | "noscript"
    )
}
