// ABOUTME: Parsed component document backed by scraper's arena tree.
// ABOUTME: Elides parser-injected html/head/body wrappers so fragment inputs expose their real top-level nodes.

use ego_tree::{NodeId, NodeRef};
use scraper::node::Element;
use scraper::{Html, Node};

/// Elements whose content the tokenizer reads as text, not markup.
const RAW_TEXT_TAGS: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes", "noscript",
];

/// Which document wrappers appear as real start tags in the source text.
#[derive(Debug, Default, Clone, Copy)]
struct LiteralRoots {
    html: bool,
    head: bool,
    body: bool,
}

impl LiteralRoots {
    /// Walk the start tags of `source`, skipping comments, declarations,
    /// quoted attribute values and raw-text element bodies.
    fn scan(source: &str) -> Self {
        let mut roots = Self::default();
        // ASCII lowercasing keeps byte offsets, so every index below stays on a char boundary.
        let src = source.to_ascii_lowercase();
        let bytes = src.as_bytes();
        let mut pos = 0;

        while let Some(found) = src[pos..].find('<') {
            let start = pos + found + 1;
            let rest = &src[start..];
            if rest.starts_with("!--") {
                pos = skip_past(&src, start + 3, "-->");
                continue;
            }
            if rest.starts_with(&['!', '?', '/'][..]) {
                pos = skip_past(&src, start, ">");
                continue;
            }
            if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
                pos = start;
                continue;
            }

            let name_len = rest
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
                .count();
            let name = &rest[..name_len];
            match name {
                "html" => roots.html = true,
                "head" => roots.head = true,
                "body" => roots.body = true,
                _ => {}
            }

            pos = end_of_tag(bytes, start + name_len);
            if RAW_TEXT_TAGS.contains(&name) {
                let close = format!("</{}", name);
                pos = src[pos..].find(&close).map_or(src.len(), |off| pos + off);
            }
        }
        roots
    }

    fn is_synthetic(&self, tag: &str) -> bool {
        match tag {
            "html" => !self.html,
            "head" => !self.head,
            "body" => !self.body,
            _ => false,
        }
    }
}

/// Index just past the next `pat` at or after `from`, or the end of `src`.
fn skip_past(src: &str, from: usize, pat: &str) -> usize {
    src[from..]
        .find(pat)
        .map_or(src.len(), |off| from + off + pat.len())
}

/// Index just past the `>` closing a start tag, stepping over quoted values.
fn end_of_tag(bytes: &[u8], mut i: usize) -> usize {
    let mut after_eq = false;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return i + 1,
            quote @ (b'"' | b'\'') if after_eq => {
                i = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == quote)
                    .map_or(bytes.len(), |off| i + 1 + off + 1);
                after_eq = false;
                continue;
            }
            b'=' => after_eq = true,
            b if b.is_ascii_whitespace() => {}
            _ => after_eq = false,
        }
        i += 1;
    }
    bytes.len()
}

/// An HTML document plus its normalized top-level node list.
pub struct Document {
    html: Html,
    top_level: Vec<NodeId>,
}

impl Document {
    /// Parse `source` and compute its top-level nodes.
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        if !html.errors.is_empty() {
            tracing::trace!(errors = html.errors.len(), "tolerated html parse errors");
        }

        let literal = LiteralRoots::scan(source);
        let mut top_level = Vec::new();
        collect_top_level(html.tree.root(), literal, &mut top_level);

        Self { html, top_level }
    }

    /// Top-level nodes in document order, synthetic wrappers removed.
    pub fn top_level(&self) -> &[NodeId] {
        &self.top_level
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    /// The element stored at `id`, if that node is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(|n| n.value().as_element())
    }

    /// Value of attribute `name` on element `id`; missing attributes read as "".
    pub fn attr(&self, id: NodeId, name: &str) -> &str {
        self.element(id).and_then(|el| el.attr(name)).unwrap_or("")
    }

    /// Concatenated text of the direct text children of `id`.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.node(id) {
            for child in node.children() {
                if let Node::Text(t) = child.value() {
                    out.push_str(t);
                }
            }
        }
        out
    }
}

fn collect_top_level(node: NodeRef<'_, Node>, literal: LiteralRoots, out: &mut Vec<NodeId>) {
    for child in node.children() {
        match child.value() {
            Node::Element(el) if literal.is_synthetic(el.name()) => {
                collect_top_level(child, literal, out)
            }
            _ => out.push(child.id()),
        }
    }
}
