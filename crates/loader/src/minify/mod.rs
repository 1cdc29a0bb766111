// ABOUTME: Minification of serialized component markup before it is embedded as a string literal.
// ABOUTME: MinifyOptions mirrors the collapse/comment/CSS switches; minify_node serializes one subtree.

use std::collections::HashSet;

use ego_tree::NodeId;

use crate::dom::Document;
use crate::error::LoaderError;

pub mod css;
mod html;

/// Switches controlling how markup is minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinifyOptions {
    /// Collapse runs of whitespace in text and `class` values.
    pub collapse_whitespace: bool,
    /// Collapse to a single space instead of dropping whitespace-only text.
    pub conservative_collapse: bool,
    /// Minify `<style>` bodies and `style` attributes.
    pub minify_css: bool,
    /// Drop comments other than conditional and `<!--!` comments.
    pub remove_comments: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            conservative_collapse: true,
            minify_css: true,
            remove_comments: true,
        }
    }
}

impl MinifyOptions {
    /// Plain serialization with every minification step disabled.
    pub fn none() -> Self {
        Self {
            collapse_whitespace: false,
            conservative_collapse: false,
            minify_css: false,
            remove_comments: false,
        }
    }
}

/// Serialize node `id` (outer HTML) leaving out any node in `skip`, minifying as configured.
pub fn minify_node(
    doc: &Document,
    id: NodeId,
    skip: &HashSet<NodeId>,
    opts: MinifyOptions,
) -> Result<String, LoaderError> {
    let Some(node) = doc.node(id) else {
        return Ok(String::new());
    };
    let mut writer = html::Writer::new(opts, skip);
    writer.write_node(node, false)?;
    Ok(writer.finish())
}
