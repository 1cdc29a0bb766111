// ABOUTME: Document partitioner: classifies top-level nodes into links, template modules, scripts and other nodes.
// ABOUTME: Scripts inside <dom-module> are harvested into the scripts bucket and recorded as extracted.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::node::Element;

use crate::dom::Document;
use crate::paths::is_external_path;

/// What a single element turns into in the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `<link>` with a bundler-resolvable href.
    Link,
    /// `<script>` without a `src`; its body is emitted inline.
    ScriptInline,
    /// `<script>` whose `src` is a bundler-resolvable file.
    ScriptFile,
    /// `<dom-module>` template definition.
    TemplateModule,
    /// Anything re-materialized at runtime, including external links and scripts.
    Other,
}

/// Classify an element by tag name and its `href`/`src`.
pub fn classify(el: &Element) -> Classification {
    match el.name() {
        "dom-module" => Classification::TemplateModule,
        "link" => {
            if is_external_path(el.attr("href").unwrap_or("")) {
                Classification::Other
            } else {
                Classification::Link
            }
        }
        "script" => match el.attr("src").unwrap_or("") {
            "" => Classification::ScriptInline,
            src if is_external_path(src) => Classification::Other,
            _ => Classification::ScriptFile,
        },
        _ => Classification::Other,
    }
}

/// Ordered buckets produced by one pass over the top-level nodes.
///
/// Every tagged top-level node appears in exactly one of `links`,
/// `template_modules`, `scripts` or `other_nodes`; within a bucket the order
/// is traversal order. `scripts` may also contain direct children of a
/// template module, which are listed in `extracted`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition {
    pub links: Vec<NodeId>,
    pub template_modules: Vec<NodeId>,
    pub scripts: Vec<NodeId>,
    pub other_nodes: Vec<NodeId>,
    extracted: HashSet<NodeId>,
}

impl Partition {
    /// Partition the top-level nodes of `doc`.
    pub fn build(doc: &Document) -> Self {
        let mut p = Partition::default();

        for &id in doc.top_level() {
            // Text, comments and doctypes are dropped.
            let Some(el) = doc.element(id) else {
                continue;
            };
            let class = classify(el);
            tracing::trace!(tag = el.name(), ?class, "classified top-level node");

            match class {
                Classification::Link => p.links.push(id),
                Classification::ScriptInline | Classification::ScriptFile => p.scripts.push(id),
                Classification::TemplateModule => {
                    p.harvest_module_scripts(doc, id);
                    p.template_modules.push(id);
                }
                Classification::Other => p.other_nodes.push(id),
            }
        }

        // Top-level scripts are excluded from serialization as well as module ones.
        p.extracted.extend(p.scripts.iter().copied());
        p
    }

    fn harvest_module_scripts(&mut self, doc: &Document, module: NodeId) {
        let Some(node) = doc.node(module) else {
            return;
        };
        for child in node.children() {
            let Some(el) = child.value().as_element() else {
                continue;
            };
            if el.name() != "script" {
                continue;
            }
            match classify(el) {
                Classification::ScriptInline | Classification::ScriptFile => {
                    self.scripts.push(child.id())
                }
                _ => {}
            }
        }
    }

    /// Nodes that moved into `scripts` and must not be serialized with their parent.
    pub fn extracted(&self) -> &HashSet<NodeId> {
        &self.extracted
    }

    /// True when the preamble importing the registration helper is needed.
    pub fn needs_register_helper(&self) -> bool {
        !self.template_modules.is_empty() || !self.other_nodes.is_empty()
    }

    /// Total number of classified nodes.
    pub fn len(&self) -> usize {
        self.links.len() + self.template_modules.len() + self.scripts.len() + self.other_nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
