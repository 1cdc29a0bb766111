// ABOUTME: Source synthesizer: turns partition buckets into the generated module body.
// ABOUTME: Emits link imports, the helper preamble, register/toBody calls and script imports or bodies, in that order.

use ego_tree::NodeId;

use crate::dom::Document;
use crate::error::LoaderError;
use crate::minify::{minify_node, MinifyOptions};
use crate::partition::Partition;
use crate::paths::{relative_specifier, LinkRules};
use crate::result::{Result, Transformed};

/// Identifier the generated code binds the registration helper to.
const HELPER_BINDING: &str = "RegisterHtmlTemplate";

/// Entry point of the registration helper invoked for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterCall {
    /// Define a reusable template.
    Register,
    /// Insert markup into the document body.
    ToBody,
}

impl RegisterCall {
    fn method(self) -> &'static str {
        match self {
            RegisterCall::Register => "register",
            RegisterCall::ToBody => "toBody",
        }
    }
}

/// Accumulates generated source and the number of lines it adds.
#[derive(Debug, Default)]
struct Chunk {
    source: String,
    line_count: usize,
    import_count: usize,
}

impl Chunk {
    fn import(&mut self, specifier: &str) {
        self.source.push_str(&format!("\nimport '{}';\n", specifier));
        self.line_count += 2;
        self.import_count += 1;
    }

    fn append(&mut self, other: Chunk) {
        self.source.push_str(&other.source);
        self.line_count += other.line_count;
        self.import_count += other.import_count;
    }
}

/// Everything the synthesizer needs besides the buckets.
pub struct Synthesizer<'a> {
    pub doc: &'a Document,
    pub rules: &'a LinkRules,
    pub register_helper: &'a str,
    pub minify: MinifyOptions,
}

impl Synthesizer<'_> {
    /// Build the module body for `partition`.
    pub fn synthesize(&self, partition: &Partition) -> Result<Transformed> {
        let mut out = self.links(&partition.links);
        out.append(self.preamble(partition));
        out.append(self.registrations(
            &partition.template_modules,
            RegisterCall::Register,
            partition,
        )?);
        out.append(self.registrations(&partition.other_nodes, RegisterCall::ToBody, partition)?);
        out.append(self.scripts(&partition.scripts));

        Ok(Transformed {
            source: out.source,
            source_map: String::new(),
            line_count: out.line_count,
            import_count: out.import_count,
        })
    }

    fn links(&self, links: &[NodeId]) -> Chunk {
        let mut chunk = Chunk::default();
        for &id in links {
            let href = self.doc.attr(id, "href");
            if href.is_empty() {
                continue;
            }
            if self.rules.is_ignored(href) {
                tracing::debug!(href, "skipping ignored link");
                continue;
            }
            chunk.import(&self.rules.specifier(href));
        }
        chunk
    }

    fn preamble(&self, partition: &Partition) -> Chunk {
        let mut chunk = Chunk::default();
        if partition.needs_register_helper() {
            chunk.source.push_str(&format!(
                "\nconst {} = require('{}');\n",
                HELPER_BINDING, self.register_helper
            ));
        }
        chunk
    }

    fn registrations(
        &self,
        nodes: &[NodeId],
        call: RegisterCall,
        partition: &Partition,
    ) -> Result<Chunk> {
        let mut chunk = Chunk::default();
        for &id in nodes {
            let markup = minify_node(self.doc, id, partition.extracted(), self.minify)?;
            let literal = serde_json::to_string(&markup)
                .map_err(|e| LoaderError::minify("", "quote markup", Some(e.into())))?;
            chunk.source.push_str(&format!(
                "\n{}.{}({});\n",
                HELPER_BINDING,
                call.method(),
                literal
            ));
            chunk.line_count += 2;
        }
        Ok(chunk)
    }

    fn scripts(&self, scripts: &[NodeId]) -> Chunk {
        let mut chunk = Chunk::default();
        for &id in scripts {
            let src = self.doc.attr(id, "src");
            if !src.is_empty() {
                chunk.import(&relative_specifier(src));
                continue;
            }
            let body = self.doc.inner_text(id);
            chunk.line_count += 2 + body.matches('\n').count();
            chunk.source.push('\n');
            chunk.source.push_str(&body);
            chunk.source.push('\n');
        }
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use pretty_assertions::assert_eq;

    fn synth(html: &str, opts: Options) -> Transformed {
        let doc = Document::parse(html);
        let partition = Partition::build(&doc);
        let rules = LinkRules::compile(&opts).unwrap();
        Synthesizer {
            doc: &doc,
            rules: &rules,
            register_helper: &opts.register_helper,
            minify: MinifyOptions::default(),
        }
        .synthesize(&partition)
        .unwrap()
    }

    #[test]
    fn test_links_only_has_no_preamble() {
        let out = synth("<link rel=\"import\" href=\"a.html\">", Options::default());
        assert_eq!(out.source, "\nimport './a.html';\n");
        assert_eq!(out.line_count, 2);
    }

    #[test]
    fn test_empty_href_and_src_emit_no_import() {
        let out = synth(
            "<link rel=\"import\" href=\"\"><script src=\"\"></script>",
            Options::default(),
        );
        assert_eq!(out.source, "\n\n");
        assert_eq!(out.import_count, 0);
    }

    #[test]
    fn test_import_lines_inside_script_bodies_are_not_counted() {
        let out = synth(
            "<link href=\"a.html\"><script src=\"b.js\"></script><script>\nimport 'not-counted';\n</script>",
            Options::default(),
        );
        assert!(out.source.contains("\nimport 'not-counted';\n"));
        assert_eq!(out.import_count, 2);
    }

    #[test]
    fn test_custom_helper_module() {
        let opts = Options {
            register_helper: "./runtime/register.js".to_string(),
            ..Options::default()
        };
        let out = synth("<span>hi</span>", opts);
        assert_eq!(
            out.source,
            "\nconst RegisterHtmlTemplate = require('./runtime/register.js');\n\nRegisterHtmlTemplate.toBody(\"<span>hi</span>\");\n"
        );
    }

    #[test]
    fn test_markup_is_json_quoted() {
        let out = synth("<p title=\"a 'b'\">say \"hi\"\n</p>", Options::default());
        assert!(out
            .source
            .contains(r#"RegisterHtmlTemplate.toBody("<p title=\"a 'b'\">say \"hi\" </p>");"#));
    }

    #[test]
    fn test_script_line_count() {
        let out = synth("<script>\na();\nb();\n</script>", Options::default());
        assert_eq!(out.source, "\n\na();\nb();\n\n");
        assert_eq!(out.line_count, 5);
    }

    #[test]
    fn test_module_script_src_ignores_rewrite_exemptions() {
        let opts = Options {
            ignore_path_rewrite: vec!["lib".to_string()],
            ..Options::default()
        };
        let out = synth(
            "<link href=\"lib/a.html\"><dom-module id=\"x\"><script src=\"lib/x.js\"></script></dom-module>",
            opts,
        );
        assert!(out.source.contains("import 'lib/a.html';"));
        assert!(out.source.contains("import './lib/x.js';"));
    }
}
