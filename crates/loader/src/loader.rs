// ABOUTME: Loader ties parsing, partitioning and synthesis together for one resource at a time.
// ABOUTME: Also models the host bundler contract (LoaderContext) with a single completion callback.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::dom::Document;
use crate::error::LoaderError;
use crate::minify::MinifyOptions;
use crate::options::{LoaderBuilder, Options};
use crate::partition::Partition;
use crate::paths::LinkRules;
use crate::result::{Result, Transformed};
use crate::synth::Synthesizer;

/// Transforms component HTML into module source.
///
/// A `Loader` holds only its compiled options, so one instance can serve any
/// number of resources, from any number of threads.
#[derive(Debug, Clone)]
pub struct Loader {
    opts: Options,
    rules: LinkRules,
    minify: MinifyOptions,
}

impl Loader {
    /// Create a Loader, compiling the ignore rules in `opts`.
    pub fn new(opts: Options) -> Result<Self> {
        let rules = LinkRules::compile(&opts)?;
        Ok(Self {
            opts,
            rules,
            minify: MinifyOptions::default(),
        })
    }

    /// Create a LoaderBuilder for custom configuration.
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::new()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Transform `content`, the source of `resource_path`.
    pub fn process(&self, content: &str, resource_path: &str) -> Result<Transformed> {
        let doc = Document::parse(content);
        let partition = Partition::build(&doc);
        tracing::debug!(
            resource = resource_path,
            links = partition.links.len(),
            template_modules = partition.template_modules.len(),
            scripts = partition.scripts.len(),
            other_nodes = partition.other_nodes.len(),
            "partitioned document"
        );

        let synth = Synthesizer {
            doc: &doc,
            rules: &self.rules,
            register_helper: &self.opts.register_helper,
            minify: self.minify,
        };
        let out = synth
            .synthesize(&partition)
            .map_err(|e| e.with_resource(resource_path))?;
        tracing::debug!(
            resource = resource_path,
            imports = out.import_count,
            lines = out.line_count,
            "synthesized module"
        );
        Ok(out)
    }

    /// Decode raw file bytes and transform them.
    pub fn process_bytes(&self, bytes: &[u8], resource_path: &str) -> Result<Transformed> {
        let content = decode_source(bytes).map_err(|e| e.with_resource(resource_path))?;
        self.process(&content, resource_path)
    }
}

/// Decode source bytes as UTF-8, or UTF-16 when a BOM says so.
pub fn decode_source(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, bom_len): (&'static Encoding, usize) =
        Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or_else(|| {
            LoaderError::parse(
                "",
                "decode source",
                Some(anyhow::anyhow!("input is not valid {}", encoding.name())),
            )
        })
}

/// The host bundler as seen by the loader.
pub trait LoaderContext {
    /// Path of the resource being transformed.
    fn resource_path(&self) -> &str;

    /// Options configured for this resource.
    fn options(&self) -> Result<Options>;

    /// Completion callback; called exactly once per [`run`].
    fn callback(
        &mut self,
        error: Option<LoaderError>,
        source: Option<String>,
        source_map: Option<String>,
    );
}

/// Transform `content` for `ctx` and report the outcome through its callback.
pub fn run<C: LoaderContext + ?Sized>(ctx: &mut C, content: &str) {
    let resource = ctx.resource_path().to_string();
    let outcome = ctx
        .options()
        .and_then(Loader::new)
        .and_then(|loader| loader.process(content, &resource))
        .map_err(|e| e.with_resource(resource.as_str()));

    match outcome {
        Ok(out) => ctx.callback(None, Some(out.source), Some(out.source_map)),
        Err(err) => {
            tracing::debug!(resource = resource.as_str(), error = %err, "transform failed");
            ctx.callback(Some(err), None, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        path: String,
        opts: std::result::Result<Options, String>,
        calls: Vec<(Option<LoaderError>, Option<String>, Option<String>)>,
    }

    impl LoaderContext for Recorder {
        fn resource_path(&self) -> &str {
            &self.path
        }

        fn options(&self) -> Result<Options> {
            self.opts
                .clone()
                .map_err(|msg| LoaderError::options("", "read options", Some(anyhow::anyhow!(msg))))
        }

        fn callback(
            &mut self,
            error: Option<LoaderError>,
            source: Option<String>,
            source_map: Option<String>,
        ) {
            self.calls.push((error, source, source_map));
        }
    }

    #[test]
    fn test_run_calls_back_once_with_source() {
        let mut ctx = Recorder {
            path: "src/x-app.html".to_string(),
            opts: Ok(Options::default()),
            calls: Vec::new(),
        };
        run(&mut ctx, "<link rel=\"import\" href=\"x-foo.html\">");

        assert_eq!(ctx.calls.len(), 1);
        let (err, source, map) = &ctx.calls[0];
        assert!(err.is_none());
        assert_eq!(source.as_deref(), Some("\nimport './x-foo.html';\n"));
        assert_eq!(map.as_deref(), Some(""));
    }

    #[test]
    fn test_run_reports_option_errors() {
        let mut ctx = Recorder {
            path: "src/x-app.html".to_string(),
            opts: Err("bad options".to_string()),
            calls: Vec::new(),
        };
        run(&mut ctx, "<div></div>");

        assert_eq!(ctx.calls.len(), 1);
        let (err, source, _) = &ctx.calls[0];
        let err = err.as_ref().unwrap();
        assert!(err.is_options());
        assert_eq!(err.resource, "src/x-app.html");
        assert!(source.is_none());
    }

    #[test]
    fn test_minify_failure_has_no_partial_output() {
        let mut ctx = Recorder {
            path: "src/x-bad.html".to_string(),
            opts: Ok(Options::default()),
            calls: Vec::new(),
        };
        run(
            &mut ctx,
            "<link href=\"a.html\"><dom-module id=\"x\"><template><style>..a { color: red }</style></template></dom-module>",
        );

        let (err, source, _) = &ctx.calls[0];
        let err = err.as_ref().unwrap();
        assert!(err.is_minify());
        assert_eq!(err.resource, "src/x-bad.html");
        assert!(source.is_none());
    }

    #[test]
    fn test_decode_source_utf8_and_bom() {
        assert_eq!(decode_source(b"<p>hi</p>").unwrap(), "<p>hi</p>");
        assert_eq!(decode_source(b"\xEF\xBB\xBF<p>hi</p>").unwrap(), "<p>hi</p>");

        let utf16le: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain("<p>".encode_utf16().flat_map(|u| u.to_le_bytes()))
            .collect();
        assert_eq!(decode_source(&utf16le).unwrap(), "<p>");
    }

    #[test]
    fn test_decode_source_rejects_invalid_utf8() {
        let err = decode_source(b"<p>\xC3\x28</p>").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_loader_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Loader>();
    }
}
