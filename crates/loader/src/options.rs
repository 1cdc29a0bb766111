// ABOUTME: Per-invocation configuration for the loader: Options and LoaderBuilder.
// ABOUTME: Options deserializes from the host's camelCase JSON; LoaderBuilder is the fluent Rust API.

use serde::Deserialize;

use crate::error::LoaderError;
use crate::loader::Loader;

/// Module required by the generated preamble when no helper is configured.
pub const DEFAULT_REGISTER_HELPER: &str = "polymer-webpack-loader/register-html-template";

/// Loader options as supplied by the host bundler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Hrefs that are skipped when they match exactly.
    pub ignore_links: Vec<String>,
    /// Hrefs containing any of these substrings are skipped.
    pub ignore_links_from_partial_matches: Vec<String>,
    /// Hrefs containing any of these substrings keep their original form.
    #[serde(rename = "ignorePathReWrite")]
    pub ignore_path_rewrite: Vec<String>,
    /// Module exposing `register` and `toBody`.
    pub register_helper: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ignore_links: Vec::new(),
            ignore_links_from_partial_matches: Vec::new(),
            ignore_path_rewrite: Vec::new(),
            register_helper: DEFAULT_REGISTER_HELPER.to_string(),
        }
    }
}

impl Options {
    /// Parse options from a JSON object. `null` and empty input yield defaults.
    pub fn from_json(json: &str) -> Result<Self, LoaderError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let parsed: Option<Options> = serde_json::from_str(json)
            .map_err(|e| LoaderError::options("", "parse options", Some(e.into())))?;
        Ok(parsed.unwrap_or_default())
    }
}

/// Builder for constructing Loader instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct LoaderBuilder {
    opts: Options,
}

impl LoaderBuilder {
    /// Create a new LoaderBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    /// Skip a link whose href equals `href`.
    pub fn ignore_link(mut self, href: impl Into<String>) -> Self {
        self.opts.ignore_links.push(href.into());
        self
    }

    /// Skip any link whose href contains `fragment`.
    pub fn ignore_links_matching(mut self, fragment: impl Into<String>) -> Self {
        self.opts
            .ignore_links_from_partial_matches
            .push(fragment.into());
        self
    }

    /// Leave hrefs containing `fragment` without the relative prefix.
    pub fn ignore_path_rewrite(mut self, fragment: impl Into<String>) -> Self {
        self.opts.ignore_path_rewrite.push(fragment.into());
        self
    }

    /// Set the runtime registration helper module.
    pub fn register_helper(mut self, module: impl Into<String>) -> Self {
        self.opts.register_helper = module.into();
        self
    }

    /// Build the Loader with the configured options.
    pub fn build(self) -> Result<Loader, LoaderError> {
        Loader::new(self.opts)
    }
}
