// ABOUTME: Classification and normalization of href/src values found in component markup.
// ABOUTME: External-path detection, the relative-prefix heuristic and compiled ignore rules.

use aho_corasick::AhoCorasick;
use url::{ParseError, Url};

use crate::error::LoaderError;
use crate::options::Options;

/// True when `path` carries a URL scheme (`http:`, `data:` ...) or is
/// protocol-relative (`//cdn.example.com/...`). Such resources are fetched
/// at runtime and never become bundler imports.
///
/// Only the scheme prefix matters: a scheme-bearing URL whose host or port
/// fails validation is still external.
pub fn is_external_path(path: &str) -> bool {
    if path.starts_with("//") {
        return true;
    }
    match Url::parse(path) {
        Ok(_) => true,
        Err(ParseError::RelativeUrlWithoutBase) => false,
        Err(_) => true,
    }
}

/// Prefix `./` onto paths that start with an ASCII letter so the bundler
/// resolves them next to the current file instead of as package names.
///
/// Bare package specifiers (`lodash/lodash.html`) are rewritten too; hosts
/// exempt them through `ignorePathReWrite`.
pub fn relative_specifier(path: &str) -> String {
    match path.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => format!("./{}", path),
        _ => path.to_string(),
    }
}

/// Substring matcher that treats an empty rule set as "never matches".
#[derive(Debug, Clone)]
struct Fragments(Option<AhoCorasick>);

impl Fragments {
    fn compile(patterns: &[String], op: &str) -> Result<Self, LoaderError> {
        if patterns.is_empty() {
            return Ok(Self(None));
        }
        AhoCorasick::new(patterns)
            .map(|ac| Self(Some(ac)))
            .map_err(|e| LoaderError::options("", op, Some(e.into())))
    }

    fn matches(&self, haystack: &str) -> bool {
        self.0.as_ref().is_some_and(|ac| ac.is_match(haystack))
    }
}

/// Link ignore and rewrite-exemption rules compiled once per loader.
#[derive(Debug, Clone)]
pub struct LinkRules {
    exact: Vec<String>,
    partial: Fragments,
    keep_path: Fragments,
}

impl LinkRules {
    pub fn compile(opts: &Options) -> Result<Self, LoaderError> {
        Ok(Self {
            exact: opts.ignore_links.clone(),
            partial: Fragments::compile(
                &opts.ignore_links_from_partial_matches,
                "compile ignoreLinksFromPartialMatches",
            )?,
            keep_path: Fragments::compile(&opts.ignore_path_rewrite, "compile ignorePathReWrite")?,
        })
    }

    /// True when the href must not produce an import.
    pub fn is_ignored(&self, href: &str) -> bool {
        self.exact.iter().any(|h| h == href) || self.partial.matches(href)
    }

    /// Module specifier to import for a link href.
    pub fn specifier(&self, href: &str) -> String {
        if self.keep_path.matches(href) {
            href.to_string()
        } else {
            relative_specifier(href)
        }
    }
}
