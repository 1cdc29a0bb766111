// ABOUTME: Main library entry point for the HTML component module loader.
// ABOUTME: Re-exports the public API: Loader, LoaderBuilder, Options, Transformed, LoaderError, run.

//! Turns web-component HTML (`<link>` imports, `<dom-module>` definitions and
//! `<script>` blocks) into a JavaScript module body for a bundler.
//!
//! Local links and script files become `import` statements, template modules
//! and any other markup are minified and handed to a runtime registration
//! helper, and inline scripts are emitted verbatim after everything they may
//! depend on has been registered.
//!
//! # Example
//!
//! ```
//! use html_module_loader::{Loader, LoaderError};
//!
//! fn main() -> Result<(), LoaderError> {
//!     let loader = Loader::builder().ignore_link("polymer/polymer.html").build()?;
//!     let out = loader.process(
//!         r#"<link rel="import" href="polymer/polymer.html">
//!            <link rel="import" href="x-foo.html">"#,
//!         "src/x-app.html",
//!     )?;
//!     assert_eq!(out.source, "\nimport './x-foo.html';\n");
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod loader;
pub mod minify;
pub mod options;
pub mod partition;
pub mod paths;
pub mod result;
pub mod synth;

pub use crate::error::{ErrorCode, LoaderError};
pub use crate::loader::{decode_source, run, Loader, LoaderContext};
pub use crate::minify::MinifyOptions;
pub use crate::options::{LoaderBuilder, Options, DEFAULT_REGISTER_HELPER};
pub use crate::partition::{classify, Classification, Partition};
pub use crate::result::{Result, Transformed};
