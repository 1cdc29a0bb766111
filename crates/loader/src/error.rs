// ABOUTME: Error types for the loader including the ErrorCode enum and LoaderError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of transform failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Parse,
    Minify,
    Options,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Parse => "parse error",
            ErrorCode::Minify => "minify error",
            ErrorCode::Options => "invalid options",
            ErrorCode::Io => "io error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for transform operations.
#[derive(Debug, thiserror::Error)]
pub struct LoaderError {
    pub code: ErrorCode,
    pub resource: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "html-module-loader: {} {}: {}", self.op, self.resource, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl LoaderError {
    fn new(
        code: ErrorCode,
        resource: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            resource: resource.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Parse error.
    pub fn parse(
        resource: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Parse, resource, op, source)
    }

    /// Create a Minify error.
    pub fn minify(
        resource: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Minify, resource, op, source)
    }

    /// Create an Options error.
    pub fn options(
        resource: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Options, resource, op, source)
    }

    /// Create an Io error.
    pub fn io(
        resource: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Io, resource, op, source)
    }

    /// Attach the resource path when the error was raised below the loader.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        if self.resource.is_empty() {
            self.resource = resource.into();
        }
        self
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is a Minify error.
    pub fn is_minify(&self) -> bool {
        self.code == ErrorCode::Minify
    }

    /// Returns true if this is an Options error.
    pub fn is_options(&self) -> bool {
        self.code == ErrorCode::Options
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_source() {
        let err = LoaderError::minify(
            "x-foo.html",
            "minify style",
            Some(anyhow::anyhow!("unexpected token")),
        );
        assert_eq!(
            err.to_string(),
            "html-module-loader: minify style x-foo.html: minify error: unexpected token"
        );
        assert!(err.is_minify());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_with_resource_keeps_existing() {
        let err = LoaderError::parse("a.html", "decode", None).with_resource("b.html");
        assert_eq!(err.resource, "a.html");

        let err = LoaderError::parse("", "decode", None).with_resource("b.html");
        assert_eq!(err.resource, "b.html");
    }
}
