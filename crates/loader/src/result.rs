// ABOUTME: Output of a transform: generated module source, source-map placeholder and line count.
// ABOUTME: Also defines the crate-wide Result alias.

use serde::Serialize;

use crate::error::LoaderError;

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// A generated module body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformed {
    /// JavaScript module source for the bundler.
    pub source: String,
    /// Reserved; always empty.
    pub source_map: String,
    /// Lines synthesized ahead of and around inlined script bodies.
    pub line_count: usize,
    /// Import statements emitted for links and script files.
    #[serde(skip)]
    pub import_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let t = Transformed {
            source: "\nimport './a.html';\n".to_string(),
            source_map: String::new(),
            line_count: 2,
            import_count: 1,
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["sourceMap"], "");
        assert_eq!(json["lineCount"], 2);
        assert!(json.get("importCount").is_none());
    }
}
