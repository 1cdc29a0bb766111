// ABOUTME: CSS minification for <style> bodies and style attributes via lightningcss.
// ABOUTME: Rejected CSS surfaces as a Minify error.

use lightningcss::stylesheet::{
    MinifyOptions, ParserOptions, PrinterOptions, StyleAttribute, StyleSheet,
};

use crate::error::LoaderError;

fn minify_error(op: &str, err: impl std::fmt::Display) -> LoaderError {
    LoaderError::minify("", op, Some(anyhow::anyhow!(err.to_string())))
}

fn printer() -> PrinterOptions<'static> {
    PrinterOptions {
        minify: true,
        ..PrinterOptions::default()
    }
}

/// Minify a full stylesheet, as found inside `<style>`.
pub fn minify_stylesheet(css: &str) -> Result<String, LoaderError> {
    if css.trim().is_empty() {
        return Ok(String::new());
    }
    let mut sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| minify_error("parse stylesheet", e))?;
    sheet
        .minify(MinifyOptions::default())
        .map_err(|e| minify_error("minify stylesheet", e))?;
    let printed = sheet
        .to_css(printer())
        .map_err(|e| minify_error("print stylesheet", e))?;
    Ok(printed.code)
}

/// Minify a declaration list, as found in a `style` attribute.
pub fn minify_declarations(css: &str) -> Result<String, LoaderError> {
    if css.trim().is_empty() {
        return Ok(String::new());
    }
    let mut attr = StyleAttribute::parse(css, ParserOptions::default())
        .map_err(|e| minify_error("parse style attribute", e))?;
    attr.minify(MinifyOptions::default());
    let printed = attr
        .to_css(printer())
        .map_err(|e| minify_error("print style attribute", e))?;
    Ok(printed.code)
}
