//! Ariadne-based rendering of syntax errors.
//!
//! Inference has no diagnostics of its own; the only thing that can stop a
//! run is a parse error, rendered here either as a labeled report or as a
//! single JSON object.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use tyflow_common::span::Span;
use tyflow_parser::ParseError;

/// Rendering options for diagnostic output.
#[derive(Clone, Debug)]
pub struct DiagnosticOptions {
    /// Use ANSI colors.
    pub color: bool,
    /// Emit one JSON object instead of a human-readable report.
    pub json: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions {
            color: true,
            json: false,
        }
    }
}

impl DiagnosticOptions {
    /// Plain text, for tests and piped output.
    pub fn colorless() -> Self {
        DiagnosticOptions {
            color: false,
            json: false,
        }
    }
}

/// Error code for syntax errors.
pub const SYNTAX_ERROR_CODE: &str = "P0001";

/// Clamp a span to the source. Empty spans are widened to one byte.
fn span_range(span: Span, source_len: usize) -> Range<usize> {
    let start = (span.start as usize).min(source_len);
    let end = (span.end as usize).min(source_len).max(start);
    start..end.max(start + 1)
}

/// Render a syntax error into a string.
pub fn render_syntax_error(
    error: &ParseError,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    if options.json {
        return render_json(error, source, filename);
    }

    let config = Config::default().with_color(options.color);
    let primary = span_range(error.span, source.len());

    let mut builder = Report::build(ReportKind::Error, primary.clone())
        .with_code(SYNTAX_ERROR_CODE)
        .with_message(format!("syntax error: {}", error.message))
        .with_config(config)
        .with_label(
            Label::new(primary)
                .with_message(&error.message)
                .with_color(Color::Red),
        );
    if let Some((message, span)) = &error.related {
        builder = builder.with_label(
            Label::new(span_range(*span, source.len()))
                .with_message(message)
                .with_color(Color::Blue),
        );
    }

    let mut buf = Vec::new();
    if builder.finish().write(Source::from(source), &mut buf).is_err() {
        return format!("error[{SYNTAX_ERROR_CODE}]: {}: {}\n", filename, error.message);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn render_json(error: &ParseError, source: &str, filename: &str) -> String {
    let primary = span_range(error.span, source.len());
    let mut spans = vec![serde_json::json!({
        "start": primary.start,
        "end": primary.end,
        "label": error.message,
    })];
    if let Some((message, span)) = &error.related {
        let related = span_range(*span, source.len());
        spans.push(serde_json::json!({
            "start": related.start,
            "end": related.end,
            "label": message,
        }));
    }
    serde_json::json!({
        "code": SYNTAX_ERROR_CODE,
        "severity": "error",
        "message": error.message,
        "file": filename,
        "spans": spans,
    })
    .to_string()
}
