//! Core diagnostic type.

use std::fmt;
use std::fmt::Write as _;

use mu_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with an optional source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    /// Where in the macro text the problem is, when it has a location.
    pub span: Option<Span>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render against the text the span refers to.
    ///
    /// ```text
    /// error[E1003]: unclosed `(`
    ///   --> 1:5
    ///    |
    ///  1 | foo (bar
    ///    |     ^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let mut out = format!("{}[{}]: {}\n", self.severity, self.code, self.message);
        if let Some(span) = self.span {
            let table = LineOffsetTable::build(source);
            let (line, col) = table.offset_to_line_col(source, span.start);
            let text = table.line_text(source, line);
            let gutter = line.to_string().len();
            let pad = " ".repeat(gutter);
            let width = span_width(source, span, text, col);
            let _ = writeln!(out, "{pad}--> {line}:{col}");
            let _ = writeln!(out, "{pad} |");
            let _ = writeln!(out, "{line} | {text}");
            let _ = writeln!(
                out,
                "{pad} | {}{}",
                " ".repeat(col.saturating_sub(1) as usize),
                "^".repeat(width)
            );
        }
        for note in &self.notes {
            let _ = writeln!(out, "  = note: {note}");
        }
        out
    }
}

/// Caret width: the span's character length clipped to the excerpt line,
/// at least one.
fn span_width(source: &str, span: Span, line_text: &str, col: u32) -> usize {
    let chars = span.slice(source).chars().take_while(|c| *c != '\n').count();
    let remaining = line_text
        .chars()
        .count()
        .saturating_sub(col.saturating_sub(1) as usize);
    chars.min(remaining).max(1)
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for note in &self.notes {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}
