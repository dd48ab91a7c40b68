//! Structured diagnostics.
//!
//! Every phase reports failures as a [`Diagnostic`]: a phase tag, an error
//! kind, a source position and a human-readable message. Phases are
//! all-or-nothing; the first error aborts the phase and propagates to the
//! driver, which renders the record once. Nothing in the core prints.

use std::fmt;
use std::path::PathBuf;

use crate::style::Style;

/// The pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexer,
    Parser,
    Converter,
    Registry,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Parser => "parser",
            Phase::Converter => "converter",
            Phase::Registry => "registry",
        }
    }
}

/// The closed error taxonomy of the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnknownToken,
    UnclosedString,
    UnclosedComment,
    UnexpectedToken,
    IllegalImport,
    CircularImport { chain: Vec<PathBuf> },
    SymbolNotFound,
    SymbolMismatch,
    OutOfMemory,
    Io,
}

impl DiagnosticKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::UnknownToken => "unknown token",
            DiagnosticKind::UnclosedString => "unclosed string literal",
            DiagnosticKind::UnclosedComment => "unclosed block comment",
            DiagnosticKind::UnexpectedToken => "unexpected token",
            DiagnosticKind::IllegalImport => "illegal import",
            DiagnosticKind::CircularImport { .. } => "circular import",
            DiagnosticKind::SymbolNotFound => "symbol not found",
            DiagnosticKind::SymbolMismatch => "symbol mismatch",
            DiagnosticKind::OutOfMemory => "out of memory",
            DiagnosticKind::Io => "i/o error",
        }
    }
}

/// A single front-end failure, positioned in source.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub phase: Phase,
    pub kind: DiagnosticKind,
    pub line: usize,
    pub column: usize,
    pub message: String,
    /// File the position refers to, when known. Imported files set this so
    /// the driver can show the right excerpt.
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    pub fn new(
        phase: Phase,
        kind: DiagnosticKind,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            phase,
            kind,
            line,
            column,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Renders the diagnostic for a terminal, with a caret excerpt when the
    /// offending source text is available.
    pub fn render(&self, source: Option<&str>) -> String {
        let mut out = format!(
            "{}: {} ({})",
            Style::bold_red("error"),
            self.message,
            self.kind.label()
        );

        let location = match &self.path {
            Some(path) => format!("{}:{}:{}", path.display(), self.line, self.column),
            None => format!("{}:{}", self.line, self.column),
        };
        out.push_str(&format!(
            "\n  {} {} {}",
            Style::blue("-->"),
            location,
            Style::bright_black(&format!("[{}]", self.phase.as_str()))
        ));

        if let Some(excerpt) = source.and_then(|s| self.excerpt(s)) {
            out.push_str(&excerpt);
        }

        if let DiagnosticKind::CircularImport { chain } = &self.kind {
            out.push_str(&format!("\n\n{}", Style::bright_black("import chain:")));
            for (i, link) in chain.iter().enumerate() {
                let glyph = if i == 0 { "  " } else { "  └─ " };
                out.push_str(&format!(
                    "\n{}{}",
                    Style::bright_black(glyph),
                    link.display()
                ));
            }
        }

        out
    }

    fn excerpt(&self, source: &str) -> Option<String> {
        if self.line == 0 {
            return None;
        }
        let content = source.lines().nth(self.line - 1)?;
        let gutter = format!("{:4}", self.line);
        let underline = format!("{}^", " ".repeat(self.column.saturating_sub(1)));
        Some(format!(
            "\n{} {} {}\n     {} {}",
            Style::blue(&gutter),
            Style::blue("|"),
            content,
            Style::blue("|"),
            Style::red(&underline)
        ))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}:{}: {}",
            self.phase.as_str(),
            self.kind.label(),
            self.line,
            self.column,
            self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_points_at_the_offending_column() {
        let diag = Diagnostic::new(
            Phase::Parser,
            DiagnosticKind::UnexpectedToken,
            2,
            5,
            "expected ';' after import path",
        );
        let source = "package demo;\nimport \"x\"\nfun main() {}";
        let rendered = diag.render(Some(source));
        assert!(rendered.contains("import \"x\""), "{}", rendered);
        assert!(rendered.contains("    ^"), "{}", rendered);
        assert!(rendered.contains("\x1b[31m"), "should be colorized");
    }

    #[test]
    fn render_without_source_skips_the_excerpt() {
        let diag = Diagnostic::new(Phase::Lexer, DiagnosticKind::UnknownToken, 1, 1, "bad byte");
        let rendered = diag.render(None);
        assert!(rendered.contains("unknown token"));
        assert!(!rendered.contains('|'));
    }

    #[test]
    fn circular_import_lists_the_chain() {
        let chain = vec![
            PathBuf::from("/tmp/a.zx"),
            PathBuf::from("/tmp/b.zx"),
            PathBuf::from("/tmp/a.zx"),
        ];
        let diag = Diagnostic::new(
            Phase::Converter,
            DiagnosticKind::CircularImport { chain },
            1,
            1,
            "file is already part of the import chain",
        );
        let rendered = diag.render(None);
        assert!(rendered.contains("import chain:"));
        assert_eq!(rendered.matches("/tmp/a.zx").count(), 2);
    }

    #[test]
    fn display_is_single_line() {
        let diag = Diagnostic::new(Phase::Lexer, DiagnosticKind::UnclosedString, 3, 9, "newline in string");
        let text = diag.to_string();
        assert!(!text.contains('\n'));
        assert!(text.contains("3:9"));
    }
}
