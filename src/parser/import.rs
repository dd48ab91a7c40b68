//! The `import "path";` prelude statement.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::{Diagnostic, DiagnosticKind, Phase};
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::{expect, push_node};

/// Parses one import. Imports are only legal while the file is still in its
/// top-level prelude, before any function or mod.
pub(crate) fn import(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    root: NodeId,
    top_level: bool,
    trace: &Token,
) -> Result<(), Diagnostic> {
    if !top_level {
        return Err(Diagnostic::new(
            Phase::Parser,
            DiagnosticKind::IllegalImport,
            trace.line,
            trace.column,
            "imports must appear before any function or mod",
        ));
    }

    let path = expect(
        cx,
        tokens,
        TokenKind::StringLiteral,
        "expected a quoted path after `import`",
    )?;
    expect(
        cx,
        tokens,
        TokenKind::Semicolon,
        "expected `;` after the import path",
    )?;

    push_node(
        cx,
        root,
        AstNode::with_value(
            AstRule::Import,
            path.value.expect("string literal carries a value"),
            path.line,
            path.column,
        ),
    );
    Ok(())
}
