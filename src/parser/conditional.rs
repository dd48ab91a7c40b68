//! Conditionals and while-loops.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::expr::{self, ExprEnd};
use super::{expect, push_node, unexpected};

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum CondKind {
    If,
    ElseIf,
    Else,
    While,
}

/// Parses the header of a conditional statement and returns the BLOCK node
/// its body will fill. The condition expression runs to the opening `{`,
/// which it consumes.
///
/// `elseif` and `else` must directly follow an `if` or `elseif` in the same
/// block; anything else between them is an error.
pub(crate) fn conditional(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    parent: NodeId,
    trace: &Token,
    kind: CondKind,
) -> Result<NodeId, Diagnostic> {
    if matches!(kind, CondKind::ElseIf | CondKind::Else) {
        let follows_if = cx.nodes[parent]
            .children
            .last()
            .map(|&prev| matches!(cx.nodes[prev].rule, AstRule::If | AstRule::ElseIf))
            .unwrap_or(false);
        if !follows_if {
            let what = if kind == CondKind::Else { "`else`" } else { "`elseif`" };
            return Err(unexpected(
                trace,
                format!("{} requires a directly preceding `if`", what),
            ));
        }
    }

    let rule = match kind {
        CondKind::If => AstRule::If,
        CondKind::ElseIf => AstRule::ElseIf,
        CondKind::Else => AstRule::Else,
        CondKind::While => AstRule::While,
    };
    let cond = push_node(cx, parent, AstNode::at(rule, trace.line, trace.column));

    if kind == CondKind::Else {
        expect(cx, tokens, TokenKind::OpenCurly, "expected `{` after `else`")?;
    } else {
        expr::expression(cx, cond, tokens, ExprEnd::OpenCurly, trace)?;
    }

    Ok(push_node(cx, cond, AstNode::new(AstRule::Block)))
}
