//! Assignment statements: `name = expr;`.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::expr::{self, ExprEnd};
use super::push_node;

/// Tries to parse an assignment at an identifier statement head.
///
/// `trace` is the still-unconsumed identifier; the decision is made by
/// looking one token past it. Returns `false` without consuming anything when
/// the statement is not an assignment, so the caller can fall back to the
/// expression parser.
pub(crate) fn assignment(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    parent: NodeId,
    trace: &Token,
) -> Result<bool, Diagnostic> {
    match tokens.peek_at(1).map(|id| cx.tokens[id].kind) {
        Some(TokenKind::Equals) => {}
        _ => return Ok(false),
    }

    tokens.next(); // the identifier
    tokens.next(); // `=`

    let assign = push_node(
        cx,
        parent,
        AstNode::at(AstRule::Assignment, trace.line, trace.column),
    );
    push_node(
        cx,
        assign,
        AstNode::with_value(
            AstRule::Identifier,
            trace.value.expect("identifier token carries a value"),
            trace.line,
            trace.column,
        ),
    );

    expr::expression(cx, assign, tokens, ExprEnd::Semicolon, trace)?;
    Ok(true)
}
