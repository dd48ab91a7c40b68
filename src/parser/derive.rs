//! Derive annotations inside mod bodies: `derive TraitA, TraitB;`.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::{expect, push_node, unexpected};

/// Parses a derive list. Emits a DERIVE node whose children are the
/// IDENTIFIER trait names; the converter attaches it to the next declaration.
pub(crate) fn derive(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    parent: NodeId,
    trace: &Token,
) -> Result<(), Diagnostic> {
    let node = push_node(cx, parent, AstNode::at(AstRule::Derive, trace.line, trace.column));

    loop {
        let ident = expect(
            cx,
            tokens,
            TokenKind::Identifier,
            "expected a trait name in the derive list",
        )?;
        push_node(
            cx,
            node,
            AstNode::with_value(
                AstRule::Identifier,
                ident.value.expect("identifier token carries a value"),
                ident.line,
                ident.column,
            ),
        );

        let Some(next_id) = tokens.next() else {
            return Err(unexpected(&ident, "unexpected end of input in a derive list"));
        };
        let next = cx.tokens[next_id];
        match next.kind {
            TokenKind::Semicolon => break,
            TokenKind::Comma => continue,
            _ => return Err(unexpected(&next, "expected `,` or `;` in the derive list")),
        }
    }

    Ok(())
}
