//! The `package a.b.c;` file header.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::TokenKind;

use super::{expect, push_node};

/// Parses the mandatory package declaration that opens every file.
///
/// Emits a PACKAGE node whose children are the IDENTIFIER segments of the
/// dotted path, and consumes the terminating `;`.
pub(crate) fn package_header(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    root: NodeId,
) -> Result<NodeId, Diagnostic> {
    let keyword = expect(
        cx,
        tokens,
        TokenKind::Package,
        "every file must start with a `package` declaration",
    )?;

    let node = push_node(
        cx,
        root,
        AstNode::at(AstRule::Package, keyword.line, keyword.column),
    );

    loop {
        let ident = expect(
            cx,
            tokens,
            TokenKind::Identifier,
            "expected an identifier in the package path",
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

        match tokens.peek().map(|id| cx.tokens[id].kind) {
            Some(TokenKind::Dot) => {
                tokens.next();
            }
            _ => break,
        }
    }

    expect(
        cx,
        tokens,
        TokenKind::Semicolon,
        "expected `;` after the package path",
    )?;

    Ok(node)
}
