//! Function declarations: `fun name(args) -> type { body }`.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::{block, expect, push_node, types, unexpected};

/// Parses a function declaration into a FUNCTION node with children
/// `[PUBLIC?] IDENTIFIER [ARGUMENTS] [TYPE] BLOCK`. A missing return type is
/// left off the tree; the converter reads that as `nothing`.
pub(crate) fn function(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    root: NodeId,
    trace: &Token,
    public: bool,
) -> Result<(), Diagnostic> {
    let fn_node = push_node(cx, root, AstNode::at(AstRule::Function, trace.line, trace.column));

    if public {
        push_node(cx, fn_node, AstNode::new(AstRule::Public));
    }

    let name = expect(
        cx,
        tokens,
        TokenKind::Identifier,
        "expected a function name after `fun`",
    )?;
    push_node(
        cx,
        fn_node,
        AstNode::with_value(
            AstRule::Identifier,
            name.value.expect("identifier token carries a value"),
            name.line,
            name.column,
        ),
    );

    expect(cx, tokens, TokenKind::OpenParen, "expected `(` after the function name")?;

    if tokens.peek().map(|id| cx.tokens[id].kind) != Some(TokenKind::CloseParen) {
        let args = push_node(cx, fn_node, AstNode::new(AstRule::Arguments));
        loop {
            let arg_name = expect(cx, tokens, TokenKind::Identifier, "expected an argument name")?;
            let arg = push_node(
                cx,
                args,
                AstNode::at(AstRule::Argument, arg_name.line, arg_name.column),
            );
            push_node(
                cx,
                arg,
                AstNode::with_value(
                    AstRule::Identifier,
                    arg_name.value.expect("identifier token carries a value"),
                    arg_name.line,
                    arg_name.column,
                ),
            );

            expect(cx, tokens, TokenKind::Colon, "expected `:` after the argument name")?;
            types::type_rule(cx, tokens, arg, &arg_name)?;

            match tokens.peek().map(|id| cx.tokens[id]) {
                Some(t) if t.kind == TokenKind::Comma => {
                    tokens.next();
                }
                Some(t) if t.kind == TokenKind::CloseParen => break,
                Some(t) => return Err(unexpected(&t, "expected `,` or `)` in the argument list")),
                None => {
                    return Err(unexpected(&name, "unexpected end of input in the argument list"))
                }
            }
        }
    }

    expect(cx, tokens, TokenKind::CloseParen, "expected `)` after the arguments")?;

    if tokens.peek().map(|id| cx.tokens[id].kind) == Some(TokenKind::Arrow) {
        tokens.next();
        types::type_rule(cx, tokens, fn_node, &name)?;
    }

    block::block(cx, tokens, fn_node, &name)
}
