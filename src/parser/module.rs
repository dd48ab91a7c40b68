//! Mod declarations: `mod name { ... }`.
//!
//! A mod is a namespace holding `let`/`const` declarations, functions and
//! derive annotations. Each derive attaches to the next declaration only.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::{declaration, derive, expect, function, push_node, unexpected};

pub(crate) fn module(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    root: NodeId,
    trace: &Token,
    public: bool,
) -> Result<(), Diagnostic> {
    let name = expect(
        cx,
        tokens,
        TokenKind::Identifier,
        "expected a module name after `mod`",
    )?;
    expect(cx, tokens, TokenKind::OpenCurly, "expected `{` after the module name")?;

    let node = push_node(cx, root, AstNode::at(AstRule::Mod, trace.line, trace.column));
    if public {
        push_node(cx, node, AstNode::new(AstRule::Public));
    }
    push_node(
        cx,
        node,
        AstNode::with_value(
            AstRule::Identifier,
            name.value.expect("identifier token carries a value"),
            name.line,
            name.column,
        ),
    );

    let mut inner_public: Option<Token> = None;
    let mut pending_derive: Option<Token> = None;

    loop {
        let Some(next_id) = tokens.next() else {
            return Err(unexpected(&name, "unexpected end of input inside a mod body"));
        };
        let next = cx.tokens[next_id];

        match next.kind {
            TokenKind::CloseCurly => break,

            TokenKind::Pub => {
                inner_public = Some(next);
            }

            TokenKind::Function => {
                function::function(cx, tokens, node, &next, inner_public.take().is_some())?;
            }

            TokenKind::Let => {
                declaration::declaration(cx, tokens, node, false)?;
                pending_derive = None;
            }

            TokenKind::Const => {
                declaration::declaration(cx, tokens, node, true)?;
                pending_derive = None;
            }

            TokenKind::Derive => {
                derive::derive(cx, tokens, node, &next)?;
                pending_derive = Some(next);
            }

            _ => return Err(unexpected(&next, "unexpected token in a mod body")),
        }
    }

    if let Some(d) = pending_derive {
        return Err(unexpected(&d, "`derive` must be followed by a declaration"));
    }
    if let Some(p) = inner_public {
        return Err(unexpected(&p, "`pub` must be followed by a function"));
    }

    Ok(())
}
