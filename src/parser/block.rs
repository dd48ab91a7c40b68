//! Statement blocks: `{ statement* }`.
//!
//! Blocks are parsed iteratively with an explicit frame stack. Statement
//! forms that own a body (`if`, `elseif`, `else`, `while`, `for` and bare
//! nested braces) push their BLOCK node as a new frame; a `}` pops the top
//! frame. The stack bounds recursion to one call no matter how deeply
//! statements nest.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::conditional::{self, CondKind};
use super::expr::{self, ExprEnd};
use super::{assignment, declaration, for_loop, push_node, unexpected};

/// Parses `{ ... }` into a BLOCK node under `parent`.
pub(crate) fn block(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    parent: NodeId,
    trace: &Token,
) -> Result<(), Diagnostic> {
    super::expect(cx, tokens, TokenKind::OpenCurly, "expected `{` to open a block")?;

    let root_block = push_node(cx, parent, AstNode::new(AstRule::Block));
    let mut frames: Vec<NodeId> = vec![root_block];

    loop {
        let Some(next_id) = tokens.peek() else {
            return Err(unexpected(trace, "unexpected end of input inside a block"));
        };
        let next = cx.tokens[next_id];
        let frame = *frames.last().expect("block frame stack is never empty");

        match next.kind {
            TokenKind::CloseCurly => {
                tokens.next();
                frames.pop();
                if frames.is_empty() {
                    return Ok(());
                }
            }

            TokenKind::OpenCurly => {
                tokens.next();
                let nested = push_node(cx, frame, AstNode::at(AstRule::Block, next.line, next.column));
                frames.push(nested);
            }

            TokenKind::Let => {
                tokens.next();
                declaration::declaration(cx, tokens, frame, false)?;
            }

            TokenKind::Const => {
                tokens.next();
                declaration::declaration(cx, tokens, frame, true)?;
            }

            TokenKind::If => {
                tokens.next();
                frames.push(conditional::conditional(cx, tokens, frame, &next, CondKind::If)?);
            }

            TokenKind::ElseIf => {
                tokens.next();
                frames.push(conditional::conditional(cx, tokens, frame, &next, CondKind::ElseIf)?);
            }

            TokenKind::Else => {
                tokens.next();
                frames.push(conditional::conditional(cx, tokens, frame, &next, CondKind::Else)?);
            }

            TokenKind::While => {
                tokens.next();
                frames.push(conditional::conditional(cx, tokens, frame, &next, CondKind::While)?);
            }

            TokenKind::For => {
                tokens.next();
                frames.push(for_loop::for_loop(cx, tokens, frame, &next)?);
            }

            TokenKind::Return => {
                tokens.next();
                let ret = push_node(cx, frame, AstNode::at(AstRule::Return, next.line, next.column));
                expr::expression(cx, ret, tokens, ExprEnd::Semicolon, &next)?;
            }

            TokenKind::Identifier => {
                if !assignment::assignment(cx, tokens, frame, &next)? {
                    expr::expression(cx, frame, tokens, ExprEnd::Semicolon, &next)?;
                }
            }

            _ => {
                expr::expression(cx, frame, tokens, ExprEnd::Semicolon, &next)?;
            }
        }
    }
}
