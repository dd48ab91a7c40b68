//! Queue-driven expression subparser.
//!
//! An expression is parsed as a work list of (token range, target node)
//! items. Each dequeued item parses one flat expression into its node;
//! whenever a nested construct is found — a parenthesized group, a call
//! argument, an operand of an operator chain — its token range is pushed back
//! onto the queue under a freshly allocated node instead of recursing. Stack
//! depth therefore stays constant no matter how deeply expressions nest.
//!
//! After the primary operand is read, a bitmask of likely follow-up
//! operations (call, property access, arithmetic, boolean) guards which
//! continuations are even attempted: identifiers admit everything, numerics
//! admit arithmetic and comparison, strings and booleans admit comparison
//! only, parenthesized groups admit everything.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::signed::{self, SignMode};
use super::{extract, push_node, unexpected};

pub(crate) const CALL_LIKELY: u32 = 0x1;
pub(crate) const PROP_ACCESS_LIKELY: u32 = 0x2;
pub(crate) const BOOLEAN_OP_LIKELY: u32 = 0x4;
pub(crate) const ARITHMETIC_OP_LIKELY: u32 = 0x8;
pub(crate) const ALL_LIKELY: u32 =
    CALL_LIKELY | PROP_ACCESS_LIKELY | BOOLEAN_OP_LIKELY | ARITHMETIC_OP_LIKELY;

/// One pending flat expression.
pub(crate) struct QueueItem {
    pub tokens: Stream<TokenId>,
    pub node: NodeId,
}

/// Delimiter ending an expression read off the main token stream.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExprEnd {
    /// Statement context: the expression runs to `;`.
    Semicolon,
    /// Condition context: the expression runs to the body's `{`.
    OpenCurly,
}

/// Parses one expression from the main stream, consuming the delimiter.
pub(crate) fn expression(
    cx: &mut Session,
    parent: NodeId,
    tokens: &mut Stream<TokenId>,
    end: ExprEnd,
    trace: &Token,
) -> Result<(), Diagnostic> {
    let end_kind = match end {
        ExprEnd::Semicolon => TokenKind::Semicolon,
        ExprEnd::OpenCurly => TokenKind::OpenCurly,
    };
    let group = extract::extract(cx, tokens, end_kind, TokenKind::Unknown, false, false, trace)?;
    drain(cx, parent, group, trace)
}

/// Parses an already-extracted token range as one expression.
pub(crate) fn expression_tokens(
    cx: &mut Session,
    parent: NodeId,
    tokens: &mut Stream<TokenId>,
    trace: &Token,
) -> Result<(), Diagnostic> {
    let group = std::mem::take(tokens);
    drain(cx, parent, group, trace)
}

fn drain(
    cx: &mut Session,
    parent: NodeId,
    group: Stream<TokenId>,
    trace: &Token,
) -> Result<(), Diagnostic> {
    let expr_node = push_node(cx, parent, AstNode::new(AstRule::Expression));
    let mut queue = vec![QueueItem {
        tokens: group,
        node: expr_node,
    }];

    while let Some(QueueItem { mut tokens, node }) = queue.pop() {
        parse_flat(cx, node, &mut tokens, &mut queue, trace)?;
    }
    Ok(())
}

/// Parses one flat expression into `node`, queueing nested ranges.
fn parse_flat(
    cx: &mut Session,
    node: NodeId,
    tokens: &mut Stream<TokenId>,
    queue: &mut Vec<QueueItem>,
    trace: &Token,
) -> Result<(), Diagnostic> {
    let Some(first_id) = tokens.peek() else {
        return Err(unexpected(trace, "empty expression"));
    };
    let mut first = cx.tokens[first_id];

    // Leading pointer and dereference markers attach to the enclosing node;
    // `&&` contributes two pointer levels.
    loop {
        match first.kind {
            TokenKind::Ampersand => {
                push_node(cx, node, AstNode::at(AstRule::Ptr, first.line, first.column));
            }
            TokenKind::And => {
                push_node(cx, node, AstNode::at(AstRule::Ptr, first.line, first.column));
                push_node(cx, node, AstNode::at(AstRule::Ptr, first.line, first.column));
            }
            TokenKind::Multiply => {
                push_node(cx, node, AstNode::at(AstRule::Deref, first.line, first.column));
            }
            _ => break,
        }
        tokens.next();
        let Some(id) = tokens.peek() else {
            return Err(unexpected(&first, "expected an operand after a pointer marker"));
        };
        first = cx.tokens[id];
    }

    // The primary operand decides which continuations are likely.
    let likely: u32;
    let mut candidate: NodeId;
    match first.kind {
        TokenKind::Identifier => {
            likely = ALL_LIKELY;
            candidate = cx.nodes.alloc(AstNode::with_value(
                AstRule::Identifier,
                first.value.expect("identifier token carries a value"),
                first.line,
                first.column,
            ));
            tokens.next();
        }
        TokenKind::NumberLiteral | TokenKind::DecimalLiteral => {
            likely = ARITHMETIC_OP_LIKELY | BOOLEAN_OP_LIKELY;
            let rule = if first.kind == TokenKind::NumberLiteral {
                AstRule::NumberLiteral
            } else {
                AstRule::DecimalLiteral
            };
            candidate = cx.nodes.alloc(AstNode::with_value(
                rule,
                first.value.expect("literal token carries a value"),
                first.line,
                first.column,
            ));
            tokens.next();
        }
        TokenKind::StringLiteral => {
            likely = BOOLEAN_OP_LIKELY;
            candidate = cx.nodes.alloc(AstNode::with_value(
                AstRule::StringLiteral,
                first.value.expect("literal token carries a value"),
                first.line,
                first.column,
            ));
            tokens.next();
        }
        TokenKind::True | TokenKind::False => {
            likely = BOOLEAN_OP_LIKELY;
            let rule = if first.kind == TokenKind::True {
                AstRule::True
            } else {
                AstRule::False
            };
            candidate = cx
                .nodes
                .alloc(AstNode::at(rule, first.line, first.column));
            tokens.next();
        }
        TokenKind::OpenParen => {
            likely = ALL_LIKELY;
            candidate = cx.nodes.alloc(AstNode::new(AstRule::Expression));
            let nested = extract::extract(
                cx,
                tokens,
                TokenKind::CloseParen,
                TokenKind::OpenParen,
                true,
                true,
                &first,
            )?;
            queue.push(QueueItem {
                tokens: nested,
                node: candidate,
            });
        }
        _ => return Err(unexpected(&first, "unexpected token in expression")),
    }

    // Continuations, gated by the likely mask.
    loop {
        let Some(id) = tokens.peek() else {
            cx.nodes[node].children.push(candidate);
            return Ok(());
        };
        let t = cx.tokens[id];

        if t.kind == TokenKind::OpenParen && likely & CALL_LIKELY != 0 {
            candidate = call(cx, candidate, tokens, queue, &t)?;
        } else if t.kind == TokenKind::Dot && likely & PROP_ACCESS_LIKELY != 0 {
            candidate = prop(cx, candidate, tokens, queue, &t)?;
        } else if t.kind.is_arithmetic() && likely & ARITHMETIC_OP_LIKELY != 0 {
            candidate = signed::signed_op(cx, SignMode::Arithmetic, candidate, tokens, queue, &t)?;
        } else if t.kind.is_boolean_op() && likely & BOOLEAN_OP_LIKELY != 0 {
            candidate = signed::signed_op(cx, SignMode::Boolean, candidate, tokens, queue, &t)?;
        } else {
            return Err(unexpected(&t, "unexpected token in expression"));
        }
    }
}

/// Builds a CALL node: the candidate becomes the callee and each argument
/// range is queued under its own ARGUMENT → EXPRESSION pair.
fn call(
    cx: &mut Session,
    candidate: NodeId,
    tokens: &mut Stream<TokenId>,
    queue: &mut Vec<QueueItem>,
    trace: &Token,
) -> Result<NodeId, Diagnostic> {
    let (line, column) = {
        let c = &cx.nodes[candidate];
        (c.line, c.column)
    };
    let call_node = cx.nodes.alloc(AstNode::at(AstRule::Call, line, column));
    cx.nodes[call_node].children.push(candidate);

    let groups = extract::split_args(cx, tokens, trace)?;
    let groups: Vec<_> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    if !groups.is_empty() {
        let args = push_node(cx, call_node, AstNode::new(AstRule::Arguments));
        for group in groups {
            let arg = push_node(cx, args, AstNode::new(AstRule::Argument));
            let expr = push_node(cx, arg, AstNode::new(AstRule::Expression));
            queue.push(QueueItem {
                tokens: group,
                node: expr,
            });
        }
    }

    Ok(call_node)
}

/// Builds a PROP_ACCESS node by greedily consuming `.ident` links; an
/// `ident(` link becomes a nested CALL under the chain.
fn prop(
    cx: &mut Session,
    candidate: NodeId,
    tokens: &mut Stream<TokenId>,
    queue: &mut Vec<QueueItem>,
    trace: &Token,
) -> Result<NodeId, Diagnostic> {
    let (line, column) = {
        let c = &cx.nodes[candidate];
        (c.line, c.column)
    };
    let prop_node = cx.nodes.alloc(AstNode::at(AstRule::PropAccess, line, column));
    cx.nodes[prop_node].children.push(candidate);

    loop {
        tokens.next(); // the `.`
        let ident = super::expect(
            cx,
            tokens,
            TokenKind::Identifier,
            "expected a property name after `.`",
        )?;
        let ident_node = cx.nodes.alloc(AstNode::with_value(
            AstRule::Identifier,
            ident.value.expect("identifier token carries a value"),
            ident.line,
            ident.column,
        ));

        if tokens.peek().map(|id| cx.tokens[id].kind) == Some(TokenKind::OpenParen) {
            let nested_call = call(cx, ident_node, tokens, queue, trace)?;
            cx.nodes[prop_node].children.push(nested_call);
        } else {
            cx.nodes[prop_node].children.push(ident_node);
        }

        if tokens.peek().map(|id| cx.tokens[id].kind) != Some(TokenKind::Dot) {
            break;
        }
    }

    Ok(prop_node)
}
