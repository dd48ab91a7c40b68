//! Operator-chain builder with two-level precedence.
//!
//! Builds an ARITHMETIC or BOOLEAN node as a flat child list: operands and
//! operator markers interleaved, with one nested node per run of
//! high-precedence operators. In arithmetic mode `*` and `/` bind tighter
//! than `+` and `-`; in boolean mode `&&` binds tighter than `||` and the
//! comparison operators.
//!
//! Operand token ranges are buffered and queued as sub-expressions rather
//! than parsed in place; parentheses inside an operand are tracked only so
//! operators inside them do not split the operand.
//!
//! The wrapper node is allocated before it is known to be needed. If the
//! chain collapses to a single child, the wrapper goes back to the arena's
//! free list and the child is returned bare.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::expr::QueueItem;
use super::unexpected;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignMode {
    Arithmetic,
    Boolean,
}

impl SignMode {
    fn wrapper_rule(self) -> AstRule {
        match self {
            SignMode::Arithmetic => AstRule::Arithmetic,
            SignMode::Boolean => AstRule::Boolean,
        }
    }

    fn is_high(self, kind: TokenKind) -> bool {
        match self {
            SignMode::Arithmetic => matches!(kind, TokenKind::Multiply | TokenKind::Divide),
            SignMode::Boolean => kind == TokenKind::And,
        }
    }

    fn is_low(self, kind: TokenKind) -> bool {
        match self {
            SignMode::Arithmetic => matches!(kind, TokenKind::Plus | TokenKind::Minus),
            SignMode::Boolean => kind == TokenKind::Or || kind.is_comparison(),
        }
    }
}

fn op_rule(kind: TokenKind) -> AstRule {
    match kind {
        TokenKind::Plus => AstRule::Sum,
        TokenKind::Minus => AstRule::Sub,
        TokenKind::Multiply => AstRule::Mul,
        TokenKind::Divide => AstRule::Div,
        TokenKind::BoolEq => AstRule::Eq,
        TokenKind::BoolNeq => AstRule::Neq,
        TokenKind::BoolGt => AstRule::Gt,
        TokenKind::BoolGte => AstRule::Gte,
        TokenKind::BoolLt => AstRule::Lt,
        TokenKind::BoolLte => AstRule::Lte,
        TokenKind::And => AstRule::And,
        TokenKind::Or => AstRule::Or,
        other => unreachable!("not an operator token: {:?}", other),
    }
}

/// Consumes an operator chain starting at the peeked operator and returns the
/// node that replaces `candidate` in the surrounding expression.
///
/// In arithmetic mode the chain ends at the first top-level boolean operator,
/// which is left unconsumed for the caller to dispatch on.
pub(crate) fn signed_op(
    cx: &mut Session,
    mode: SignMode,
    candidate: NodeId,
    tokens: &mut Stream<TokenId>,
    queue: &mut Vec<QueueItem>,
    trace: &Token,
) -> Result<NodeId, Diagnostic> {
    let top = cx
        .nodes
        .alloc(AstNode::at(mode.wrapper_rule(), trace.line, trace.column));
    cx.nodes[top].children.push(candidate);

    let mut last_nested: Option<NodeId> = None;
    let mut buffer: Vec<TokenId> = Vec::new();
    let mut nested_parens: usize = 0;
    let mut first_iteration = true;
    let mut last_is_high = false;
    let mut last_seen = *trace;

    loop {
        let Some(id) = tokens.peek() else { break };
        let t = cx.tokens[id];

        // An arithmetic chain ends where the comparison begins.
        if mode == SignMode::Arithmetic && nested_parens == 0 && t.kind.is_boolean_op() {
            break;
        }

        tokens.next();
        last_seen = t;

        if nested_parens == 0 && mode.is_high(t.kind) {
            last_is_high = true;
            let nested = match last_nested {
                Some(n) => n,
                None => {
                    let n = cx
                        .nodes
                        .alloc(AstNode::at(mode.wrapper_rule(), t.line, t.column));
                    cx.nodes[top].children.push(n);
                    last_nested = Some(n);
                    n
                }
            };
            flush_operand(cx, nested, &mut buffer, &mut first_iteration, &t, queue)?;
            let op = cx.nodes.alloc(AstNode::at(op_rule(t.kind), t.line, t.column));
            cx.nodes[nested].children.push(op);
        } else if nested_parens == 0 && mode.is_low(t.kind) {
            last_is_high = false;
            let into = last_nested.take().unwrap_or(top);
            flush_operand(cx, into, &mut buffer, &mut first_iteration, &t, queue)?;
            let op = cx.nodes.alloc(AstNode::at(op_rule(t.kind), t.line, t.column));
            cx.nodes[top].children.push(op);
        } else {
            match t.kind {
                TokenKind::OpenParen => nested_parens += 1,
                TokenKind::CloseParen => {
                    if nested_parens == 0 {
                        return Err(unexpected(&t, "unbalanced `)` in expression"));
                    }
                    nested_parens -= 1;
                }
                _ => {}
            }
            buffer.push(id);
        }
    }

    if nested_parens > 0 {
        return Err(unexpected(&last_seen, "unclosed `(` in expression"));
    }
    if buffer.is_empty() {
        return Err(unexpected(&last_seen, "missing operand at the end of the expression"));
    }

    let last_sub = cx.nodes.alloc(AstNode::new(AstRule::Expression));
    let into = if last_is_high {
        last_nested.expect("high-precedence run always has its nested node")
    } else {
        top
    };
    cx.nodes[into].children.push(last_sub);
    queue.push(QueueItem {
        tokens: Stream::new(buffer),
        node: last_sub,
    });

    // Speculative wrapper collapse: hand the slot back for reuse.
    if cx.nodes[top].children.len() == 1 {
        let only = cx.nodes[top].children[0];
        cx.nodes.dealloc(top);
        return Ok(only);
    }

    Ok(top)
}

/// Closes the buffered operand into `into` as a queued sub-expression.
///
/// The very first operator of a chain has no buffered operand — the
/// candidate was already attached to the wrapper — so the first call only
/// clears the flag.
fn flush_operand(
    cx: &mut Session,
    into: NodeId,
    buffer: &mut Vec<TokenId>,
    first_iteration: &mut bool,
    op: &Token,
    queue: &mut Vec<QueueItem>,
) -> Result<(), Diagnostic> {
    if *first_iteration {
        *first_iteration = false;
        return Ok(());
    }
    if buffer.is_empty() {
        return Err(unexpected(op, "missing operand in expression"));
    }
    let expr = cx.nodes.alloc(AstNode::new(AstRule::Expression));
    cx.nodes[into].children.push(expr);
    queue.push(QueueItem {
        tokens: Stream::new(std::mem::take(buffer)),
        node: expr,
    });
    Ok(())
}
