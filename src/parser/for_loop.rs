//! For-loops: `for i in EXPR to EXPR (step EXPR)? { body }`.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::{expect, expr, extract, push_node, unexpected};

/// Parses a for-loop header and returns its body BLOCK node.
///
/// Produces FOR with children `IDENTIFIER FROM(expr) TO(expr) [STEP(expr)]
/// BLOCK`. The range after `to` runs until the opening `{`; a `step` keyword
/// inside it splits off the stride expression.
pub(crate) fn for_loop(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    parent: NodeId,
    trace: &Token,
) -> Result<NodeId, Diagnostic> {
    let for_node = push_node(cx, parent, AstNode::at(AstRule::For, trace.line, trace.column));

    let var = expect(
        cx,
        tokens,
        TokenKind::Identifier,
        "expected a loop variable after `for`",
    )?;
    push_node(
        cx,
        for_node,
        AstNode::with_value(
            AstRule::Identifier,
            var.value.expect("identifier token carries a value"),
            var.line,
            var.column,
        ),
    );

    expect(cx, tokens, TokenKind::In, "expected `in` after the loop variable")?;

    // Everything up to `to` is the start of the range.
    let mut from_tokens = extract::extract(
        cx,
        tokens,
        TokenKind::To,
        TokenKind::Unknown,
        false,
        false,
        trace,
    )?;
    let from = push_node(cx, for_node, AstNode::new(AstRule::From));
    expr::expression_tokens(cx, from, &mut from_tokens, trace)?;

    // The rest of the header runs to the body's `{`; a `step` keyword closes
    // the end-of-range expression and opens the stride expression.
    let to_node = push_node(cx, for_node, AstNode::new(AstRule::To));
    let mut current = to_node;
    let mut seen_step = false;
    let mut buffer: Vec<TokenId> = Vec::new();

    loop {
        let Some(next_id) = tokens.peek() else {
            return Err(unexpected(trace, "unexpected end of input in a for-loop range"));
        };
        let next = cx.tokens[next_id];
        match next.kind {
            TokenKind::OpenCurly => break,
            TokenKind::Step => {
                tokens.next();
                if seen_step {
                    return Err(unexpected(&next, "a for-loop takes a single `step`"));
                }
                seen_step = true;
                flush_range(cx, current, &mut buffer, &next)?;
                current = push_node(
                    cx,
                    for_node,
                    AstNode::at(AstRule::Step, next.line, next.column),
                );
            }
            _ => {
                tokens.next();
                buffer.push(next_id);
            }
        }
    }

    let brace = cx.tokens[tokens.peek().expect("loop broke on `{`")];
    flush_range(cx, current, &mut buffer, &brace)?;

    expect(cx, tokens, TokenKind::OpenCurly, "expected `{` to open the loop body")?;
    Ok(push_node(cx, for_node, AstNode::new(AstRule::Block)))
}

fn flush_range(
    cx: &mut Session,
    target: NodeId,
    buffer: &mut Vec<TokenId>,
    trace: &Token,
) -> Result<(), Diagnostic> {
    if buffer.is_empty() {
        return Err(unexpected(trace, "empty range expression in for-loop"));
    }
    let mut stream = Stream::new(std::mem::take(buffer));
    expr::expression_tokens(cx, target, &mut stream, trace)
}
