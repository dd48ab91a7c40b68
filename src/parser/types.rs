//! Type annotations.
//!
//! Grammar: leading `&` markers (each `&&` counts twice), then a base — a
//! builtin (`str`, `num`, `dec`, `bool`, `nothing`) or a dotted user-type
//! path — optionally followed by `<` TYPE (`,` TYPE)* `>` generics on
//! user-defined bases.
//!
//! Shape: TYPE holds `[PTR*, BASE]`; generic parameters hang off the BASE
//! node as nested TYPE children. A user-defined base is an IDENTIFIER node
//! carrying the full dotted path as its value.
//!
//! Generic nesting is tracked with an explicit stack of open bases. Argument
//! slots are allocated speculatively when `<` or `,` is seen and returned to
//! the arena if the list closes before they are filled, which is how empty
//! trailing TYPE nodes get pruned.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

use super::{push_node, unexpected};

/// Parses one type annotation and attaches it to `parent`.
pub(crate) fn type_rule(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    parent: NodeId,
    trace: &Token,
) -> Result<NodeId, Diagnostic> {
    let type_node = cx.nodes.alloc(AstNode::new(AstRule::Type));
    let (base, nested_allowed) = prefix_and_base(cx, tokens, type_node, trace)?;

    if nested_allowed && peek_kind(cx, tokens) == Some(TokenKind::BoolLt) {
        tokens.next();
        generics(cx, tokens, base, trace)?;
    }

    cx.nodes[parent].children.push(type_node);
    Ok(type_node)
}

/// Parses `<` TYPE (`,` TYPE)* `>` lists under `base`, including arbitrarily
/// nested lists, without recursion.
fn generics(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    base: NodeId,
    trace: &Token,
) -> Result<(), Diagnostic> {
    let mut stack: Vec<NodeId> = vec![base];
    let mut open_arg: Option<NodeId> = Some(new_arg(cx, base));

    loop {
        let Some(id) = tokens.peek() else {
            return Err(unexpected(trace, "unclosed generic parameter list"));
        };
        let t = cx.tokens[id];

        match t.kind {
            TokenKind::BoolGt => {
                tokens.next();
                if let Some(arg) = open_arg.take() {
                    if cx.nodes[arg].children.is_empty() {
                        // `a<>` / `a<b,>`: the slot was never filled.
                        let container = *stack.last().expect("generic stack is never empty here");
                        cx.nodes[container].children.pop();
                        cx.nodes.dealloc(arg);
                    }
                }
                stack.pop();
                if stack.is_empty() {
                    return Ok(());
                }
            }

            TokenKind::Comma => {
                tokens.next();
                if let Some(arg) = open_arg {
                    if cx.nodes[arg].children.is_empty() {
                        return Err(unexpected(&t, "expected a type before `,`"));
                    }
                }
                let container = *stack.last().expect("generic stack is never empty here");
                open_arg = Some(new_arg(cx, container));
            }

            _ => {
                let Some(arg) = open_arg else {
                    return Err(unexpected(&t, "expected `,` or `>` in a generic parameter list"));
                };
                if !cx.nodes[arg].children.is_empty() {
                    return Err(unexpected(&t, "expected `,` or `>` in a generic parameter list"));
                }

                let (arg_base, arg_nested) = prefix_and_base(cx, tokens, arg, &t)?;
                if arg_nested && peek_kind(cx, tokens) == Some(TokenKind::BoolLt) {
                    tokens.next();
                    stack.push(arg_base);
                    open_arg = Some(new_arg(cx, arg_base));
                } else {
                    open_arg = Some(arg);
                }
            }
        }
    }
}

/// Parses pointer markers and the base of a type into `into`.
///
/// Returns the base node and whether generics may follow it; builtins take
/// no parameters.
fn prefix_and_base(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    into: NodeId,
    trace: &Token,
) -> Result<(NodeId, bool), Diagnostic> {
    loop {
        match peek_kind(cx, tokens) {
            Some(TokenKind::Ampersand) => {
                let t = cx.tokens[tokens.next().expect("peeked")];
                push_node(cx, into, AstNode::at(AstRule::Ptr, t.line, t.column));
            }
            Some(TokenKind::And) => {
                let t = cx.tokens[tokens.next().expect("peeked")];
                push_node(cx, into, AstNode::at(AstRule::Ptr, t.line, t.column));
                push_node(cx, into, AstNode::at(AstRule::Ptr, t.line, t.column));
            }
            _ => break,
        }
    }

    let Some(id) = tokens.peek() else {
        return Err(unexpected(trace, "expected a type"));
    };
    let t = cx.tokens[id];

    let builtin = match t.kind {
        TokenKind::Nothing => Some(AstRule::Nothing),
        TokenKind::Str => Some(AstRule::Str),
        TokenKind::Num => Some(AstRule::Num),
        TokenKind::Dec => Some(AstRule::Dec),
        TokenKind::Bool => Some(AstRule::Bool),
        _ => None,
    };

    if let Some(rule) = builtin {
        tokens.next();
        let base = push_node(cx, into, AstNode::at(rule, t.line, t.column));
        return Ok((base, false));
    }

    if t.kind != TokenKind::Identifier {
        return Err(unexpected(&t, "expected a type"));
    }

    // Dotted user-type path; the joined path is the node's value.
    tokens.next();
    let mut path = cx
        .interner
        .resolve(t.value.expect("identifier token carries a value"))
        .to_string();
    while peek_kind(cx, tokens) == Some(TokenKind::Dot) {
        tokens.next();
        let segment = super::expect(
            cx,
            tokens,
            TokenKind::Identifier,
            "expected an identifier after `.` in a type path",
        )?;
        path.push('.');
        path.push_str(
            cx.interner
                .resolve(segment.value.expect("identifier token carries a value")),
        );
    }

    let name = cx.interner.intern(&path);
    let base = push_node(
        cx,
        into,
        AstNode::with_value(AstRule::Identifier, name, t.line, t.column),
    );
    Ok((base, true))
}

fn new_arg(cx: &mut Session, container: NodeId) -> NodeId {
    push_node(cx, container, AstNode::new(AstRule::Type))
}

fn peek_kind(cx: &Session, tokens: &Stream<TokenId>) -> Option<TokenKind> {
    tokens.peek().map(|id| cx.tokens[id].kind)
}
