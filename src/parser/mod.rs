//! Recursive, precedence-aware parser.
//!
//! [`parse`] consumes a token stream and produces a tree whose first child is
//! a PACKAGE node and whose remaining children are imports, functions and
//! mods. Each grammar production has its own submodule; the expression
//! subparser ([`expr`]) runs on an explicit work queue so nesting depth never
//! grows the call stack.

mod assignment;
mod block;
mod conditional;
mod declaration;
mod derive;
mod expr;
mod extract;
mod for_loop;
mod function;
mod import;
mod module;
mod package;
mod signed;
mod types;

#[cfg(test)]
mod tests;

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::{Diagnostic, DiagnosticKind, Phase};
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::{Token, TokenKind};

/// Parses a whole file into a ROOT node.
///
/// Top-level grammar: exactly one `package` declaration, then any mix of
/// imports, functions and mods. Imports are only legal before the first
/// function or mod; `pub` applies to the immediately following function or
/// mod and to nothing else.
pub fn parse(cx: &mut Session, tokens: &mut Stream<TokenId>) -> Result<NodeId, Diagnostic> {
    let root = cx.nodes.alloc(AstNode::new(AstRule::Root));

    package::package_header(cx, tokens, root)?;

    let mut top_level = true;
    let mut public: Option<Token> = None;

    while let Some(id) = tokens.next() {
        let current = cx.tokens[id];
        match current.kind {
            TokenKind::Pub => {
                public = Some(current);
            }
            TokenKind::Import => {
                if let Some(p) = public {
                    return Err(unexpected(&p, "`pub` cannot be applied to an import"));
                }
                import::import(cx, tokens, root, top_level, &current)?;
            }
            TokenKind::Function => {
                top_level = false;
                function::function(cx, tokens, root, &current, public.take().is_some())?;
            }
            TokenKind::Mod => {
                top_level = false;
                module::module(cx, tokens, root, &current, public.take().is_some())?;
            }
            _ => {
                return Err(unexpected(
                    &current,
                    "expected an import, function or mod at the top level",
                ));
            }
        }
    }

    if let Some(p) = public {
        return Err(unexpected(&p, "`pub` must be followed by a function or mod"));
    }

    Ok(root)
}

/// Checks the next token against `expected` and consumes it.
pub(crate) fn expect(
    cx: &Session,
    tokens: &mut Stream<TokenId>,
    expected: TokenKind,
    message: &str,
) -> Result<Token, Diagnostic> {
    let Some(id) = tokens.peek() else {
        let (line, column) = tokens
            .curr()
            .map(|last| {
                let t = cx.tokens[last];
                (t.line, t.column)
            })
            .unwrap_or((1, 1));
        return Err(Diagnostic::new(
            Phase::Parser,
            DiagnosticKind::UnexpectedToken,
            line,
            column,
            format!("{} (unexpected end of input)", message),
        ));
    };

    let token = cx.tokens[id];
    if token.kind != expected {
        return Err(unexpected(&token, message));
    }
    tokens.next();
    Ok(token)
}

pub(crate) fn unexpected(token: &Token, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(
        Phase::Parser,
        DiagnosticKind::UnexpectedToken,
        token.line,
        token.column,
        message,
    )
}

/// Allocates `node` and attaches it to `parent`.
pub(crate) fn push_node(cx: &mut Session, parent: NodeId, node: AstNode) -> NodeId {
    let id = cx.nodes.alloc(node);
    cx.nodes[parent].children.push(id);
    id
}
