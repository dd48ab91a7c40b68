//! Variable declarations: `let name: type = expr;` and the `const` form.

use crate::ast::{AstNode, AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::lexer::TokenId;
use crate::stream::Stream;
use crate::token::TokenKind;

use super::expr::{self, ExprEnd};
use super::{expect, push_node, types};

/// Parses a declaration after its `let`/`const` keyword has been consumed.
///
/// Emits (CONST_)DECLARATION with children `IDENTIFIER TYPE EXPRESSION`. The
/// initializer runs to the terminating `;`.
pub(crate) fn declaration(
    cx: &mut Session,
    tokens: &mut Stream<TokenId>,
    parent: NodeId,
    is_const: bool,
) -> Result<(), Diagnostic> {
    let ident = expect(
        cx,
        tokens,
        TokenKind::Identifier,
        "expected a name after the declaration keyword",
    )?;

    let rule = if is_const {
        AstRule::ConstDeclaration
    } else {
        AstRule::Declaration
    };
    let decl = push_node(cx, parent, AstNode::at(rule, ident.line, ident.column));

    push_node(
        cx,
        decl,
        AstNode::with_value(
            AstRule::Identifier,
            ident.value.expect("identifier token carries a value"),
            ident.line,
            ident.column,
        ),
    );

    expect(cx, tokens, TokenKind::Colon, "expected `:` before the declared type")?;
    types::type_rule(cx, tokens, decl, &ident)?;
    expect(cx, tokens, TokenKind::Equals, "expected `=` after the declared type")?;

    expr::expression(cx, decl, tokens, ExprEnd::Semicolon, &ident)
}
