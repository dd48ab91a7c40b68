//! Syntax tree model.
//!
//! Nodes are tagged with an [`AstRule`], optionally carry an interned value
//! (identifiers and literals always do), and reference their children through
//! arena handles. A tree is owned by the arena that allocated it; nodes are
//! never deep-copied and never shared across files.

use serde::Serialize;
use serde_json::{json, Value};

use crate::arena::{Arena, Handle};
use crate::intern::{Interner, Name};

pub type NodeId = Handle<AstNode>;

/// Grammar productions a node can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AstRule {
    #[default]
    Root,
    Package,
    Import,
    Function,
    Mod,
    Type,
    Arguments,
    Argument,
    Block,
    Declaration,
    ConstDeclaration,
    Expression,
    Arithmetic,
    Boolean,
    Call,
    PropAccess,
    Assignment,
    If,
    ElseIf,
    Else,
    For,
    From,
    To,
    In,
    Step,
    While,
    Return,
    Str,
    Num,
    Dec,
    Bool,
    Nothing,
    StringLiteral,
    NumberLiteral,
    DecimalLiteral,
    True,
    False,
    Identifier,
    Public,
    Ptr,
    Deref,
    Derive,
    Sum,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    And,
    Or,
}

/// One node of the parsed tree.
#[derive(Debug, Clone, Default)]
pub struct AstNode {
    pub rule: AstRule,
    pub value: Option<Name>,
    pub children: Vec<NodeId>,
    pub line: usize,
    pub column: usize,
}

impl AstNode {
    pub fn new(rule: AstRule) -> Self {
        AstNode {
            rule,
            ..Default::default()
        }
    }

    pub fn at(rule: AstRule, line: usize, column: usize) -> Self {
        AstNode {
            rule,
            line,
            column,
            ..Default::default()
        }
    }

    pub fn with_value(rule: AstRule, value: Name, line: usize, column: usize) -> Self {
        AstNode {
            rule,
            value: Some(value),
            line,
            column,
            ..Default::default()
        }
    }
}

/// Serializes the tree rooted at `node` for debugging output.
pub fn to_json(nodes: &Arena<AstNode>, interner: &Interner, node: NodeId) -> Value {
    let n = &nodes[node];
    let mut object = json!({ "rule": n.rule });
    if let Some(value) = n.value {
        object["value"] = json!(interner.resolve(value));
    }
    if n.line > 0 {
        object["line"] = json!(n.line);
        object["column"] = json!(n.column);
    }
    if !n.children.is_empty() {
        let children: Vec<Value> = n
            .children
            .iter()
            .map(|&child| to_json(nodes, interner, child))
            .collect();
        object["children"] = json!(children);
    }
    object
}
