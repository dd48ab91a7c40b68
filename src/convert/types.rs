//! TYPE subtree to structured [`Type`] conversion.

use crate::ast::{AstRule, NodeId};
use crate::compile::Session;

use super::{BaseKind, Type};

/// Converts a TYPE node: leading PTR children become the pointer count, the
/// base child picks the [`BaseKind`], and the base's nested TYPE children
/// become generic parameters.
pub(crate) fn convert_type(cx: &Session, node: NodeId) -> Type {
    let mut ty = Type::default();

    let children = &cx.nodes[node].children;
    let mut index = 0;
    while index < children.len() && cx.nodes[children[index]].rule == AstRule::Ptr {
        ty.pointers += 1;
        index += 1;
    }

    let Some(&base) = children.get(index) else {
        // A pruned, empty type reads as `nothing`.
        return ty;
    };

    ty.base = match cx.nodes[base].rule {
        AstRule::Str => BaseKind::Str,
        AstRule::Num => BaseKind::Num,
        AstRule::Dec => BaseKind::Dec,
        AstRule::Bool => BaseKind::Bool,
        AstRule::Nothing => BaseKind::Nothing,
        _ => {
            ty.name = cx.nodes[base].value;
            BaseKind::UserDefined
        }
    };

    for &nested in &cx.nodes[base].children {
        ty.children.push(convert_type(cx, nested));
    }

    ty
}
