//! MOD subtree to [`ModDef`] record conversion.

use std::collections::HashMap;

use crate::ast::{AstRule, NodeId};
use crate::compile::Session;
use crate::error::{Diagnostic, DiagnosticKind, Phase};
use crate::intern::Name;

use super::{function, types, Declaration, ModDef, ModId};

/// Builds a [`ModDef`] from a MOD node and inserts it by name.
///
/// A DERIVE child attaches to exactly the next declaration; the parser
/// guarantees no derive is left trailing.
pub(crate) fn convert(
    cx: &mut Session,
    node: NodeId,
    map: &mut HashMap<Name, ModId>,
) -> Result<(), Diagnostic> {
    let mut def = ModDef::default();
    let mut name: Option<Name> = None;
    let mut pending_derive: Option<NodeId> = None;

    let children = cx.nodes[node].children.clone();
    for child in children {
        match cx.nodes[child].rule {
            AstRule::Public => def.public = true,

            AstRule::Identifier if name.is_none() => name = cx.nodes[child].value,

            AstRule::Derive => {
                def.derives.push(child);
                pending_derive = Some(child);
            }

            AstRule::Declaration | AstRule::ConstDeclaration => {
                let is_const = cx.nodes[child].rule == AstRule::ConstDeclaration;
                let parts = cx.nodes[child].children.clone();
                let (Some(&ident), Some(&ty), Some(&value)) =
                    (parts.first(), parts.get(1), parts.get(2))
                else {
                    return Err(malformed(cx, node, "malformed declaration in mod body"));
                };
                let decl_name = cx.nodes[ident]
                    .value
                    .expect("declaration names carry their identifier");
                def.declarations.insert(
                    decl_name,
                    Declaration {
                        is_const,
                        derive: pending_derive.take(),
                        decl_type: types::convert_type(cx, ty),
                        value,
                    },
                );
            }

            AstRule::Function => {
                function::convert(cx, child, &mut def.functions)?;
            }

            _ => {}
        }
    }

    let Some(name) = name else {
        return Err(malformed(cx, node, "malformed mod declaration"));
    };

    let id = cx.modules.alloc(def);
    map.insert(name, id);
    Ok(())
}

fn malformed(cx: &Session, node: NodeId, message: &str) -> Diagnostic {
    let n = &cx.nodes[node];
    Diagnostic::new(
        Phase::Converter,
        DiagnosticKind::UnexpectedToken,
        n.line,
        n.column,
        message,
    )
}
