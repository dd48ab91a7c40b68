//! FUNCTION subtree to [`Function`] record conversion.

use std::collections::HashMap;

use crate::ast::{AstRule, NodeId};
use crate::compile::Session;
use crate::error::{Diagnostic, DiagnosticKind, Phase};
use crate::intern::Name;

use super::{types, Function, FunctionId};

/// Builds a [`Function`] from a FUNCTION node and inserts it by name.
///
/// Children are classified by rule: PUBLIC flips visibility, the IDENTIFIER
/// is the name, ARGUMENTS yields the ordered argument list, TYPE is the
/// return annotation and BLOCK is the body. A later function with the same
/// name replaces the earlier one.
pub(crate) fn convert(
    cx: &mut Session,
    node: NodeId,
    map: &mut HashMap<Name, FunctionId>,
) -> Result<(), Diagnostic> {
    let mut public = false;
    let mut name: Option<Name> = None;
    let mut args: Vec<(Name, super::Type)> = Vec::new();
    let mut return_type: Option<super::Type> = None;
    let mut body: Option<NodeId> = None;

    let children = cx.nodes[node].children.clone();
    for child in children {
        match cx.nodes[child].rule {
            AstRule::Public => public = true,
            AstRule::Identifier => name = cx.nodes[child].value,
            AstRule::Arguments => {
                let arg_nodes = cx.nodes[child].children.clone();
                for arg in arg_nodes {
                    let parts = cx.nodes[arg].children.clone();
                    let (Some(&ident), Some(&ty)) = (parts.first(), parts.get(1)) else {
                        return Err(malformed(cx, node, "malformed function argument"));
                    };
                    let arg_name = cx.nodes[ident]
                        .value
                        .expect("argument names carry their identifier");
                    args.push((arg_name, types::convert_type(cx, ty)));
                }
            }
            AstRule::Type => return_type = Some(types::convert_type(cx, child)),
            AstRule::Block => body = Some(child),
            _ => {}
        }
    }

    let (Some(name), Some(body)) = (name, body) else {
        return Err(malformed(cx, node, "malformed function declaration"));
    };

    let id = cx.functions.alloc(Function {
        public,
        args,
        return_type,
        body,
    });
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
