//! File-code conversion.
//!
//! The converter walks a parsed tree and classifies its top-level children
//! into a [`FileCode`] record: the package chain, the function map and the
//! module map. Imports are not walked recursively; they are scheduled on a
//! work queue, so the converter loads the whole transitive import graph one
//! file at a time. The root file is always first in the returned list, and
//! every import edge is recorded by index so later phases can iterate files
//! in dependency order.
//!
//! A file's `content` owns the text that every span under its tree points
//! into, so records must outlive their trees; both live for the compilation.

pub(crate) mod function;
pub(crate) mod import;
pub(crate) mod module;
pub(crate) mod types;

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::arena::Handle;
use crate::ast::{AstRule, NodeId};
use crate::compile::Session;
use crate::error::Diagnostic;
use crate::intern::Name;
use crate::progress::Progress;

pub type FunctionId = Handle<Function>;
pub type ModId = Handle<ModDef>;

/// Per-file record of declarations, after the tree has been classified.
#[derive(Debug)]
pub struct FileCode {
    pub path: PathBuf,
    pub content: String,
    /// Segments of the file's dotted package name.
    pub package: Vec<Name>,
    /// Indices into the converter's output of every file this one imports.
    pub imports: Vec<usize>,
    pub functions: HashMap<Name, FunctionId>,
    pub modules: HashMap<Name, ModId>,
    pub root: NodeId,
}

/// A converted function declaration.
#[derive(Debug)]
pub struct Function {
    pub public: bool,
    /// Arguments in declaration order.
    pub args: Vec<(Name, Type)>,
    /// `None` means the function returns `nothing`.
    pub return_type: Option<Type>,
    pub body: NodeId,
}

/// A converted mod (namespace) declaration.
#[derive(Debug, Default)]
pub struct ModDef {
    pub public: bool,
    /// Every DERIVE node of the mod body, in source order.
    pub derives: Vec<NodeId>,
    pub declarations: HashMap<Name, Declaration>,
    pub functions: HashMap<Name, FunctionId>,
}

/// A `let`/`const` member of a mod.
#[derive(Debug)]
pub struct Declaration {
    pub is_const: bool,
    /// The derive annotation directly preceding this declaration, if any.
    pub derive: Option<NodeId>,
    pub decl_type: Type,
    /// The initializer EXPRESSION node.
    pub value: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseKind {
    Str,
    Num,
    Dec,
    Bool,
    #[default]
    Nothing,
    UserDefined,
}

/// A structured type annotation. `children` captures generic parameters;
/// `name` is set for user-defined bases only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Type {
    pub pointers: u32,
    pub base: BaseKind,
    pub name: Option<Name>,
    pub children: Vec<Type>,
}

struct QueueItem {
    root: NodeId,
    dir: PathBuf,
    path: PathBuf,
    content: String,
}

/// Converts the root file and everything it transitively imports.
///
/// `root_path` must already be canonical; `stdlib` is the directory `@std/`
/// imports resolve under.
pub fn convert(
    cx: &mut Session,
    root: NodeId,
    root_path: PathBuf,
    root_content: String,
    stdlib: &Path,
    progress: &mut dyn Progress,
) -> Result<Vec<FileCode>, Diagnostic> {
    let mut files: Vec<FileCode> = Vec::new();
    let mut queue: VecDeque<QueueItem> = VecDeque::new();
    // Canonical paths of every file ever scheduled; a second non-stdlib
    // appearance is a circular import.
    let mut chain: Vec<PathBuf> = vec![root_path.clone()];
    let mut next_index = 1usize;

    let dir = root_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    queue.push_back(QueueItem {
        root,
        dir,
        path: root_path,
        content: root_content,
    });

    while let Some(item) = queue.pop_front() {
        let mut file = FileCode {
            path: item.path,
            content: item.content,
            package: Vec::new(),
            imports: Vec::new(),
            functions: HashMap::new(),
            modules: HashMap::new(),
            root: item.root,
        };

        let children = cx.nodes[item.root].children.clone();
        for child in children {
            match cx.nodes[child].rule {
                AstRule::Package => {
                    file.package = cx.nodes[child]
                        .children
                        .iter()
                        .map(|&segment| {
                            cx.nodes[segment]
                                .value
                                .expect("package segments carry their identifier")
                        })
                        .collect();
                }

                AstRule::Import => {
                    let scheduled = import::schedule(
                        cx,
                        child,
                        &file.path,
                        &item.dir,
                        stdlib,
                        &mut chain,
                        &mut queue,
                        &mut next_index,
                        progress,
                    )?;
                    if let Some(index) = scheduled {
                        file.imports.push(index);
                    }
                }

                AstRule::Function => {
                    function::convert(cx, child, &mut file.functions)?;
                }

                AstRule::Mod => {
                    module::convert(cx, child, &mut file.modules)?;
                }

                // The parser only emits the rules above at the top level.
                _ => {}
            }
        }

        files.push(file);
    }

    Ok(files)
}
