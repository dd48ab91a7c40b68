//! Program-wide symbol registry.
//!
//! Symbols from every converted file are merged into one hierarchical
//! package tree. A package maps names to [`Symbol`] entries, and a symbol is
//! exactly one of: a function, a module, a declaration or a sub-package.
//! Dotted paths resolve by descending one package per segment.
//!
//! Registration is idempotent: reserving a name that already holds a symbol
//! of the same kind returns the existing handle, which is how sibling files
//! declaring the same package merge their contents.

use std::collections::HashMap;

use crate::arena::{Arena, Handle};
use crate::ast::NodeId;
use crate::compile::Session;
use crate::convert::{Declaration, FileCode, FunctionId, ModId};
use crate::error::{Diagnostic, DiagnosticKind, Phase};
use crate::intern::{Interner, Name};

pub type SymbolId = Handle<Symbol>;
pub type PackageId = Handle<Package>;
pub type DeclId = Handle<Declaration>;

/// A named entity reachable from the package tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Function(FunctionId),
    Module(ModId),
    Declaration(DeclId),
    Package(PackageId),
}

impl Symbol {
    pub fn kind(&self) -> &'static str {
        match self {
            Symbol::Function(_) => "function",
            Symbol::Module(_) => "module",
            Symbol::Declaration(_) => "declaration",
            Symbol::Package(_) => "package",
        }
    }

    fn same_kind(&self, other: &Symbol) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// What a dotted path is expected to name at its terminal segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTarget {
    Package,
    Module,
}

#[derive(Debug, Default)]
pub struct Package {
    pub entries: HashMap<Name, SymbolId>,
}

/// The assembled symbol graph of a compilation.
pub struct Program {
    packages: Arena<Package>,
    symbols: Arena<Symbol>,
    /// Declaration records registered directly with the program; mod-level
    /// declarations stay on their [`crate::convert::ModDef`].
    pub declarations: Arena<Declaration>,
    root: PackageId,
    current: PackageId,
}

impl Program {
    pub fn new() -> Self {
        let mut packages = Arena::new();
        let root = packages.alloc(Package::default());
        Program {
            packages,
            symbols: Arena::new(),
            declarations: Arena::new(),
            root,
            current: root,
        }
    }

    pub fn root(&self) -> PackageId {
        self.root
    }

    /// The package the most recent [`Program::new_pkg`] selected.
    pub fn current(&self) -> PackageId {
        self.current
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id]
    }

    pub fn symbol(&self, id: SymbolId) -> Symbol {
        self.symbols[id]
    }

    /// Ensures every prefix of `path` exists as a package, makes the
    /// terminal package current, and returns it. Idempotent.
    pub fn new_pkg(&mut self, path: &[Name], interner: &Interner) -> Result<PackageId, Diagnostic> {
        let mut pkg = self.root;
        for &segment in path {
            pkg = match self.packages[pkg].entries.get(&segment).copied() {
                Some(existing) => match self.symbols[existing] {
                    Symbol::Package(p) => p,
                    other => {
                        return Err(registry_error(
                            DiagnosticKind::SymbolMismatch,
                            format!(
                                "`{}` already names a {}, not a package",
                                interner.resolve(segment),
                                other.kind()
                            ),
                        ));
                    }
                },
                None => {
                    let p = self.packages.alloc(Package::default());
                    let symbol = self.symbols.alloc(Symbol::Package(p));
                    self.packages[pkg].entries.insert(segment, symbol);
                    p
                }
            };
        }
        self.current = pkg;
        Ok(pkg)
    }

    /// Reserves `name` in the current package. An existing entry of the same
    /// kind is returned untouched; a different kind is a mismatch.
    pub fn set(
        &mut self,
        name: Name,
        symbol: Symbol,
        interner: &Interner,
    ) -> Result<SymbolId, Diagnostic> {
        if let Some(&existing) = self.packages[self.current].entries.get(&name) {
            if self.symbols[existing].same_kind(&symbol) {
                return Ok(existing);
            }
            return Err(registry_error(
                DiagnosticKind::SymbolMismatch,
                format!(
                    "`{}` already names a {}",
                    interner.resolve(name),
                    self.symbols[existing].kind()
                ),
            ));
        }

        let id = self.symbols.alloc(symbol);
        self.packages[self.current].entries.insert(name, id);
        Ok(id)
    }

    /// Looks `name` up in the current package.
    pub fn resolve(&self, name: Name, interner: &Interner) -> Result<SymbolId, Diagnostic> {
        self.packages[self.current]
            .entries
            .get(&name)
            .copied()
            .ok_or_else(|| {
                registry_error(
                    DiagnosticKind::SymbolNotFound,
                    format!("`{}` is not defined in this package", interner.resolve(name)),
                )
            })
    }

    pub fn resolve_function(
        &self,
        name: Name,
        interner: &Interner,
    ) -> Result<FunctionId, Diagnostic> {
        match self.symbols[self.resolve(name, interner)?] {
            Symbol::Function(f) => Ok(f),
            other => Err(kind_mismatch(interner, name, "function", other)),
        }
    }

    pub fn resolve_module(&self, name: Name, interner: &Interner) -> Result<ModId, Diagnostic> {
        match self.symbols[self.resolve(name, interner)?] {
            Symbol::Module(m) => Ok(m),
            other => Err(kind_mismatch(interner, name, "module", other)),
        }
    }

    pub fn resolve_declaration(&self, name: Name, interner: &Interner) -> Result<DeclId, Diagnostic> {
        match self.symbols[self.resolve(name, interner)?] {
            Symbol::Declaration(d) => Ok(d),
            other => Err(kind_mismatch(interner, name, "declaration", other)),
        }
    }

    /// Walks a dotted PACKAGE node, descending one package per segment.
    ///
    /// Intermediate segments must resolve to packages; the terminal must
    /// match `target`.
    pub fn resolve_path(
        &self,
        cx: &Session,
        package_node: NodeId,
        target: PathTarget,
    ) -> Result<SymbolId, Diagnostic> {
        let segments = cx.nodes[package_node].children.clone();
        let mut pkg = self.root;

        for (i, &segment) in segments.iter().enumerate() {
            let node = &cx.nodes[segment];
            let name = node.value.expect("package segments carry their identifier");
            let last = i + 1 == segments.len();

            let Some(&symbol_id) = self.packages[pkg].entries.get(&name) else {
                return Err(Diagnostic::new(
                    Phase::Registry,
                    DiagnosticKind::SymbolNotFound,
                    node.line,
                    node.column,
                    format!("`{}` is not defined", cx.interner.resolve(name)),
                ));
            };

            match self.symbols[symbol_id] {
                Symbol::Package(p) => {
                    if last {
                        return match target {
                            PathTarget::Package => Ok(symbol_id),
                            PathTarget::Module => Err(path_mismatch(cx, node, name, "a package")),
                        };
                    }
                    pkg = p;
                }
                Symbol::Module(_) => {
                    if last && target == PathTarget::Module {
                        return Ok(symbol_id);
                    }
                    return Err(path_mismatch(cx, node, name, "a module"));
                }
                other => return Err(path_mismatch(cx, node, name, other.kind())),
            }
        }

        Err(registry_error(
            DiagnosticKind::SymbolNotFound,
            "empty package path",
        ))
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges every file's package chain, functions and modules into one
/// [`Program`].
pub fn assemble(cx: &Session, files: &[FileCode]) -> Result<Program, Diagnostic> {
    let mut program = Program::new();
    for file in files {
        program.new_pkg(&file.package, &cx.interner)?;
        for (&name, &fun) in &file.functions {
            program.set(name, Symbol::Function(fun), &cx.interner)?;
        }
        for (&name, &module) in &file.modules {
            program.set(name, Symbol::Module(module), &cx.interner)?;
        }
    }
    Ok(program)
}

fn registry_error(kind: DiagnosticKind, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(Phase::Registry, kind, 0, 0, message)
}

fn kind_mismatch(interner: &Interner, name: Name, wanted: &str, got: Symbol) -> Diagnostic {
    registry_error(
        DiagnosticKind::SymbolMismatch,
        format!(
            "`{}` is a {}, not a {}",
            interner.resolve(name),
            got.kind(),
            wanted
        ),
    )
}

fn path_mismatch(
    cx: &Session,
    node: &crate::ast::AstNode,
    name: Name,
    got: &str,
) -> Diagnostic {
    Diagnostic::new(
        Phase::Registry,
        DiagnosticKind::SymbolMismatch,
        node.line,
        node.column,
        format!("`{}` is {} here", cx.interner.resolve(name), got),
    )
}
