//! End-to-end front-end pipeline.
//!
//! source text → lex → parse → convert (loading imports) → assemble the
//! symbol registry. Everything is synchronous and single-threaded; each
//! phase either finishes or aborts the compilation with one diagnostic.

use std::fs;
use std::path::{Path, PathBuf};

use crate::arena::Arena;
use crate::ast::AstNode;
use crate::config;
use crate::convert::{self, FileCode, Function, ModDef};
use crate::error::{Diagnostic, DiagnosticKind, Phase};
use crate::intern::Interner;
use crate::lexer;
use crate::parser;
use crate::program::{self, Program};
use crate::progress::{Progress, SilentProgress};
use crate::token::Token;

/// Shared allocation state of one compilation: the interner plus one arena
/// per pooled object kind. Tokens and tree nodes from every file live here
/// until the whole compilation is dropped.
pub struct Session {
    pub interner: Interner,
    pub tokens: Arena<Token>,
    pub nodes: Arena<AstNode>,
    pub functions: Arena<Function>,
    pub modules: Arena<ModDef>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            interner: Interner::new(),
            tokens: Arena::new(),
            nodes: Arena::new(),
            functions: Arena::new(),
            modules: Arena::new(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Optimization level requested on the command line; the front end only
    /// carries it through to the later phases.
    pub optimization: u32,
    /// Overrides the configured standard-library root.
    pub stdlib: Option<PathBuf>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            optimization: 3,
            stdlib: None,
        }
    }
}

/// A fully converted front-end result: one [`FileCode`] per loaded file
/// (root first), the assembled symbol registry, and the session owning every
/// token and node they reference.
pub struct Compilation {
    pub session: Session,
    pub files: Vec<FileCode>,
    pub program: Program,
}

impl std::fmt::Debug for Compilation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compilation")
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

/// Compiles the file at `path` and everything it imports.
///
/// A directory path is resolved to its `main.zx`.
pub fn compile_path(
    path: &Path,
    options: &CompileOptions,
    progress: &mut dyn Progress,
) -> Result<Compilation, Diagnostic> {
    progress.post("Reading", 1, 0);

    let entry = if path.is_dir() {
        path.join(format!("main.{}", config::SOURCE_EXTENSION))
    } else {
        path.to_path_buf()
    };

    let canonical = fs::canonicalize(&entry).map_err(|e| {
        let message = format!("cannot open `{}`: {}", entry.display(), e);
        progress.fail(&message);
        Diagnostic::new(Phase::Converter, DiagnosticKind::Io, 0, 0, message)
    })?;

    let content = fs::read_to_string(&canonical).map_err(|e| {
        let message = format!("cannot read `{}`: {}", canonical.display(), e);
        progress.fail(&message);
        Diagnostic::new(Phase::Converter, DiagnosticKind::Io, 0, 0, message)
    })?;
    progress.advance();
    progress.complete();

    run_pipeline(canonical, content, options, progress)
}

/// Compiles in-memory source. Relative imports resolve against the current
/// directory.
pub fn compile_source(source: &str) -> Result<Compilation, Diagnostic> {
    run_pipeline(
        PathBuf::from(format!("main.{}", config::SOURCE_EXTENSION)),
        source.to_string(),
        &CompileOptions::default(),
        &mut SilentProgress,
    )
}

fn run_pipeline(
    path: PathBuf,
    content: String,
    options: &CompileOptions,
    progress: &mut dyn Progress,
) -> Result<Compilation, Diagnostic> {
    let mut session = Session::new();

    progress.post("Lexing", 1, 0);
    let mut tokens = match lexer::lex(&content, &mut session) {
        Ok(tokens) => tokens,
        Err(diag) => {
            progress.fail(&diag.message);
            return Err(diag.with_path(path));
        }
    };
    progress.advance();
    progress.complete();

    progress.post("Parsing", 1, 0);
    let root = match parser::parse(&mut session, &mut tokens) {
        Ok(root) => root,
        Err(diag) => {
            progress.fail(&diag.message);
            return Err(diag.with_path(path));
        }
    };
    progress.advance();
    progress.complete();

    progress.post("Processing", 1, 0);
    let stdlib = options
        .stdlib
        .clone()
        .unwrap_or_else(|| config::stdlib_root().to_path_buf());
    let files = match convert::convert(&mut session, root, path, content, &stdlib, progress) {
        Ok(files) => files,
        Err(diag) => {
            progress.fail(&diag.message);
            return Err(diag);
        }
    };

    let program = match program::assemble(&session, &files) {
        Ok(program) => program,
        Err(diag) => {
            progress.fail(&diag.message);
            return Err(diag);
        }
    };
    progress.advance();
    progress.complete();

    Ok(Compilation {
        session,
        files,
        program,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::BaseKind;

    #[test]
    fn compile_source_builds_one_file_with_its_function() {
        let out = compile_source("package demo;\nfun main() { return 0; }").unwrap();
        assert_eq!(out.files.len(), 1);
        let file = &out.files[0];
        assert_eq!(file.package.len(), 1);
        assert_eq!(out.session.interner.resolve(file.package[0]), "demo");
        assert_eq!(file.functions.len(), 1);
        assert!(file.imports.is_empty());
    }

    #[test]
    fn function_records_carry_args_and_return_type() {
        let out = compile_source(
            "package demo;\n\
             pub fun add(a: num, b: num) -> num { return a + b; }",
        )
        .unwrap();
        let file = &out.files[0];
        let name = out.session.interner.lookup("add").unwrap();
        let fun = &out.session.functions[file.functions[&name]];

        assert!(fun.public);
        assert_eq!(fun.args.len(), 2);
        assert_eq!(out.session.interner.resolve(fun.args[0].0), "a");
        assert_eq!(out.session.interner.resolve(fun.args[1].0), "b");
        assert_eq!(fun.args[0].1.base, BaseKind::Num);
        assert_eq!(fun.return_type.as_ref().unwrap().base, BaseKind::Num);
    }

    #[test]
    fn missing_return_type_reads_as_nothing() {
        let out = compile_source("package demo; fun side_effect() { return 0; }").unwrap();
        let file = &out.files[0];
        let name = out.session.interner.lookup("side_effect").unwrap();
        let fun = &out.session.functions[file.functions[&name]];
        assert!(fun.return_type.is_none());
    }

    #[test]
    fn registry_holds_the_compiled_symbols() {
        let out = compile_source(
            "package app.core;\n\
             fun main() { return 0; }\n\
             mod counter { let count: num = 0; }",
        )
        .unwrap();
        let interner = &out.session.interner;
        let main = interner.lookup("main").unwrap();
        assert!(out.program.resolve_function(main, interner).is_ok());
        let counter = interner.lookup("counter").unwrap();
        assert!(out.program.resolve_module(counter, interner).is_ok());
    }

    #[test]
    fn compilation_is_deterministic() {
        let source = "package demo;\n\
                      mod state { derive Printable; let x: num = 1; }\n\
                      fun main() { return state.x; }";
        let a = compile_source(source).unwrap();
        let b = compile_source(source).unwrap();

        assert_eq!(a.files.len(), b.files.len());
        for (fa, fb) in a.files.iter().zip(b.files.iter()) {
            let names = |out: &Compilation, file: &FileCode| {
                let mut v: Vec<String> = file
                    .functions
                    .keys()
                    .chain(file.modules.keys())
                    .map(|&n| out.session.interner.resolve(n).to_string())
                    .collect();
                v.sort();
                v
            };
            assert_eq!(names(&a, fa), names(&b, fb));
            assert_eq!(fa.package.len(), fb.package.len());
        }
    }

    #[test]
    fn lex_errors_surface_with_the_file_path() {
        let err = compile_source("package demo; let @@ = 1;").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UnknownToken);
        assert!(err.path.is_some());
    }
}
