//! Import graph behavior, exercised through real files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use zxc::compile::{compile_path, CompileOptions, Compilation};
use zxc::error::DiagnosticKind;
use zxc::progress::{Recording, SilentProgress};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn compile(entry: &Path) -> Result<Compilation, zxc::Diagnostic> {
    compile_path(entry, &CompileOptions::default(), &mut SilentProgress)
}

fn compile_with_stdlib(entry: &Path, stdlib: &Path) -> Result<Compilation, zxc::Diagnostic> {
    let options = CompileOptions {
        optimization: 3,
        stdlib: Some(stdlib.to_path_buf()),
    };
    compile_path(entry, &options, &mut SilentProgress)
}

#[test]
fn root_file_comes_first_and_records_its_import_edges() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "main.zx",
        "package app;\nimport \"util.zx\";\nfun main() { return seven(); }\n",
    );
    write(
        dir.path(),
        "util.zx",
        "package app;\npub fun seven() -> num { return 7; }\n",
    );

    let out = compile(&main).unwrap();
    assert_eq!(out.files.len(), 2);
    assert_eq!(out.files[0].imports, vec![1]);
    assert!(out.files[1].path.ends_with("util.zx"));

    let seven = out.session.interner.lookup("seven").unwrap();
    assert!(out.files[1].functions.contains_key(&seven));
}

#[test]
fn relative_imports_resolve_from_the_importing_file() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "main.zx",
        "package app;\nimport \"sub/inner.zx\";\nfun main() { return 0; }\n",
    );
    write(
        dir.path(),
        "sub/inner.zx",
        "package app.sub;\nimport \"peer.zx\";\nfun inner() { return 0; }\n",
    );
    write(
        dir.path(),
        "sub/peer.zx",
        "package app.sub;\nfun peer() { return 0; }\n",
    );

    let out = compile(&main).unwrap();
    assert_eq!(out.files.len(), 3);
    assert!(out.files[2].path.ends_with("peer.zx"));
    assert_eq!(out.files[1].imports, vec![2]);
}

#[test]
fn circular_import_reports_the_full_chain() {
    let dir = TempDir::new().unwrap();
    let a = write(
        dir.path(),
        "a.zx",
        "package app;\nimport \"b.zx\";\nfun a() { return 0; }\n",
    );
    write(
        dir.path(),
        "b.zx",
        "package app;\nimport \"a.zx\";\nfun b() { return 0; }\n",
    );

    let err = compile(&a).unwrap_err();
    let DiagnosticKind::CircularImport { chain } = &err.kind else {
        panic!("expected a circular import, got {:?}", err.kind);
    };
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.first(), chain.last());
    assert!(chain[0].ends_with("a.zx"));
    assert!(chain[1].ends_with("b.zx"));
}

#[test]
fn importing_the_same_file_twice_is_circular() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "main.zx",
        "package app;\nimport \"x.zx\";\nimport \"x.zx\";\nfun main() { return 0; }\n",
    );
    write(dir.path(), "x.zx", "package app;\nfun x() { return 0; }\n");

    let err = compile(&main).unwrap_err();
    assert!(matches!(err.kind, DiagnosticKind::CircularImport { .. }));
    assert_eq!(err.line, 3);
}

#[test]
fn stdlib_reimports_deduplicate_silently() {
    let dir = TempDir::new().unwrap();
    let stdlib = dir.path().join("stdlib");
    write(
        &stdlib,
        "io.zx",
        "package std.io;\npub fun print_line() { return 0; }\n",
    );

    let main = write(
        dir.path(),
        "main.zx",
        "package app;\nimport \"helper.zx\";\nimport \"@std/io\";\nfun main() { return 0; }\n",
    );
    write(
        dir.path(),
        "helper.zx",
        "package app;\nimport \"@std/io\";\nfun helper() { return 0; }\n",
    );

    let out = compile_with_stdlib(&main, &stdlib).unwrap();
    // helper, the stdlib file once, and the root.
    assert_eq!(out.files.len(), 3);

    let io_files: Vec<_> = out
        .files
        .iter()
        .filter(|f| f.path.ends_with("io.zx"))
        .collect();
    assert_eq!(io_files.len(), 1);

    // helper's duplicate @std import was dropped, not recorded as an edge.
    assert!(out.files[1].path.ends_with("helper.zx"));
    assert!(out.files[1].imports.is_empty());
}

#[test]
fn missing_import_is_an_io_error_at_the_import_statement() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "main.zx",
        "package app;\nimport \"ghost.zx\";\nfun main() { return 0; }\n",
    );

    let err = compile(&main).unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::Io);
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 9);
}

#[test]
fn parse_errors_in_imports_carry_the_imported_path() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "main.zx",
        "package app;\nimport \"broken.zx\";\nfun main() { return 0; }\n",
    );
    write(dir.path(), "broken.zx", "package app;\nfun () { return 0; }\n");

    let err = compile(&main).unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::UnexpectedToken);
    assert!(err.path.as_ref().unwrap().ends_with("broken.zx"));
    assert_eq!(err.line, 2);
}

#[test]
fn progress_posts_balance_across_an_import_graph() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "main.zx",
        "package app;\nimport \"util.zx\";\nfun main() { return 0; }\n",
    );
    write(dir.path(), "util.zx", "package app;\nfun util() { return 0; }\n");

    let mut recording = Recording::new();
    compile_path(&main, &CompileOptions::default(), &mut recording).unwrap();
    assert!(recording.balanced(), "events: {:?}", recording.events);
}

#[test]
fn progress_failure_balances_too() {
    let dir = TempDir::new().unwrap();
    let main = write(
        dir.path(),
        "main.zx",
        "package app;\nimport \"ghost.zx\";\nfun main() { return 0; }\n",
    );

    let mut recording = Recording::new();
    let err = compile_path(&main, &CompileOptions::default(), &mut recording).unwrap_err();
    assert_eq!(err.kind, DiagnosticKind::Io);
    assert!(recording.balanced(), "events: {:?}", recording.events);
}
