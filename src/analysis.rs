//! Semantic analysis entry point.
//!
//! The front end stops at the symbol graph; this module only fixes the order
//! the next phase will walk it in. Files are visited imports-first, so by the
//! time a file is analyzed every symbol it can reference has been seen.

use crate::compile::Compilation;
use crate::convert::FileCode;
use crate::error::Diagnostic;

/// Runs the (not yet implemented) semantic checks over a compilation.
pub fn analyze(compilation: &Compilation) -> Result<(), Diagnostic> {
    for &index in &dependency_order(&compilation.files) {
        let _file = &compilation.files[index];
        // Type checking and the later passes hook in here.
    }
    Ok(())
}

/// Returns file indices in dependency order: every file's imports come
/// before the file itself. The root file is always last.
pub fn dependency_order(files: &[FileCode]) -> Vec<usize> {
    let mut order = Vec::with_capacity(files.len());
    let mut visited = vec![false; files.len()];
    // Iterative post-order over the import edges.
    let mut stack: Vec<(usize, usize)> = vec![(0, 0)];

    while let Some(&(index, child)) = stack.last() {
        if visited[index] {
            stack.pop();
            continue;
        }
        let imports = &files[index].imports;
        if child < imports.len() {
            stack.last_mut().expect("stack is non-empty").1 += 1;
            let next = imports[child];
            if !visited[next] {
                stack.push((next, 0));
            }
        } else {
            visited[index] = true;
            order.push(index);
            stack.pop();
        }
    }

    // Files unreachable from the root (deduplicated stdlib entries keep their
    // slot) still get analyzed, after everything else they feed.
    for index in 0..files.len() {
        if !visited[index] {
            order.push(index);
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    use crate::ast::{AstNode, AstRule};
    use crate::compile::Session;

    fn file_with_imports(cx: &mut Session, imports: Vec<usize>) -> FileCode {
        FileCode {
            path: PathBuf::from("x.zx"),
            content: String::new(),
            package: Vec::new(),
            imports,
            functions: HashMap::new(),
            modules: HashMap::new(),
            root: cx.nodes.alloc(AstNode::new(AstRule::Root)),
        }
    }

    #[test]
    fn imports_come_before_their_importer() {
        let mut cx = Session::new();
        // 0 imports 1 and 2; 1 imports 2.
        let files = vec![
            file_with_imports(&mut cx, vec![1, 2]),
            file_with_imports(&mut cx, vec![2]),
            file_with_imports(&mut cx, vec![]),
        ];
        let order = dependency_order(&files);
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn single_file_orders_trivially() {
        let mut cx = Session::new();
        let files = vec![file_with_imports(&mut cx, vec![])];
        assert_eq!(dependency_order(&files), vec![0]);
    }
}
