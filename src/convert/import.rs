//! Import scheduling and cycle detection.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ast::NodeId;
use crate::compile::Session;
use crate::error::{Diagnostic, DiagnosticKind, Phase};
use crate::lexer;
use crate::parser;
use crate::progress::Progress;

use super::QueueItem;

/// Resolves one IMPORT node and schedules the target file for conversion.
///
/// Path forms: `@std/foo/bar` rebases under the standard-library root and
/// gains the `.zx` extension; absolute paths are taken as-is; anything else
/// is joined to the importing file's directory. The canonical path is the
/// cycle-detection key: a repeat of a standard-library file deduplicates
/// silently, any other repeat is a circular import.
///
/// Returns the scheduled file's index, or `None` for a deduplicated
/// standard-library import.
#[allow(clippy::too_many_arguments)]
pub(crate) fn schedule(
    cx: &mut Session,
    node: NodeId,
    from: &Path,
    dir: &Path,
    stdlib: &Path,
    chain: &mut Vec<PathBuf>,
    queue: &mut VecDeque<QueueItem>,
    next_index: &mut usize,
    progress: &mut dyn Progress,
) -> Result<Option<usize>, Diagnostic> {
    let (line, column) = {
        let n = &cx.nodes[node];
        (n.line, n.column)
    };
    let requested = cx
        .interner
        .resolve(cx.nodes[node].value.expect("import nodes carry their path"))
        .to_string();

    progress.post(&requested, 3, 1);

    let mut is_std = false;
    let resolved = if let Some(rest) = requested.strip_prefix("@std/") {
        is_std = true;
        stdlib.join(format!("{}.zx", rest))
    } else if Path::new(&requested).is_absolute() {
        PathBuf::from(&requested)
    } else {
        dir.join(&requested)
    };

    let canonical = match fs::canonicalize(&resolved) {
        Ok(path) => path,
        Err(e) => {
            let message = format!("cannot resolve import `{}`: {}", requested, e);
            progress.fail(&message);
            return Err(Diagnostic::new(Phase::Converter, DiagnosticKind::Io, line, column, message)
                .with_path(from.to_path_buf()));
        }
    };

    if chain.contains(&canonical) {
        if is_std {
            // The standard library may be imported from anywhere; later
            // imports just reuse the already-scheduled file.
            progress.complete();
            return Ok(None);
        }

        progress.fail("circular import detected");
        let mut full_chain = chain.clone();
        full_chain.push(canonical);
        return Err(Diagnostic::new(
            Phase::Converter,
            DiagnosticKind::CircularImport { chain: full_chain },
            line,
            column,
            format!("`{}` is already part of the import chain", requested),
        )
        .with_path(from.to_path_buf()));
    }
    chain.push(canonical.clone());

    let content = match fs::read_to_string(&canonical) {
        Ok(content) => content,
        Err(e) => {
            let message = format!("cannot read `{}`: {}", canonical.display(), e);
            progress.fail(&message);
            return Err(Diagnostic::new(Phase::Converter, DiagnosticKind::Io, line, column, message)
                .with_path(from.to_path_buf()));
        }
    };
    progress.advance();

    let mut tokens = match lexer::lex(&content, cx) {
        Ok(tokens) => tokens,
        Err(diag) => {
            progress.fail(&diag.message);
            return Err(diag.with_path(canonical));
        }
    };
    progress.advance();

    let root = match parser::parse(cx, &mut tokens) {
        Ok(root) => root,
        Err(diag) => {
            progress.fail(&diag.message);
            return Err(diag.with_path(canonical));
        }
    };
    progress.advance();
    progress.complete();

    let index = *next_index;
    *next_index += 1;
    let parent = canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    queue.push_back(QueueItem {
        root,
        dir: parent,
        path: canonical,
        content,
    });

    Ok(Some(index))
}
