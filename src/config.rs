//! Process-wide configuration.

use std::env;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

/// Directory `@std/` imports resolve under.
///
/// Resolution order: the `ZX_STDLIB` environment variable, a `stdlib`
/// directory next to the running executable, then `./stdlib`. Computed once
/// per process; pass an explicit root through
/// [`crate::compile::CompileOptions`] to override per call.
static STDLIB_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    if let Ok(dir) = env::var("ZX_STDLIB") {
        return PathBuf::from(dir);
    }
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join("stdlib");
            if candidate.is_dir() {
                return candidate;
            }
        }
    }
    PathBuf::from("stdlib")
});

pub fn stdlib_root() -> &'static Path {
    &STDLIB_ROOT
}

/// Extension of ZX source files.
pub const SOURCE_EXTENSION: &str = "zx";
