//! # zxc
//!
//! Front-end pipeline for the ZX programming language: a statically-typed,
//! ahead-of-time compiled language whose sources use the `.zx` extension.
//!
//! The front end ingests ZX source text and produces a fully-structured,
//! cross-file symbol graph ready for the later semantic phases:
//!
//! 1. **Lexer** ([`lexer`]) - single-pass tokenizer over UTF-8 source text.
//! 2. **Parser** ([`parser`]) - recursive, precedence-aware parser producing
//!    a tagged syntax tree, with a queue-driven expression subparser.
//! 3. **Converter** ([`convert`]) - classifies each parsed tree into per-file
//!    declarations and loads transitively imported files.
//! 4. **Registry** ([`program`]) - hierarchical package map resolving dotted
//!    symbol paths across files.
//!
//! All tokens and tree nodes live in page-based object pools ([`arena`]) and
//! reference each other through typed handles.
//!
//! ## Quick start
//!
//! ```rust
//! use zxc::compile::compile_source;
//!
//! let out = compile_source("package demo;\nfun main() { return 0; }").unwrap();
//! assert_eq!(out.files.len(), 1);
//! ```

pub mod analysis;
pub mod arena;
pub mod ast;
pub mod cli;
pub mod compile;
pub mod config;
pub mod convert;
pub mod error;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod progress;
pub mod stream;
pub mod style;
pub mod token;

pub use compile::{compile_path, compile_source, Compilation, CompileOptions, Session};
pub use error::{Diagnostic, DiagnosticKind, Phase};
