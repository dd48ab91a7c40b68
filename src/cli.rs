//! Command-line driver.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::analysis;
use crate::ast;
use crate::compile::{self, CompileOptions};
use crate::error::Diagnostic;
use crate::progress::TermProgress;
use crate::style::Style;

const APP_NAME: &str = "The ZX Programming Language";
const APP_DESC: &str = "a fast, statically-typed, ahead-of-time compiled language";

#[derive(Parser)]
#[command(name = "zxc")]
#[command(about = APP_DESC, long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a ZX project
    #[command(visible_alias = "c")]
    Compile {
        /// Entry file or project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Optimization level handed to the later phases
        #[arg(long, short = 'O', default_value_t = 3)]
        optimization: u32,

        /// Print the root file's parsed tree as JSON
        #[arg(long)]
        emit_ast: bool,
    },

    /// Compile and run a ZX project
    #[command(visible_alias = "r")]
    Run {
        /// Entry file or project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Optimization level handed to the later phases
        #[arg(long, short = 'O', default_value_t = 3)]
        optimization: u32,
    },

    /// Check a ZX project for errors without producing output
    Check {
        /// Entry file or project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Entry point for the CLI.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            path,
            optimization,
            emit_ast,
        } => cmd_compile(&path, optimization, emit_ast),
        Commands::Run { path, optimization } => cmd_run(&path, optimization),
        Commands::Check { path } => cmd_check(&path),
    }
}

fn banner() {
    println!("{}", Style::bold_bright_blue(APP_NAME));
    println!("{}\n", Style::bright_black(APP_DESC));
}

fn cmd_compile(path: &Path, optimization: u32, emit_ast: bool) -> Result<(), Box<dyn std::error::Error>> {
    banner();

    let options = CompileOptions {
        optimization,
        stdlib: None,
    };
    let mut progress = TermProgress::new();

    match compile::compile_path(path, &options, &mut progress) {
        Ok(out) => {
            if emit_ast {
                let root = out.files[0].root;
                let tree = ast::to_json(&out.session.nodes, &out.session.interner, root);
                println!("{}", serde_json::to_string_pretty(&tree)?);
            }
            Ok(())
        }
        Err(diag) => report(diag),
    }
}

fn cmd_run(path: &Path, optimization: u32) -> Result<(), Box<dyn std::error::Error>> {
    banner();

    let options = CompileOptions {
        optimization,
        stdlib: None,
    };
    let mut progress = TermProgress::new();

    match compile::compile_path(path, &options, &mut progress) {
        Ok(out) => {
            analysis::analyze(&out).map_err(|d| d.to_string())?;
            eprintln!(
                "{}",
                Style::bright_black("note: the execution backend is not implemented yet")
            );
            Ok(())
        }
        Err(diag) => report(diag),
    }
}

fn cmd_check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    banner();

    let mut progress = TermProgress::new();
    match compile::compile_path(path, &CompileOptions::default(), &mut progress) {
        Ok(out) => {
            analysis::analyze(&out).map_err(|d| d.to_string())?;
            println!("{}", Style::bright_green("check passed"));
            Ok(())
        }
        Err(diag) => report(diag),
    }
}

/// Renders one diagnostic (with a source excerpt when the file is readable)
/// and exits non-zero.
fn report(diag: Diagnostic) -> ! {
    let source = diag.path.as_ref().and_then(|p| fs::read_to_string(p).ok());
    eprintln!("\n{}", diag.render(source.as_deref()));
    std::process::exit(1);
}
