//! zxc entry point.

fn main() {
    if let Err(e) = zxc::cli::run_cli() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
