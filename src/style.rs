//! ANSI terminal styling for diagnostics and progress output.
//!
//! Thin escape-code wrappers; every helper resets the style at the end of the
//! returned string.

/// ANSI escape code styling utilities.
pub struct Style;

impl Style {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const BLUE: &'static str = "\x1b[34m";
    pub const CYAN: &'static str = "\x1b[36m";
    pub const BRIGHT_BLACK: &'static str = "\x1b[90m";
    pub const BRIGHT_RED: &'static str = "\x1b[91m";
    pub const BRIGHT_GREEN: &'static str = "\x1b[92m";
    pub const BRIGHT_BLUE: &'static str = "\x1b[94m";

    pub fn red(s: &str) -> String {
        format!("{}{}{}", Self::RED, s, Self::RESET)
    }

    pub fn blue(s: &str) -> String {
        format!("{}{}{}", Self::BLUE, s, Self::RESET)
    }

    pub fn cyan(s: &str) -> String {
        format!("{}{}{}", Self::CYAN, s, Self::RESET)
    }

    pub fn green(s: &str) -> String {
        format!("{}{}{}", Self::GREEN, s, Self::RESET)
    }

    pub fn dim(s: &str) -> String {
        format!("{}{}{}", Self::DIM, s, Self::RESET)
    }

    pub fn bright_black(s: &str) -> String {
        format!("{}{}{}", Self::BRIGHT_BLACK, s, Self::RESET)
    }

    pub fn bright_red(s: &str) -> String {
        format!("{}{}{}", Self::BRIGHT_RED, s, Self::RESET)
    }

    pub fn bright_green(s: &str) -> String {
        format!("{}{}{}", Self::BRIGHT_GREEN, s, Self::RESET)
    }

    pub fn bright_blue(s: &str) -> String {
        format!("{}{}{}", Self::BRIGHT_BLUE, s, Self::RESET)
    }

    pub fn bold(s: &str) -> String {
        format!("{}{}{}", Self::BOLD, s, Self::RESET)
    }

    pub fn bold_red(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::RED, s, Self::RESET)
    }

    pub fn bold_bright_blue(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::BRIGHT_BLUE, s, Self::RESET)
    }
}
