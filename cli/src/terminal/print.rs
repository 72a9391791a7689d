//! Raw terminal output. Everything here rides the reserved print target,
//! which the formatter renders bare and the silent filter keeps visible.

use colored::*;
use tracing::info;

use crate::terminal::logging;

pub const TOTAL_WIDTH: usize = 64;

pub fn print(msg: &str) {
    info!(target: logging::PRINT_TARGET, "{msg}");
}

pub fn banner() {
    let text: String = format!("⟦ FANMAP v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = text.chars().count();
    let sep: ColoredString = "═"
        .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
        .bright_black();
    let output: String = format!("{}{}{}", sep, text.bright_green().bold(), sep);

    print(&output);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}
