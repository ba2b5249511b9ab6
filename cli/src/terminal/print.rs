use std::cell::Cell;
use std::fmt::Display;

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{banner, colors};

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "subscope::print";

thread_local! {
    /// Key column width used by [`aligned_line`].
    pub static GLOBAL_KEY_WIDTH: Cell<usize> = const { Cell::new(0) }
}

#[macro_export]
macro_rules! sprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

/// Emits a line verbatim through the logging pipeline.
pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

/// Art plus a version rule. Skipped with `--no-banner` or any `-q`.
pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }

    banner::print();
    print(&rule(&format!("subscope v{}", env!("CARGO_PKG_VERSION")), '═'));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    print(&rule(msg, '─'));
}

pub fn fat_separator() {
    print(&format!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)));
}

/// A full-width rule of `fill` with an upper-cased label near its left end:
/// `─── LABEL ───────…`
fn rule(label: &str, fill: char) -> String {
    let lead: String = std::iter::repeat_n(fill, 3).collect();
    let label = label.to_uppercase();
    let used = lead.width() + label.width() + 2;
    let tail: String = std::iter::repeat_n(fill, TOTAL_WIDTH.saturating_sub(used)).collect();

    format!(
        "{} {} {}",
        lead.color(colors::SEPARATOR),
        label.color(colors::PRIMARY).bold(),
        tail.color(colors::SEPARATOR)
    )
}

/// `  key     │ value`, keys padded to [`GLOBAL_KEY_WIDTH`].
pub fn aligned_line(key: &str, value: impl Display) {
    let width = GLOBAL_KEY_WIDTH.get().max(key.width());
    let key = format!("{key:<width$}");
    print(&format!(
        "  {} {} {value}",
        key.color(colors::PRIMARY),
        "│".color(colors::SEPARATOR)
    ));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = "›".color(colors::ACCENT);
    print(&format!("{prefix} {}", msg.as_ref().color(colors::TEXT_DEFAULT)));
}

/// One discovered subdomain, tagged with the provider that reported it.
pub fn subdomain(name: &str, provider: &str) {
    let branch: ColoredString = "└─".color(colors::SEPARATOR);
    let tag: ColoredString = format!("[{provider}]").color(colors::PROVIDER);
    print(&format!(" {} {} {}", branch, name.color(colors::SUBDOMAIN), tag));
}

/// Left-pads `msg` so it sits in the middle of a [`TOTAL_WIDTH`] line.
pub fn centerln(msg: &str) {
    let pad = TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2;
    print(&format!("{}{msg}", " ".repeat(pad)));
}

const NO_RESULTS: &str = r#"
            .-.
           (x x)    *.?
           | O \        `-- (nothing yet)
            \   \
             `~~~'  try more providers, an API key or a later run
"#;

pub fn no_results() {
    print(&format!("{}", NO_RESULTS.yellow()));
}

pub fn end_of_program() {
    print(&rule("done", '═'));
}
