use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub(crate) static SPINNER: OnceLock<ProgressBar> = OnceLock::new();

/// Creates the process-wide spinner. Hidden spinners never draw.
pub fn init(visible: bool) {
    SPINNER.get_or_init(|| {
        if visible {
            styled_spinner()
        } else {
            ProgressBar::hidden()
        }
    });
}

pub fn get_spinner() -> &'static ProgressBar {
    SPINNER.get_or_init(ProgressBar::hidden)
}

fn styled_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);
    pb.set_style(style);
    pb
}

pub fn start(msg: String) {
    let spinner = get_spinner();
    spinner.reset();
    spinner.set_message(msg);
    spinner.enable_steady_tick(TICK_INTERVAL);
}

pub fn set_message(msg: String) {
    get_spinner().set_message(msg);
}

pub fn stop() {
    let spinner = get_spinner();
    spinner.disable_steady_tick();
    spinner.finish_and_clear();
}

/// Log sink that clears the spinner line before writing to stdout.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        get_spinner().suspend(|| std::io::stdout().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stdout().flush()
    }
}
