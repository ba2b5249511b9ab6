//! Subscribers that render a run: terminal, progress spinner and result file.

mod file;
mod progress;
mod screen;

pub use file::FileOutput;
pub use progress::ProgressOutput;
pub use screen::ScreenOutput;
