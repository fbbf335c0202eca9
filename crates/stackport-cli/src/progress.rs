use colored::Colorize;
use stackport::{PollTick, ProgressObserver};

/// Prints one line per poll to stderr so stdout stays parseable
pub struct TerminalProgress;

impl ProgressObserver for TerminalProgress {
    fn on_poll(&self, tick: &PollTick) {
        let elapsed = tick.elapsed.as_secs();
        eprintln!(
            "  {} {} {}",
            "…".dimmed(),
            tick.state,
            format!("({}m{:02}s, poll #{})", elapsed / 60, elapsed % 60, tick.attempt).dimmed()
        );
    }
}
