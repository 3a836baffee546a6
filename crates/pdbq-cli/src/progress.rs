//! Progress indicators for network calls
//!
//! Spinners draw on stderr, and only when stderr is a terminal, so piped
//! command output stays clean.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::time::Duration;

/// Create a spinner for a request of unknown duration.
///
/// Returns a hidden bar when stderr is not a terminal.
pub fn create_spinner(message: &str) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Await `future` behind a spinner, clearing it once the future resolves
pub async fn with_spinner<F, T>(message: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let pb = create_spinner(message);
    let output = future.await;
    pb.finish_and_clear();
    output
}
