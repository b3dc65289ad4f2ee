use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub struct ProgressUtils {}

impl ProgressUtils {
    /// Spinner drawn on stderr; hidden when `enabled` is false.
    pub fn display_loader(msg: String, enabled: bool) -> ProgressBar {
        if !enabled {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠸", "⠴", "⠦", "⠇", "✔"]),
        );
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }
}
