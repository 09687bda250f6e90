//! Loading indicator with CI fallback

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a query is pending.
///
/// Interactive terminals get an indicatif spinner on stderr; elsewhere a
/// single plain line is printed when loading starts.
pub struct LoadingSpinner {
    bar: Option<ProgressBar>,
    interactive: bool,
}

impl LoadingSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            bar: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    /// Start (or restart) the spinner. No-op if already spinning.
    pub fn start(&mut self, message: &str) {
        if self.bar.is_some() {
            return;
        }

        if self.interactive {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
            );
            bar.set_message(message.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            self.bar = Some(bar);
        } else {
            eprintln!("{} {}", style("...").dim(), message);
        }
    }

    /// Remove the spinner without leaving a trace
    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for LoadingSpinner {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_non_interactive() {
        let ctx = UiContext::non_interactive();
        let mut spinner = LoadingSpinner::new(&ctx);
        spinner.start("Loading namespaces...");
        assert!(spinner.bar.is_none());
        spinner.clear();
    }
}
