#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared terminal utilities for the SuperCharger status CLI.
//!
//! [`init_logger`] sets up `indicatif-log-bridge` so that `log::info!` and
//! friends are suspended while spinners redraw, [`with_spinner`] shows a
//! spinner for the duration of a request, and [`TerminalToastSink`]
//! renders check-in toasts as aligned terminal lines.

use std::future::Future;
use std::time::Duration;

use console::{Alignment, Term, pad_str, style};
use indicatif::{ProgressBar, ProgressStyle};
use suc_status_checkin::toast::{Toast, ToastSink};

pub use indicatif::MultiProgress;

/// Width used when the terminal size cannot be determined.
pub const FALLBACK_WIDTH: usize = 80;

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while spinners redraw.
///
/// Returns the [`MultiProgress`] that all spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // already set in tests

    log::set_max_level(level);

    multi
}

/// Adds a ticking spinner showing `message` to `multi`.
#[must_use]
pub fn request_spinner(multi: &MultiProgress, message: &str) -> ProgressBar {
    let bar = multi.add(ProgressBar::new_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}

/// Awaits `future` while a spinner showing `message` is on screen.
pub async fn with_spinner<F: Future>(multi: &MultiProgress, message: &str, future: F) -> F::Output {
    let bar = request_spinner(multi, message);
    let output = future.await;
    bar.finish_and_clear();
    output
}

/// Lays out `toast` on a line `width` columns wide: right-anchored toasts
/// are right-aligned, everything else left-aligned.
#[must_use]
pub fn render_toast(toast: &Toast, width: usize) -> String {
    let alignment = if toast.position.split(' ').any(|edge| edge == "right") {
        Alignment::Right
    } else {
        Alignment::Left
    };
    pad_str(&toast.text, width, alignment, None).trim_end().to_string()
}

/// Prints toasts through a [`MultiProgress`] so they never tear a spinner.
///
/// Terminal output cannot be hidden again, so the toast's hide delay is
/// not applied. Bottom-anchored toasts are separated from the output above
/// them by an empty line, top-anchored ones from the output below.
#[derive(Debug, Clone)]
pub struct TerminalToastSink {
    multi: MultiProgress,
    width: Option<usize>,
    clear_on_scroll: bool,
}

impl TerminalToastSink {
    /// Creates a sink printing through `multi`, sized to the terminal.
    #[must_use]
    pub const fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            width: None,
            clear_on_scroll: false,
        }
    }

    /// Uses a fixed line width instead of the terminal's.
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Clears the screen when the view scrolls to the top.
    #[must_use]
    pub const fn clear_on_scroll(mut self, clear: bool) -> Self {
        self.clear_on_scroll = clear;
        self
    }

    fn width(&self) -> usize {
        self.width.unwrap_or_else(|| {
            let term = Term::stdout();
            if term.is_term() {
                usize::from(term.size().1)
            } else {
                FALLBACK_WIDTH
            }
        })
    }

    fn println(&self, line: &str) {
        if let Err(e) = self.multi.println(line) {
            log::warn!("Failed to print toast: {e}");
        }
    }
}

impl ToastSink for TerminalToastSink {
    fn display(&mut self, toast: &Toast) {
        log::debug!("Toast at '{}': {}", toast.position, toast.text);
        let line = style(render_toast(toast, self.width())).bold().to_string();
        let bottom = toast.position.split(' ').any(|edge| edge == "bottom");
        if bottom {
            self.println("");
        }
        self.println(&line);
        if !bottom {
            self.println("");
        }
    }

    fn scroll_to_top(&mut self) {
        if !self.clear_on_scroll {
            return;
        }
        if let Err(e) = Term::stdout().clear_screen() {
            log::warn!("Failed to clear screen: {e}");
        }
    }
}
