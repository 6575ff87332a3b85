use indicatif::{ProgressBar, ProgressState, ProgressStyle};

const SEQUENCE_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sequences ({percent}); ETA: {eta_precise}; Speed: {per_sec} {msg}";

/// Shared function to pull our progress bar styling
pub fn get_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(SEQUENCE_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("percent", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}%", state.fraction() * 100.0);
        })
        .with_key("per_sec", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}/s", state.per_sec());
        })
        .progress_chars("##-")
}

/// Builds a styled progress bar over sequences; the length is set once the run knows how many sequences it has
pub fn sequence_progress_bar() -> ProgressBar {
    ProgressBar::new(0).with_style(get_progress_style())
}
