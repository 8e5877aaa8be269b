use hk_core::Progress;
use indicatif::{ProgressBar, ProgressStyle};

/// Bar advanced once per finished invocation.
pub fn new(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Scheduler callback driving `pb`.
pub fn progress(pb: ProgressBar) -> Progress {
    Progress::new(move || pb.inc(1))
}
