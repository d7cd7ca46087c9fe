//! EOS stats presentation and (optionally) a progress bar over stdin
//! bytes.

use crate::stats::Stats;

/// Renders a human-readable summary of `stats` to a string, one line per
/// counter, suitable for printing to stderr so it never interleaves with
/// stdout's record stream.
pub fn render_summary(stats: &Stats) -> String {
    format!(
        "records: {total} total, {tracked} tracked, {bypassed} bypassed\n\
         output: {emitted} emitted, {skipped} skipped ({ratio:.1}% redundant)\n\
         sequences: {known} known, {discovered} discovered this run",
        total = stats.total_records,
        tracked = stats.tracked_records,
        bypassed = stats.bypassed_records,
        emitted = stats.emitted,
        skipped = stats.skipped,
        ratio = stats.redundancy_ratio() * 100.0,
        known = stats.known_sequences,
        discovered = stats.sequences_discovered,
    )
}

/// A progress bar over a byte-sized input, a thin wrapper so the rest of
/// the CLI doesn't need to know whether `progress` was enabled.
pub struct Progress {
    #[cfg(feature = "progress")]
    bar: Option<indicatif::ProgressBar>,
}

impl Progress {
    /// Builds a progress bar sized to `total_bytes`, or a no-op tracker
    /// when the `progress` feature is disabled or `total_bytes` is
    /// `None` (the input isn't seekable, e.g. a pipe).
    pub fn new(total_bytes: Option<u64>) -> Self {
        #[cfg(feature = "progress")]
        {
            let bar = total_bytes.map(|len| {
                let bar = indicatif::ProgressBar::new(len);
                bar.set_style(
                    indicatif::ProgressStyle::with_template(
                        "{bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})",
                    )
                    .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
                );
                bar
            });
            Self { bar }
        }
        #[cfg(not(feature = "progress"))]
        {
            let _ = total_bytes;
            Self {}
        }
    }

    /// Advances the bar by `bytes`, a no-op if progress rendering is
    /// disabled.
    pub fn advance(&self, bytes: u64) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.inc(bytes);
        }
        #[cfg(not(feature = "progress"))]
        let _ = bytes;
    }

    /// Clears the bar from the terminal once processing finishes.
    pub fn finish(&self) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
