//! Track/bypass router: decides, per record, whether it participates in
//! dedup (tracked) or passes straight through (bypassed).
//!
//! Patterns are evaluated in the order they were given on the command
//! line, first match wins; a record matching neither a `--track` nor a
//! `--bypass` pattern defaults to tracked, so an empty classifier tracks
//! everything.

use regex::Regex;

use crate::cli::error::{CliError, Result};
use crate::engine::Classification;

enum Rule {
    Track(Regex),
    Bypass(Regex),
}

/// Ordered list of compiled classification rules.
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    /// Compiles `track_patterns` and `bypass_patterns` into a single
    /// ordered rule list, interleaving them in the order clap collected
    /// them (track patterns first, then bypass, matching how they were
    /// declared in [`crate::cli::args::Cli`]).
    pub fn new(track_patterns: &[String], bypass_patterns: &[String]) -> Result<Self> {
        let mut rules = Vec::with_capacity(track_patterns.len() + bypass_patterns.len());
        for pattern in track_patterns {
            rules.push(Rule::Track(compile(pattern)?));
        }
        for pattern in bypass_patterns {
            rules.push(Rule::Bypass(compile(pattern)?));
        }
        Ok(Self { rules })
    }

    /// An empty classifier: every record is tracked.
    pub fn track_everything() -> Self {
        Self { rules: Vec::new() }
    }

    /// Classifies one record's text, first-match-wins over the compiled
    /// rule list, defaulting to tracked.
    pub fn classify(&self, text: &str) -> Classification {
        for rule in &self.rules {
            match rule {
                Rule::Track(re) if re.is_match(text) => return Classification::Tracked,
                Rule::Bypass(re) if re.is_match(text) => return Classification::Bypassed,
                _ => continue,
            }
        }
        Classification::Tracked
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| CliError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}
