//! Reporting seam between the verification core and any presentation layer.

use crate::manifest::ManifestEntry;
use crate::verify::{Outcome, Summary};
use std::path::Path;

/// Sink for everything a verification run wants to tell the user.
///
/// The driver depends only on this trait; rendering (colors, in-place
/// progress lines) lives entirely in the CLI.
pub trait Reporter {
    /// Called once with the manifest the locator settled on.
    fn manifest_selected(&mut self, path: &Path);

    /// A manifest line that could not be parsed; the run continues.
    fn invalid_line(&mut self, line_number: usize, content: &str);

    /// Outcome for one entry, in manifest order.
    fn outcome(&mut self, entry: &ManifestEntry, outcome: &Outcome);

    /// Aggregated counters after the last entry.
    fn summary(&mut self, summary: &Summary);

    /// Hashing progress for the file currently being read.
    fn progress(&mut self, _path: &Path, _bytes_read: u64, _total_bytes: u64) {}
}

/// Reporter that swallows everything (library use, tests).
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn manifest_selected(&mut self, _path: &Path) {}
    fn invalid_line(&mut self, _line_number: usize, _content: &str) {}
    fn outcome(&mut self, _entry: &ManifestEntry, _outcome: &Outcome) {}
    fn summary(&mut self, _summary: &Summary) {}
}
