//! Console rendering of verification outcomes.
//!
//! Status tags mirror the classic verifier output: green `[ OK ]`, red
//! `[FAIL]` with expected/found digests, cyan `[MISSING]`. While a file is
//! being hashed, a `name: NN%` line updates in place; it is drawn only when
//! stdout is a terminal, so piped output stays clean.

use console::{style, Term};
use mdv_core::manifest::ManifestEntry;
use mdv_core::report::Reporter;
use mdv_core::verify::{Outcome, Summary};
use std::path::Path;

pub struct ConsoleReporter {
    term: Term,
    /// Whether a progress line is currently displayed and must be cleared.
    progress_shown: bool,
    last_percent: u64,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            progress_shown: false,
            last_percent: u64::MAX,
        }
    }

    fn clear_progress(&mut self) {
        if self.progress_shown {
            let _ = self.term.clear_line();
            self.progress_shown = false;
            self.last_percent = u64::MAX;
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn manifest_selected(&mut self, path: &Path) {
        println!(
            "{}",
            style(format!("Using MD5 file: {}", path.display())).yellow()
        );
    }

    fn invalid_line(&mut self, line_number: usize, content: &str) {
        self.clear_progress();
        println!("Skipping invalid line {line_number}: {content}");
    }

    fn progress(&mut self, path: &Path, bytes_read: u64, total_bytes: u64) {
        if !self.term.features().is_attended() || total_bytes == 0 {
            return;
        }
        let percent = bytes_read * 100 / total_bytes;
        if percent == self.last_percent {
            return;
        }
        self.last_percent = percent;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let _ = self.term.clear_line();
        let _ = self
            .term
            .write_str(&format!("{}: {}%", style(name).green(), percent));
        self.progress_shown = true;
    }

    fn outcome(&mut self, entry: &ManifestEntry, outcome: &Outcome) {
        self.clear_progress();
        match outcome {
            Outcome::Ok => println!("{} {}", style("[ OK ]").green(), entry.path),
            Outcome::Fail { expected, actual } => {
                println!("{} {}", style("[FAIL]").red(), entry.path);
                println!("  {}", style(format!("Expected: {expected}")).red());
                println!("  {}", style(format!("Found:    {actual}")).red());
            }
            Outcome::Missing => println!("{} {}", style("[MISSING]").cyan(), entry.path),
            Outcome::Unreadable { error } => {
                println!("{} {}", style("[UNREADABLE]").red(), entry.path);
                println!("  {}", style(error).red());
            }
        }
    }

    fn summary(&mut self, summary: &Summary) {
        self.clear_progress();
        println!(
            "{} {} /{}",
            style("Total Checked:").yellow(),
            style(summary.checked()).green(),
            style(summary.total).cyan()
        );
        println!("    {}", style(format!("OK: {}", summary.ok)).green());
        println!("    {}", style(format!("FAILED: {}", summary.failed)).red());
        println!(
            "    {}",
            style(format!("MISSING: {}", summary.missing)).cyan()
        );
        if summary.unreadable > 0 {
            println!(
                "    {}",
                style(format!("UNREADABLE: {}", summary.unreadable)).red()
            );
        }
    }
}
