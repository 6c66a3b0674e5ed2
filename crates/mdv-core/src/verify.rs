//! Verification driver: walks manifest entries in order and classifies
//! each one as OK, FAIL, MISSING, or UNREADABLE.
//!
//! Fully sequential: the manifest is parsed before any hashing begins, and
//! at most one file is open at a time. No entry's outcome affects later
//! entries.

use anyhow::{Context, Result};
use std::path::Path;

use crate::hasher::Hasher;
use crate::manifest::{self, ManifestEntry};
use crate::report::Reporter;

/// Per-entry verification outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Computed digest matched the expected one.
    Ok,
    /// Digests differ; both kept for reporting.
    Fail { expected: String, actual: String },
    /// Referenced file does not exist; hashing was not attempted.
    Missing,
    /// File exists but could not be read. Recorded per entry so one
    /// unreadable file does not stop verification of the rest.
    Unreadable { error: String },
}

/// Counters for one verification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Entries parsed from the manifest (valid lines only).
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
    pub missing: usize,
    /// Entries whose file existed but could not be hashed.
    pub unreadable: usize,
}

impl Summary {
    /// Entries for which a hash was attempted (everything but MISSING).
    pub fn checked(&self) -> usize {
        self.ok + self.failed + self.unreadable
    }

    /// True when every entry verified clean.
    pub fn all_ok(&self) -> bool {
        self.failed == 0 && self.missing == 0 && self.unreadable == 0
    }
}

/// Parse the manifest at `manifest_path` and verify every entry against
/// the files around it. Entry paths resolve relative to the manifest's
/// containing directory, never the process working directory.
///
/// Returns the summary; the error case covers only failure to read the
/// manifest itself.
pub fn verify_manifest<H: Hasher>(
    manifest_path: &Path,
    hasher: &mut H,
    reporter: &mut dyn Reporter,
) -> Result<Summary> {
    let text = std::fs::read_to_string(manifest_path)
        .with_context(|| format!("read manifest {}", manifest_path.display()))?;
    reporter.manifest_selected(manifest_path);

    let parsed = manifest::parse_manifest(&text);
    for rejected in &parsed.rejected {
        reporter.invalid_line(rejected.line_number, &rejected.content);
    }

    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let mut summary = Summary {
        total: parsed.entries.len(),
        ..Summary::default()
    };

    for entry in &parsed.entries {
        let outcome = verify_entry(base, entry, hasher, reporter);
        match &outcome {
            Outcome::Ok => summary.ok += 1,
            Outcome::Fail { .. } => summary.failed += 1,
            Outcome::Missing => summary.missing += 1,
            Outcome::Unreadable { .. } => summary.unreadable += 1,
        }
        reporter.outcome(entry, &outcome);
    }

    reporter.summary(&summary);
    tracing::info!(
        "verified {}: {} ok, {} failed, {} missing, {} unreadable",
        manifest_path.display(),
        summary.ok,
        summary.failed,
        summary.missing,
        summary.unreadable
    );
    Ok(summary)
}

fn verify_entry<H: Hasher>(
    base: &Path,
    entry: &ManifestEntry,
    hasher: &mut H,
    reporter: &mut dyn Reporter,
) -> Outcome {
    let abs_path = base.join(&entry.path);
    if !abs_path.exists() {
        return Outcome::Missing;
    }

    let mut progress = |done, total| reporter.progress(&abs_path, done, total);
    match hasher.digest(&abs_path, &mut progress) {
        // Both sides are lowercase hex, so this compares case-insensitively.
        Ok(actual) if actual == entry.checksum => Outcome::Ok,
        Ok(actual) => Outcome::Fail {
            expected: entry.checksum.clone(),
            actual,
        },
        Err(err) => {
            tracing::warn!("hashing {} failed: {err:#}", abs_path.display());
            Outcome::Unreadable {
                error: format!("{err:#}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Md5Hasher;
    use crate::report::NullReporter;
    use std::fs;
    use std::path::PathBuf;

    /// Hasher that records invocations and returns a fixed digest.
    struct MockHasher {
        calls: Vec<PathBuf>,
        digest: String,
    }

    impl MockHasher {
        fn returning(digest: &str) -> Self {
            Self {
                calls: Vec::new(),
                digest: digest.to_string(),
            }
        }
    }

    impl Hasher for MockHasher {
        fn digest(
            &mut self,
            path: &Path,
            _progress: &mut dyn FnMut(u64, u64),
        ) -> Result<String> {
            self.calls.push(path.to_path_buf());
            Ok(self.digest.clone())
        }
    }

    /// Reporter that records every event for order assertions.
    #[derive(Default)]
    struct RecordingReporter {
        invalid_lines: Vec<usize>,
        outcomes: Vec<(String, Outcome)>,
        summaries: Vec<Summary>,
    }

    impl Reporter for RecordingReporter {
        fn manifest_selected(&mut self, _path: &Path) {}
        fn invalid_line(&mut self, line_number: usize, _content: &str) {
            self.invalid_lines.push(line_number);
        }
        fn outcome(&mut self, entry: &ManifestEntry, outcome: &Outcome) {
            self.outcomes.push((entry.path.clone(), outcome.clone()));
        }
        fn summary(&mut self, summary: &Summary) {
            self.summaries.push(*summary);
        }
    }

    fn write_manifest(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("files.md5");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn ok_fail_and_missing_in_one_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.bin"), b"").unwrap();
        fs::write(dir.path().join("altered.bin"), b"not what was hashed").unwrap();
        let manifest = write_manifest(
            dir.path(),
            "d41d8cd98f00b204e9800998ecf8427e *empty.bin\n\
             d41d8cd98f00b204e9800998ecf8427e *altered.bin\n\
             d41d8cd98f00b204e9800998ecf8427e *absent.bin\n",
        );

        let mut hasher = Md5Hasher::default();
        let mut reporter = RecordingReporter::default();
        let summary = verify_manifest(&manifest, &mut hasher, &mut reporter).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.ok, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.unreadable, 0);
        assert_eq!(summary.checked(), 2);

        assert_eq!(reporter.outcomes[0], ("empty.bin".to_string(), Outcome::Ok));
        match &reporter.outcomes[1].1 {
            Outcome::Fail { expected, actual } => {
                assert_eq!(expected, "d41d8cd98f00b204e9800998ecf8427e");
                assert_ne!(actual, expected);
                assert_eq!(actual.len(), 32);
            }
            other => panic!("expected Fail, got {other:?}"),
        }
        assert_eq!(reporter.outcomes[2].1, Outcome::Missing);
        assert_eq!(reporter.summaries.len(), 1);
    }

    #[test]
    fn missing_entry_never_invokes_hasher() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(
            dir.path(),
            "d41d8cd98f00b204e9800998ecf8427e *not-there.bin\n",
        );

        let mut hasher = MockHasher::returning("d41d8cd98f00b204e9800998ecf8427e");
        let summary =
            verify_manifest(&manifest, &mut hasher, &mut NullReporter::default()).unwrap();

        assert!(hasher.calls.is_empty());
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.checked(), 0);
    }

    #[test]
    fn mixed_case_checksum_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.bin"), b"").unwrap();
        let manifest = write_manifest(
            dir.path(),
            "D41D8CD98F00B204E9800998ECF8427E *empty.bin\n",
        );

        let mut hasher = Md5Hasher::default();
        let summary =
            verify_manifest(&manifest, &mut hasher, &mut NullReporter::default()).unwrap();
        assert_eq!(summary.ok, 1);
        assert!(summary.all_ok());
    }

    #[test]
    fn paths_resolve_against_manifest_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("empty.bin"), b"").unwrap();
        // backslash separators, as written by Windows tools
        let manifest = write_manifest(
            dir.path(),
            "d41d8cd98f00b204e9800998ecf8427e *data\\empty.bin\n",
        );

        let mut hasher = MockHasher::returning("d41d8cd98f00b204e9800998ecf8427e");
        let summary =
            verify_manifest(&manifest, &mut hasher, &mut NullReporter::default()).unwrap();
        assert_eq!(summary.ok, 1);
        assert_eq!(hasher.calls, vec![dir.path().join("data").join("empty.bin")]);
    }

    #[test]
    fn empty_manifest_all_zero_summary() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path(), "; only a comment\n\n");

        let mut hasher = Md5Hasher::default();
        let summary =
            verify_manifest(&manifest, &mut hasher, &mut NullReporter::default()).unwrap();
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.checked(), 0);
    }

    #[test]
    fn invalid_lines_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.bin"), b"").unwrap();
        let manifest = write_manifest(
            dir.path(),
            "this line is junk\n\
             d41d8cd98f00b204e9800998ecf8427e *empty.bin\n",
        );

        let mut hasher = Md5Hasher::default();
        let mut reporter = RecordingReporter::default();
        let summary = verify_manifest(&manifest, &mut hasher, &mut reporter).unwrap();

        assert_eq!(reporter.invalid_lines, vec![1]);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.ok, 1);
    }

    #[test]
    fn duplicate_paths_verified_independently() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.bin"), b"").unwrap();
        let manifest = write_manifest(
            dir.path(),
            "d41d8cd98f00b204e9800998ecf8427e *empty.bin\n\
             00000000000000000000000000000000 *empty.bin\n",
        );

        let mut hasher = Md5Hasher::default();
        let summary =
            verify_manifest(&manifest, &mut hasher, &mut NullReporter::default()).unwrap();
        assert_eq!(summary.ok, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn unreadable_entry_counted_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        // A directory entry passes the exists() check but fails on read
        // (EISDIR), exercising the per-entry I/O downgrade.
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("empty.bin"), b"").unwrap();
        let manifest = write_manifest(
            dir.path(),
            "d41d8cd98f00b204e9800998ecf8427e *subdir\n\
             d41d8cd98f00b204e9800998ecf8427e *empty.bin\n",
        );

        let mut hasher = Md5Hasher::default();
        let mut reporter = RecordingReporter::default();
        let summary = verify_manifest(&manifest, &mut hasher, &mut reporter).unwrap();

        assert_eq!(summary.unreadable, 1);
        assert_eq!(summary.ok, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.checked(), 2);
        assert!(!summary.all_ok());

        match &reporter.outcomes[0].1 {
            Outcome::Unreadable { error } => assert!(!error.is_empty()),
            other => panic!("expected Unreadable, got {other:?}"),
        }
        // the run continued past the unreadable entry
        assert_eq!(reporter.outcomes[1].1, Outcome::Ok);
    }

    #[test]
    fn unreadable_manifest_is_an_error() {
        let mut hasher = Md5Hasher::default();
        assert!(verify_manifest(
            Path::new("/nonexistent/mdv-verify-test.md5"),
            &mut hasher,
            &mut NullReporter::default()
        )
        .is_err());
    }
}
