//! Parser for `.md5` manifest text.
//!
//! Each entry line is `<hex-checksum> *<relative-path>`; lines starting
//! with `;` are comments. Malformed lines are rejected with a diagnostic,
//! never aborting the parse.

/// One `(expected digest, relative path)` pair from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Expected digest, lowercase hex.
    pub checksum: String,
    /// Relative path with forward slashes, `.`/`..` segments collapsed.
    pub path: String,
}

/// A line the parser refused, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based line number in the manifest file.
    pub line_number: usize,
    pub content: String,
}

/// Parse result: entries in file order plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct ParsedManifest {
    pub entries: Vec<ManifestEntry>,
    pub rejected: Vec<RejectedLine>,
}

/// Separator between checksum and path: a space directly followed by `*`.
const SEPARATOR: &str = " *";

/// Parse manifest text into ordered entries, preserving line order.
/// Duplicate paths are kept; blank and `;`-comment lines are skipped
/// silently.
pub fn parse_manifest(text: &str) -> ParsedManifest {
    let mut out = ParsedManifest::default();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        match split_entry(line) {
            Some((checksum, path)) => out.entries.push(ManifestEntry {
                checksum: checksum.to_ascii_lowercase(),
                path: normalize_path(path),
            }),
            None => {
                tracing::warn!("manifest line {}: not a checksum/path pair: {line}", idx + 1);
                out.rejected.push(RejectedLine {
                    line_number: idx + 1,
                    content: line.to_string(),
                });
            }
        }
    }
    out
}

/// Split a line on ` *` into (checksum, path). Rejects lines where the
/// split does not yield exactly two non-empty parts (no separator, more
/// than one separator, or an empty side).
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(SEPARATOR);
    let checksum = parts.next()?;
    let path = parts.next()?;
    if parts.next().is_some() || checksum.is_empty() || path.is_empty() {
        return None;
    }
    Some((checksum, path))
}

/// Normalize a manifest path OS-neutrally: backslashes become `/`, then
/// `.` and `..` segments are collapsed lexically (no filesystem access).
fn normalize_path(raw: &str) -> String {
    let unified = raw.trim().replace('\\', "/");
    let mut stack: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|s| *s != "..") {
                    stack.pop();
                } else {
                    stack.push("..");
                }
            }
            _ => stack.push(segment),
        }
    }
    if stack.is_empty() {
        ".".to_string()
    } else {
        stack.join("/")
    }
}
