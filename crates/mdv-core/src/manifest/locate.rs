//! Discovery of the `.md5` manifest for a target path.
//!
//! The target may be the manifest itself, a directory containing one, or a
//! directory whose `md5/` subfolder contains one. Candidates within a
//! searched location are ordered lexicographically by file name so that
//! discovery is deterministic where raw directory listing order is not.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension a manifest file must carry.
const MANIFEST_EXT: &str = "md5";
/// Subdirectory searched when the target directory holds no manifest itself.
const MANIFEST_SUBDIR: &str = "md5";

/// No manifest discoverable at or under the given path.
#[derive(Debug, Error)]
#[error("no .md5 manifest found at '{}'", target.display())]
pub struct LocateError {
    pub target: PathBuf,
}

/// Return the manifest file to use for `target`.
///
/// A direct `.md5` file wins outright; for a directory, a manifest directly
/// inside it takes precedence over one in its `md5/` subfolder. A missing
/// target path yields the same not-found error as an empty search.
pub fn find_manifest(target: &Path) -> Result<PathBuf, LocateError> {
    if target.is_file() && has_manifest_ext(target) {
        return Ok(target.to_path_buf());
    }
    if target.is_dir() {
        if let Some(found) = first_manifest_in(target) {
            return Ok(found);
        }
        let subdir = target.join(MANIFEST_SUBDIR);
        if subdir.is_dir() {
            if let Some(found) = first_manifest_in(&subdir) {
                return Ok(found);
            }
        }
    }
    Err(LocateError {
        target: target.to_path_buf(),
    })
}

/// Lexicographically first `.md5` file directly inside `dir`, if any.
fn first_manifest_in(dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && has_manifest_ext(p))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn has_manifest_ext(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXT)
}
