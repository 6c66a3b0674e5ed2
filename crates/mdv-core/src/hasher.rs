//! Chunked MD5 hashing with bounded memory use.
//!
//! The chunk size adapts to available system memory for throughput, but the
//! per-read size is capped so a single `read()` never moves a pathological
//! amount of data regardless of what the probe reports.

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Hard ceiling for the computed chunk size: 6 GiB.
const MAX_CHUNK_BYTES: u64 = 6 * 1024 * 1024 * 1024;
/// No single read() call moves more than 8 MiB.
const MAX_READ_BYTES: u64 = 8 * 1024 * 1024;
/// Floor in case the memory probe reports nothing useful.
const MIN_CHUNK_BYTES: u64 = 64 * 1024;

/// Chunk size derived from available system memory: half of what is
/// currently free, clamped to [64 KiB, 6 GiB].
pub fn auto_chunk_size() -> u64 {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();
    (sys.available_memory() / 2).clamp(MIN_CHUNK_BYTES, MAX_CHUNK_BYTES)
}

/// Compute MD5 of a file and return the digest as lowercase hex.
///
/// Reads sequentially in chunks to keep memory use bounded; suitable for
/// very large files. `progress` is called with `(bytes_read_so_far,
/// total_bytes)` after each non-empty read; it observes only and cannot
/// affect the digest. Open or read failures propagate; no partial digest
/// is returned.
pub fn md5_file(
    path: &Path,
    chunk_size: Option<u64>,
    progress: &mut dyn FnMut(u64, u64),
) -> Result<String> {
    let total_bytes = std::fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    let chunk = chunk_size.unwrap_or_else(auto_chunk_size);
    let read_size = chunk.min(MAX_READ_BYTES).max(1) as usize;

    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; read_size];
    let mut bytes_read: u64 = 0;
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        bytes_read += n as u64;
        progress(bytes_read, total_bytes);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest computation seam so the verification driver can be exercised
/// with a mock (e.g. to prove missing files are never hashed).
pub trait Hasher {
    fn digest(&mut self, path: &Path, progress: &mut dyn FnMut(u64, u64)) -> Result<String>;
}

/// Chunked MD5 hasher used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher {
    /// Overrides automatic chunk sizing when set.
    pub chunk_size: Option<u64>,
}

impl Hasher for Md5Hasher {
    fn digest(&mut self, path: &Path, progress: &mut dyn FnMut(u64, u64)) -> Result<String> {
        md5_file(path, self.chunk_size, progress)
    }
}
