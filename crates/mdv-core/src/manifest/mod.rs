//! Manifest handling: the `.md5` line format and on-disk discovery.

mod locate;
mod parse;

pub use locate::{find_manifest, LocateError};
pub use parse::{parse_manifest, ManifestEntry, ParsedManifest, RejectedLine};
