//! Loads package snapshots for relay.
//!
//! A snapshot file lists repositories either inline or as paths to package
//! record files. [`load_snapshot`] reads the manifest and resolves every
//! record on a bounded worker pool; records that cannot be loaded are kept as
//! unresolved repositories so planning can still proceed.

mod error;
mod format;
mod manifest;
mod reader;
mod resolver;

use std::path::Path;

pub use error::{Result, SnapshotError};
pub use format::{FileFormat, read_file};
pub use manifest::{RepositoryEntry, SnapshotManifest};
pub use reader::{FileSystemRecordReader, RecordReader};
pub use resolver::{SnapshotResolver, default_concurrency};

use relay_core::PackageSnapshot;

/// Loads the manifest at `path` and resolves its record files relative to the
/// manifest's directory.
///
/// # Errors
///
/// Returns an error if the manifest itself cannot be loaded or the worker
/// pool cannot start.
pub fn load_snapshot(path: &Path, concurrency: usize) -> Result<PackageSnapshot> {
    let manifest = SnapshotManifest::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    SnapshotResolver::new(FileSystemRecordReader::new(base_dir))
        .with_concurrency(concurrency)
        .resolve(&manifest)
}
