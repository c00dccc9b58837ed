use std::num::NonZeroUsize;

use rayon::prelude::*;
use relay_core::{Package, PackageSnapshot, UnresolvedRepository};
use tracing::{info, warn};

use crate::error::{Result, error_chain};
use crate::manifest::{RepositoryEntry, SnapshotManifest};
use crate::reader::RecordReader;

const MAX_DEFAULT_CONCURRENCY: usize = 8;

/// Default worker count: available parallelism, capped at eight.
#[must_use]
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(MAX_DEFAULT_CONCURRENCY)
}

/// Turns a [`SnapshotManifest`] into a [`PackageSnapshot`], reading record
/// files on a bounded worker pool.
///
/// Records that fail to load become [`UnresolvedRepository`] entries instead
/// of failing the whole snapshot. Resolved packages keep manifest order.
pub struct SnapshotResolver<R> {
    reader: R,
    concurrency: usize,
}

impl<R: RecordReader> SnapshotResolver<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            concurrency: default_concurrency(),
        }
    }

    /// Values below one are treated as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// # Errors
    ///
    /// Returns `SnapshotError::ThreadPool` if the worker pool cannot start.
    /// Individual record failures are reported on the snapshot instead.
    pub fn resolve(&self, manifest: &SnapshotManifest) -> Result<PackageSnapshot> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .build()?;

        let outcomes: Vec<std::result::Result<Package, UnresolvedRepository>> = pool.install(|| {
            manifest
                .repositories
                .par_iter()
                .map(|entry| self.resolve_entry(entry))
                .collect()
        });

        let mut snapshot = PackageSnapshot::default();
        snapshot.unresolved.extend(manifest.unresolved.iter().cloned());
        for outcome in outcomes {
            match outcome {
                Ok(package) => snapshot.resolved.push(package),
                Err(unresolved) => snapshot.unresolved.push(unresolved),
            }
        }

        info!(
            resolved = snapshot.resolved.len(),
            unresolved = snapshot.unresolved.len(),
            workers = self.concurrency,
            "resolved snapshot"
        );

        Ok(snapshot)
    }

    fn resolve_entry(
        &self,
        entry: &RepositoryEntry,
    ) -> std::result::Result<Package, UnresolvedRepository> {
        match entry {
            RepositoryEntry::Inline(package) => Ok(package.clone()),
            RepositoryEntry::Record { path, .. } => match self.reader.read_record(path) {
                Ok(mut package) => {
                    if package.repository.is_none() {
                        package.repository = Some(entry.repository());
                    }
                    Ok(package)
                }
                Err(err) => {
                    let repository = entry.repository();
                    let reason = error_chain(&err);
                    warn!(repository = %repository, %reason, "could not resolve repository");
                    Err(UnresolvedRepository { repository, reason })
                }
            },
        }
    }
}
