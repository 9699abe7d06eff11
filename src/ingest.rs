//! Library ingestion: import audio files, convert them to canonical WAV and
//! register them in the catalog.
//!
//! Imports are synchronous on the caller's thread. One mutex serializes
//! whole invocations so two concurrent imports of the same name cannot both
//! pass the duplicate check before either records it.

mod convert;


use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{info, warn};
use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::track::Track;

pub use convert::convert_to_wav;

/// Outcome of importing a single file. Batch imports yield one of these per
/// input; a failure never aborts the rest of the batch.
#[derive(Debug)]
pub enum ImportResult {
    /// Converted, stored at the canonical path and recorded in the catalog.
    Imported(String),
    /// Not imported; see the reason.
    Skipped(String, SkipReason),
    /// Conversion or bookkeeping failed for this file.
    Failed(PathBuf, Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The catalog already has a track with this name.
    DuplicateName,
}

pub struct Importer {
    catalog: Arc<Catalog>,
    audio_root: PathBuf,
    /// Serializes the contains/convert/record sequence across callers.
    lock: Mutex<()>,
}

impl Importer {
    pub fn new(catalog: Arc<Catalog>, audio_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            audio_root: audio_root.into(),
            lock: Mutex::new(()),
        }
    }

    /// Import one file. The track name is the filename without extension.
    pub fn import_file(&self, path: &Path) -> ImportResult {
        let _guard = self.lock.lock().unwrap();
        self.import_one(path)
    }

    /// Import every file under `dir`, recursively. Results come back in
    /// traversal order; the walk is sorted by file name so the order is
    /// reproducible across platforms.
    pub fn import_directory(&self, dir: &Path) -> Vec<ImportResult> {
        let _guard = self.lock.lock().unwrap();
        let mut results = Vec::new();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() {
                results.push(self.import_one(entry.path()));
            }
        }
        results
    }

    /// Clear the catalog, then remove the audio root tree.
    ///
    /// The catalog is cleared first on purpose: a crash between the two
    /// steps leaves stale files that nothing references, never catalog
    /// entries whose files are already gone.
    pub fn delete_all(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        self.catalog.clear()?;
        match fs::remove_dir_all(&self.audio_root) {
            Ok(()) => {
                info!("removed audio root {}", self.audio_root.display());
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn audio_root(&self) -> &Path {
        &self.audio_root
    }

    fn import_one(&self, path: &Path) -> ImportResult {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            return ImportResult::Failed(
                path.to_path_buf(),
                Error::Decode(format!("no usable file name: {}", path.display())),
            );
        };

        if self.catalog.contains(&name) {
            info!("skipping {name}: already in catalog");
            return ImportResult::Skipped(name, SkipReason::DuplicateName);
        }

        let track_dir = self.audio_root.join(&name);
        let wav_path = Track::canonical_path(&self.audio_root, &name);

        let stored = (|| -> Result<()> {
            fs::create_dir_all(&track_dir)?;
            convert::convert_to_wav(path, &wav_path)?;
            self.catalog.record(&name)?;
            Ok(())
        })();

        match stored {
            Ok(()) => {
                info!("imported {name} -> {}", wav_path.display());
                ImportResult::Imported(name)
            }
            Err(err) => {
                // No rollback: a partially created track directory stays
                // behind until the next delete_all. The catalog is only
                // written after a successful conversion, so it never points
                // at a broken file.
                warn!("import of {} failed: {err}", path.display());
                ImportResult::Failed(path.to_path_buf(), err)
            }
        }
    }
}
