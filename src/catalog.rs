//! Persisted registry of known track names, the sole dedup authority.
//!
//! On disk the catalog is UTF-8 text, one name per line: append-only while
//! tracks are ingested, truncated as a whole by [`Catalog::clear`]. Names
//! are not escaped, so a name containing a newline would corrupt the
//! format. The in-memory mirror and the file are
//! consistent after every successful operation; one mutex serializes all
//! access so concurrent callers never observe a half-written file.


use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::info;

use crate::error::Result;
use crate::events::{Event, Notifier};

pub struct Catalog {
    path: PathBuf,
    inner: Mutex<Inner>,
    notifier: Arc<Notifier>,
}

#[derive(Default)]
struct Inner {
    /// Names in file (= import) order.
    names: Vec<String>,
    /// Same names, for O(1) duplicate checks.
    index: HashSet<String>,
}

impl Catalog {
    /// Open the catalog at `path`, rehydrating the in-memory set from the
    /// file. A missing file yields an empty catalog, not an error.
    pub fn open(path: impl Into<PathBuf>, notifier: Arc<Notifier>) -> Result<Self> {
        let path = path.into();
        let mut inner = Inner::default();

        match fs::read_to_string(&path) {
            Ok(text) => {
                for line in text.lines() {
                    let name = line.trim();
                    if name.is_empty() {
                        continue;
                    }
                    if inner.index.insert(name.to_string()) {
                        inner.names.push(name.to_string());
                    }
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        info!(
            "catalog opened at {} with {} entries",
            path.display(),
            inner.names.len()
        );
        Ok(Self {
            path,
            inner: Mutex::new(inner),
            notifier,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().unwrap().index.contains(name)
    }

    /// Append `name` to the persisted file, then mirror it in memory.
    /// Recording a name that is already present is a no-op, so the file
    /// never accumulates duplicate lines. Emits [`Event::CatalogChanged`]
    /// when the set actually changed. On a write failure the memory set is
    /// untouched, so file and memory still agree.
    pub fn record(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.index.contains(name) {
            return Ok(());
        }

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        writeln!(file, "{name}")?;

        inner.index.insert(name.to_string());
        inner.names.push(name.to_string());
        drop(inner);

        self.notifier.emit(Event::CatalogChanged);
        Ok(())
    }

    /// Truncate the persisted file and empty the in-memory set. Runs before
    /// any track directory removal during delete-all (see the ingestion
    /// pipeline for why that ordering matters).
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        File::create(&self.path)?;

        inner.names.clear();
        inner.index.clear();
        drop(inner);

        info!("catalog cleared");
        self.notifier.emit(Event::CatalogChanged);
        Ok(())
    }

    /// Catalog entries in file order.
    pub fn names(&self) -> Vec<String> {
        self.inner.lock().unwrap().names.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
