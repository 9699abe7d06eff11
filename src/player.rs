//! Upward API facade: what a front-end talks to.
//!
//! `Player` wires the catalog, the ingestion pipeline, the playback engine
//! and the notifier together by explicit composition and re-exposes their
//! operations. A UI renders `list_catalog` and the events it subscribes to;
//! it never reaches into the components directly.

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::Result;
use crate::events::{Event, Notifier};
use crate::ingest::{ImportResult, Importer};
use crate::playback::{OutputFactory, PlaybackEngine, PlaybackState, RodioOutputFactory};

pub struct Player {
    notifier: Arc<Notifier>,
    catalog: Arc<Catalog>,
    importer: Importer,
    engine: PlaybackEngine,
}

impl Player {
    /// Build a player around the real audio device.
    pub fn new(settings: Settings) -> Result<Self> {
        let queue_depth = settings.audio.queue_depth;
        Self::with_output(settings, Arc::new(RodioOutputFactory { queue_depth }))
    }

    /// Build a player with an injected output factory (tests, embedders
    /// with their own audio plumbing).
    pub fn with_output(settings: Settings, factory: Arc<dyn OutputFactory>) -> Result<Self> {
        let notifier = Arc::new(Notifier::new());
        let catalog = Arc::new(Catalog::open(
            &settings.library.catalog_file,
            notifier.clone(),
        )?);
        let importer = Importer::new(catalog.clone(), &settings.library.audio_root);
        let engine = PlaybackEngine::new(
            &settings.library.audio_root,
            settings.audio.clone(),
            factory,
            notifier.clone(),
        );
        Ok(Self {
            notifier,
            catalog,
            importer,
            engine,
        })
    }

    // -- ingestion --

    pub fn import_file(&self, path: &Path) -> ImportResult {
        self.importer.import_file(path)
    }

    pub fn import_directory(&self, dir: &Path) -> Vec<ImportResult> {
        self.importer.import_directory(dir)
    }

    /// Remove every track: catalog first, then the audio root tree.
    pub fn delete_all(&self) -> Result<()> {
        self.importer.delete_all()
    }

    /// Known track names in import order.
    pub fn list_catalog(&self) -> Vec<String> {
        self.catalog.names()
    }

    // -- playback --

    pub fn load(&self, name: &str) -> Result<()> {
        self.engine.load(name)
    }

    pub fn play(&self) -> Result<()> {
        self.engine.play()
    }

    pub fn pause(&self) -> Result<()> {
        self.engine.pause()
    }

    /// Play/pause with a single control, for the one-button UI.
    pub fn toggle(&self) -> Result<()> {
        self.engine.toggle()
    }

    pub fn stop(&self) -> Result<()> {
        self.engine.stop()
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    // -- events --

    pub fn subscribe(&self, callback: impl Fn(&Event) + Send + 'static) {
        self.notifier.subscribe(callback);
    }
}
