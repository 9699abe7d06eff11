use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tempfile::tempdir;

use super::Player;
use crate::config::{AudioSettings, LibrarySettings, Settings};
use crate::error::Error;
use crate::ingest::ImportResult;
use crate::playback::{AudioOutput, OutputFactory, PlaybackState, StreamSpec};
use crate::track::Track;

/// Counts frames instead of playing them; end-to-end tests only care that
/// the stream flows.
struct CountingOutput {
    frames: Arc<AtomicUsize>,
}

impl AudioOutput for CountingOutput {
    fn write(&mut self, frames: &[f32]) -> crate::Result<()> {
        self.frames.fetch_add(frames.len(), Ordering::SeqCst);
        Ok(())
    }

    fn drain(&mut self) {}
}

struct CountingFactory {
    frames: Arc<AtomicUsize>,
}

impl OutputFactory for CountingFactory {
    fn open(&self, _spec: StreamSpec) -> crate::Result<Box<dyn AudioOutput>> {
        Ok(Box::new(CountingOutput {
            frames: self.frames.clone(),
        }))
    }
}

fn write_source_wav(path: &Path, frames: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22_050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        writer.write_sample((i % 128) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn player_at(root: &Path) -> (Player, Arc<AtomicUsize>) {
    let settings = Settings {
        library: LibrarySettings {
            audio_root: root.join("Audio"),
            catalog_file: root.join("Audio").join("song_list.txt"),
        },
        audio: AudioSettings {
            chunk_frames: 256,
            queue_depth: 4,
        },
    };
    let frames = Arc::new(AtomicUsize::new(0));
    let factory = Arc::new(CountingFactory {
        frames: frames.clone(),
    });
    (Player::with_output(settings, factory).unwrap(), frames)
}

fn wait_until(f: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if f() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    f()
}

// Import, re-import, delete-all, then load: the full ingestion lifecycle
// as a front-end would drive it.
#[test]
fn import_then_delete_all_lifecycle() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("song1.wav");
    write_source_wav(&src, 1000);
    let (player, _) = player_at(dir.path());

    assert!(matches!(
        player.import_file(&src),
        ImportResult::Imported(ref name) if name == "song1"
    ));
    assert_eq!(player.list_catalog(), vec!["song1"]);
    let canonical = Track::canonical_path(&dir.path().join("Audio"), "song1");
    assert!(canonical.is_file());

    assert!(matches!(
        player.import_file(&src),
        ImportResult::Skipped(_, _)
    ));
    assert_eq!(player.list_catalog(), vec!["song1"]);

    player.delete_all().unwrap();
    assert!(player.list_catalog().is_empty());
    assert!(!dir.path().join("Audio").exists());

    assert!(matches!(
        player.load("song1"),
        Err(Error::TrackNotFound(_))
    ));
}

#[test]
fn imported_track_plays_through_the_engine() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("tune.wav");
    write_source_wav(&src, 2000);
    let (player, frames) = player_at(dir.path());

    assert!(matches!(player.import_file(&src), ImportResult::Imported(_)));
    player.load("tune").unwrap();
    player.toggle().unwrap();
    assert!(wait_until(|| player.state() == PlaybackState::Idle));

    // Mono source: one sample per frame.
    assert_eq!(frames.load(Ordering::SeqCst), 2000);
}

#[test]
fn catalog_survives_player_restart() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("keeper.wav");
    write_source_wav(&src, 500);

    {
        let (player, _) = player_at(dir.path());
        assert!(matches!(player.import_file(&src), ImportResult::Imported(_)));
    }

    let (player, _) = player_at(dir.path());
    assert_eq!(player.list_catalog(), vec!["keeper"]);
    player.load("keeper").unwrap();
    assert_eq!(player.state(), PlaybackState::Loaded);
}

#[test]
fn directory_import_reports_each_file() {
    let dir = tempdir().unwrap();
    let incoming = dir.path().join("incoming");
    std::fs::create_dir_all(&incoming).unwrap();
    write_source_wav(&incoming.join("a.wav"), 200);
    std::fs::write(incoming.join("b.mp3"), b"not audio at all").unwrap();
    write_source_wav(&incoming.join("c.wav"), 200);

    let (player, _) = player_at(dir.path());
    let results = player.import_directory(&incoming);

    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], ImportResult::Imported(ref n) if n == "a"));
    assert!(matches!(results[1], ImportResult::Failed(_, _)));
    assert!(matches!(results[2], ImportResult::Imported(ref n) if n == "c"));
    assert_eq!(player.list_catalog(), vec!["a", "c"]);
}

#[test]
fn subscribers_see_catalog_changes() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("song.wav");
    write_source_wav(&src, 100);
    let (player, _) = player_at(dir.path());

    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_cb = seen.clone();
    player.subscribe(move |event| {
        if matches!(event, crate::events::Event::CatalogChanged) {
            seen_in_cb.fetch_add(1, Ordering::SeqCst);
        }
    });

    assert!(matches!(player.import_file(&src), ImportResult::Imported(_)));
    player.delete_all().unwrap();

    assert!(wait_until(|| seen.load(Ordering::SeqCst) == 2));
}
