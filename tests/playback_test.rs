//! Integration tests for the playback pipeline
//!
//! A scripted fake output stands in for the audio device, so ordering,
//! worker lifecycle and error recovery are testable without sound
//! hardware.

use koe::playback::{AudioOutput, OutputFactory, PlaybackJob, PlaybackManager};
use koe::{KoeError, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fake device that records what it plays and finishes instantly
struct FakeOutput {
    played: Arc<Mutex<Vec<PathBuf>>>,
    loaded: Option<PathBuf>,
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, path: &Path) -> Result<()> {
        if path.to_string_lossy().contains("corrupt") {
            return Err(KoeError::Playback("unreadable file".to_string()));
        }
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if let Some(path) = self.loaded.take() {
            self.played.lock().unwrap().push(path);
        }
        Ok(())
    }

    fn is_busy(&self) -> bool {
        false
    }
}

fn fake_factory(played: Arc<Mutex<Vec<PathBuf>>>, spawns: Arc<AtomicUsize>) -> OutputFactory {
    Box::new(move || {
        spawns.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeOutput {
            played: played.clone(),
            loaded: None,
        }) as Box<dyn AudioOutput>)
    })
}

/// Manager with short intervals so tests settle quickly
fn fast_manager(factory: OutputFactory) -> PlaybackManager {
    PlaybackManager::with_intervals(factory, Duration::from_millis(50), Duration::from_millis(1))
}

#[test]
fn test_playback_follows_enqueue_order() {
    let played = Arc::new(Mutex::new(Vec::new()));
    let spawns = Arc::new(AtomicUsize::new(0));
    let manager = fast_manager(fake_factory(played.clone(), spawns));

    manager.enqueue(PlaybackJob::new("/tmp/speech_1.mp3", "速報です"));
    manager.enqueue(PlaybackJob::new("/tmp/speech_2.mp3", "以上です"));

    assert!(manager.wait_idle(Duration::from_secs(2)), "worker never went idle");
    assert_eq!(
        *played.lock().unwrap(),
        vec![
            PathBuf::from("/tmp/speech_1.mp3"),
            PathBuf::from("/tmp/speech_2.mp3"),
        ]
    );
}

#[test]
fn test_at_most_one_worker_for_rapid_enqueues() {
    let played = Arc::new(Mutex::new(Vec::new()));
    let spawns = Arc::new(AtomicUsize::new(0));
    let manager = fast_manager(fake_factory(played.clone(), spawns.clone()));

    for i in 0..20 {
        manager.enqueue(PlaybackJob::new(format!("/tmp/speech_{}.mp3", i), "x"));
    }

    assert!(manager.wait_idle(Duration::from_secs(2)), "worker never went idle");
    assert_eq!(played.lock().unwrap().len(), 20);
    assert_eq!(
        spawns.load(Ordering::SeqCst),
        1,
        "rapid enqueues must reuse the active worker"
    );
}

#[test]
fn test_worker_respawns_after_going_idle() {
    let played = Arc::new(Mutex::new(Vec::new()));
    let spawns = Arc::new(AtomicUsize::new(0));
    let manager = fast_manager(fake_factory(played.clone(), spawns.clone()));

    manager.enqueue(PlaybackJob::new("/tmp/speech_1.mp3", "first"));
    assert!(manager.wait_idle(Duration::from_secs(2)), "worker never went idle");
    assert!(!manager.is_draining());

    // A later enqueue finds no worker and starts a fresh one
    manager.enqueue(PlaybackJob::new("/tmp/speech_2.mp3", "second"));
    assert!(manager.wait_idle(Duration::from_secs(2)), "worker never went idle");

    assert_eq!(played.lock().unwrap().len(), 2);
    assert_eq!(spawns.load(Ordering::SeqCst), 2);
}

#[test]
fn test_bad_job_does_not_stop_the_worker() {
    let played = Arc::new(Mutex::new(Vec::new()));
    let spawns = Arc::new(AtomicUsize::new(0));
    let manager = fast_manager(fake_factory(played.clone(), spawns));

    manager.enqueue(PlaybackJob::new("/tmp/speech_1.mp3", "ok"));
    manager.enqueue(PlaybackJob::new("/tmp/corrupt.mp3", "bad"));
    manager.enqueue(PlaybackJob::new("/tmp/speech_3.mp3", "ok again"));

    assert!(manager.wait_idle(Duration::from_secs(2)), "worker never went idle");
    assert_eq!(
        *played.lock().unwrap(),
        vec![
            PathBuf::from("/tmp/speech_1.mp3"),
            PathBuf::from("/tmp/speech_3.mp3"),
        ]
    );
}

#[test]
fn test_device_failure_leaves_jobs_queued() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_in_factory = attempts.clone();
    let factory: OutputFactory = Box::new(move || {
        attempts_in_factory.fetch_add(1, Ordering::SeqCst);
        Err(KoeError::Playback("no audio output device".to_string()))
    });
    let manager = fast_manager(factory);

    manager.enqueue(PlaybackJob::new("/tmp/speech_1.mp3", "stuck"));

    // The single device attempt fails and the worker gives up without
    // consuming the job or respawning in a loop.
    wait_for(Duration::from_secs(2), || {
        attempts.load(Ordering::SeqCst) == 1 && !manager.is_draining()
    });
    assert_eq!(manager.queued(), 1);

    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(attempts.load(Ordering::SeqCst), 1, "worker must not retry on its own");

    // The next enqueue retries the device once more
    manager.enqueue(PlaybackJob::new("/tmp/speech_2.mp3", "also stuck"));
    wait_for(Duration::from_secs(2), || {
        attempts.load(Ordering::SeqCst) == 2 && !manager.is_draining()
    });
    assert_eq!(manager.queued(), 2);
}

fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = std::time::Instant::now() + timeout;
    while !condition() {
        assert!(
            std::time::Instant::now() < deadline,
            "condition not met within {:?}",
            timeout
        );
        std::thread::sleep(Duration::from_millis(10));
    }
}
