//! Playback queue and worker lifecycle
//!
//! Jobs enqueue on the main thread; a single background worker drains
//! them in FIFO order. The worker is spawned on demand and exits after
//! the queue has stayed empty for one idle poll interval.

use crate::playback::output::{AudioOutput, OutputFactory};
use crate::Result;
use log::{debug, error};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// How long the worker waits on an empty queue before going idle
const IDLE_POLL: Duration = Duration::from_millis(500);

/// How often the worker checks whether playback has finished
const BUSY_TICK: Duration = Duration::from_millis(100);

/// One queued unit of not-yet-played audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackJob {
    /// Audio file to play
    pub file_path: PathBuf,
    /// Original text, for display only
    pub text: String,
}

impl PlaybackJob {
    pub fn new(file_path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            text: text.into(),
        }
    }
}

/// FIFO job queue plus the single-worker lifecycle flag
///
/// Playback order equals enqueue order. At most one worker thread is
/// ever active; the compare-and-set on `worker_active` guarantees it.
pub struct PlaybackManager {
    inner: Arc<Inner>,
}

struct Inner {
    queue: Mutex<VecDeque<PlaybackJob>>,
    worker_active: AtomicBool,
    idle_poll: Duration,
    busy_tick: Duration,
    output_factory: OutputFactory,
}

impl PlaybackManager {
    /// Create a manager with the default poll intervals
    pub fn new(output_factory: OutputFactory) -> Self {
        Self::with_intervals(output_factory, IDLE_POLL, BUSY_TICK)
    }

    /// Create a manager with explicit poll intervals
    pub fn with_intervals(
        output_factory: OutputFactory,
        idle_poll: Duration,
        busy_tick: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(VecDeque::new()),
                worker_active: AtomicBool::new(false),
                idle_poll,
                busy_tick,
                output_factory,
            }),
        }
    }

    /// Queue a job for playback, starting a worker if none is running
    pub fn enqueue(&self, job: PlaybackJob) {
        debug!("Enqueuing {:?}", job.file_path);
        self.inner.queue.lock().unwrap().push_back(job);
        ensure_worker(&self.inner);
    }

    /// Number of jobs waiting, not counting one currently playing
    pub fn queued(&self) -> usize {
        self.inner.queue.lock().unwrap().len()
    }

    /// Whether a worker thread is currently draining the queue
    pub fn is_draining(&self) -> bool {
        self.inner.worker_active.load(Ordering::SeqCst)
    }

    /// Block until the worker has gone idle with an empty queue
    ///
    /// Returns false if the timeout elapsed first.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_draining() || self.queued() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        true
    }
}

/// Spawn a worker unless one is already active
fn ensure_worker(inner: &Arc<Inner>) {
    if inner
        .worker_active
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        debug!("Starting playback worker");
        let inner = Arc::clone(inner);
        thread::spawn(move || worker_loop(inner));
    }
}

/// Drain the queue, then exit once it stays empty for one idle poll
fn worker_loop(inner: Arc<Inner>) {
    let mut output = match (inner.output_factory)() {
        Ok(output) => output,
        Err(e) => {
            error!("Audio output unavailable: {}", e);
            // Jobs stay queued; the next enqueue retries the device.
            inner.worker_active.store(false, Ordering::SeqCst);
            return;
        }
    };

    loop {
        let job = inner.queue.lock().unwrap().pop_front();
        match job {
            Some(job) => {
                if let Err(e) = play_job(output.as_mut(), &job, inner.busy_tick) {
                    error!("Playback failed for {:?}: {}", job.file_path, e);
                }
            }
            None => {
                thread::sleep(inner.idle_poll);
                if inner.queue.lock().unwrap().is_empty() {
                    break;
                }
            }
        }
    }

    debug!("Playback worker going idle");
    inner.worker_active.store(false, Ordering::SeqCst);

    // An enqueue may have raced the flag store; respawn so the job is
    // not stranded until the next enqueue.
    if !inner.queue.lock().unwrap().is_empty() {
        ensure_worker(&inner);
    }
}

/// Play one job to completion
fn play_job(output: &mut dyn AudioOutput, job: &PlaybackJob, busy_tick: Duration) -> Result<()> {
    println!("Playing: {}", preview(&job.text));
    output.load(&job.file_path)?;
    output.play()?;
    while output.is_busy() {
        thread::sleep(busy_tick);
    }
    Ok(())
}

/// Leading characters of the text, for display
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 30;
    let mut shortened: String = text.chars().take(MAX_CHARS).collect();
    if text.chars().count() > MAX_CHARS {
        shortened.push('…');
    }
    shortened
}
