//! Host-side frame ticker.
//!
//! A background thread emits [`FrameTick`]s at a fixed rate into a bounded
//! channel. When the consumer falls behind, ticks are dropped rather than
//! queued, so a slow renderer never accumulates a backlog and `stop()` never
//! waits on a full channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{Sender, TrySendError};

/// One display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    pub index: u64,
}

/// Background ticker thread.
pub struct FrameClock {
    running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl FrameClock {
    /// Start ticking at `fps` (clamped to 1..=240) into `tick_tx`.
    ///
    /// The thread exits on `stop()` or when the receiver is dropped.
    pub fn start(fps: u32, tick_tx: Sender<FrameTick>) -> Result<Self, String> {
        let fps = fps.clamp(1, 240);
        let period = Duration::from_secs_f64(1.0 / fps as f64);
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let thread = thread::Builder::new()
            .name("kscope-frame-clock".to_string())
            .spawn(move || {
                let mut index = 0u64;
                while running_clone.load(Ordering::Relaxed) {
                    thread::sleep(period);
                    match tick_tx.try_send(FrameTick { index }) {
                        Ok(()) => index += 1,
                        Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Disconnected(_)) => break,
                    }
                }
                running_clone.store(false, Ordering::Relaxed);
            })
            .map_err(|e| format!("Failed to spawn frame clock thread: {e}"))?;

        log::info!("Frame clock started at {fps} fps");
        Ok(Self {
            running,
            thread: Some(thread),
        })
    }

    /// Signal the thread to stop and wait for it. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
            log::info!("Frame clock stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Drop for FrameClock {
    fn drop(&mut self) {
        self.stop();
    }
}
