//! Delivery of patterns to the render thread.
//!
//! Producers (a stdin reader, a network client, a one-shot request) hold a
//! [`PatternSink`]; the render loop owns the [`PatternFeed`]. The renderer
//! itself never sees the channel.

use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use kscope_core::{decode_message, PatternData};

/// Result of polling the feed once.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedState {
    Pattern(PatternData),
    Idle,
    /// Every sink has been dropped and the queue is empty.
    Closed,
}

/// Producer side. Cloning yields another handle to the same queue.
#[derive(Debug, Clone)]
pub struct PatternSink {
    tx: Sender<PatternData>,
}

impl PatternSink {
    /// Queue a pattern without blocking. Returns `false` when the queue is
    /// full or the feed is gone; the pattern is dropped in that case.
    pub fn send(&self, pattern: PatternData) -> bool {
        match self.tx.try_send(pattern) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!("Pattern feed full, dropping pattern");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Decode a JSON message (bare pattern, push notification or one-shot
    /// response) and queue its pattern.
    pub fn send_message(&self, json: &str) -> Result<bool, String> {
        let message = decode_message(json)?;
        if let Some(perf) = &message.performance {
            log::debug!(
                "Pattern received: {} rays in {:.3}s, {:.2} avg bounces",
                perf.ray_count,
                perf.computation_time,
                perf.avg_bounces
            );
        }
        Ok(self.send(message.pattern))
    }
}

/// Consumer side.
#[derive(Debug)]
pub struct PatternFeed {
    rx: Receiver<PatternData>,
}

impl PatternFeed {
    pub fn poll(&self) -> FeedState {
        match self.rx.try_recv() {
            Ok(pattern) => FeedState::Pattern(pattern),
            Err(TryRecvError::Empty) => FeedState::Idle,
            Err(TryRecvError::Disconnected) => FeedState::Closed,
        }
    }

    /// Drain the queue and return the newest pattern, if any. Older queued
    /// patterns are superseded.
    pub fn latest(&self) -> Option<PatternData> {
        self.rx.try_iter().last()
    }

    /// `true` once every sink is dropped and the queue is drained.
    pub fn is_closed(&self) -> bool {
        self.rx.is_empty() && matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }
}

/// Create a connected sink/feed pair holding at most `capacity` patterns.
pub fn pattern_channel(capacity: usize) -> (PatternSink, PatternFeed) {
    let (tx, rx) = bounded(capacity.max(1));
    (PatternSink { tx }, PatternFeed { rx })
}
