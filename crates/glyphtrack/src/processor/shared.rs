//! Thread-safe front end for frames arriving from capture callbacks.

use std::sync::atomic::{AtomicU64, Ordering};

use glyphtrack_db::GlyphDatabase;
use parking_lot::Mutex;

use super::{FrameInput, FrameResult, GlyphProcessor};

/// A [`GlyphProcessor`] that can be fed from several threads.
///
/// Frames are processed one at a time, in a single critical section each.
/// A frame submitted while another thread is processing is parked in a
/// one-slot mailbox; a newer submission replaces it, so a slow frame never
/// builds up a queue. The thread that holds the processor drains the
/// mailbox before it lets go.
#[derive(Debug)]
pub struct SharedGlyphProcessor {
    processor: Mutex<GlyphProcessor>,
    pending: Mutex<Option<FrameInput>>,
    dropped: AtomicU64,
}

impl SharedGlyphProcessor {
    pub fn new(processor: GlyphProcessor) -> Self {
        Self {
            processor: Mutex::new(processor),
            pending: Mutex::new(None),
            dropped: AtomicU64::new(0),
        }
    }

    /// Submit a frame.
    ///
    /// Returns the result of the last frame processed by this call, or
    /// `None` if another thread is busy; that thread then processes the
    /// frame unless a newer one supersedes it first.
    pub fn submit(&self, frame: FrameInput) -> Option<FrameResult> {
        if self.pending.lock().replace(frame).is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            log::debug!("dropped a superseded frame");
        }

        let mut last = None;
        loop {
            let Some(mut processor) = self.processor.try_lock() else {
                return last;
            };
            loop {
                let next = self.pending.lock().take();
                let Some(frame) = next else {
                    break;
                };
                last = Some(processor.process_frame(frame));
            }
            drop(processor);

            // a frame may have been parked after the drain but before the unlock
            if self.pending.lock().is_none() {
                return last;
            }
        }
    }

    /// Run `f` with exclusive access, waiting for the frame in flight.
    pub fn with_processor<R>(&self, f: impl FnOnce(&mut GlyphProcessor) -> R) -> R {
        f(&mut self.processor.lock())
    }

    /// Swap the database and reset tracking.
    pub fn set_database(&self, database: GlyphDatabase) -> GlyphDatabase {
        self.with_processor(|p| p.set_database(database))
    }

    pub fn reset(&self) {
        self.with_processor(GlyphProcessor::reset)
    }

    /// Frames replaced in the mailbox before they could be processed.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn into_inner(self) -> GlyphProcessor {
        self.processor.into_inner()
    }
}
