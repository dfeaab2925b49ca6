//! Latest-wins debounce for file content commits.
//!
//! Content events arrive once per chunk, far faster than an editor can
//! usefully repaint. [`UpdateCoalescer`] keeps a single pending
//! `(file_id, content)` slot and a single timer; every post overwrites the
//! slot and restarts the timer, and only when the stream pauses for a full
//! settling window is one `update_file_content` issued.
//!
//! Content events for the active file are strictly sequential, so one slot
//! is enough. The slot stores the id and content together, so a firing
//! timer always commits the most recently posted pair.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::traits::{FileModel, ModelHandle};

/// A write waiting for the settling window to elapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub file_id: String,
    pub content: String,
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<PendingWrite>,
    /// Bumped on every post and cancel; a timer only commits if it still
    /// holds the current generation.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Trailing-edge debouncer in front of the file model.
///
/// Must be used from within a tokio runtime; the timer is a spawned task.
#[derive(Debug)]
pub struct UpdateCoalescer {
    window: Duration,
    model: ModelHandle,
    slot: Arc<Mutex<Slot>>,
}

impl UpdateCoalescer {
    pub fn new(window: Duration, model: ModelHandle) -> Self {
        Self {
            window,
            model,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Replace the pending write and restart the settling timer.
    pub fn post(&self, file_id: impl Into<String>, content: impl Into<String>) {
        let mut slot = lock_unpoisoned(&self.slot);
        slot.generation = slot.generation.wrapping_add(1);
        slot.pending = Some(PendingWrite {
            file_id: file_id.into(),
            content: content.into(),
        });
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let model = self.model.clone();
        let window = self.window;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            commit(&shared, &model, generation);
        }));
    }

    /// Drop the pending write and stop the timer without committing.
    pub fn cancel(&self) {
        let mut slot = lock_unpoisoned(&self.slot);
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        if let Some(dropped) = slot.pending.take() {
            tracing::trace!(file_id = %dropped.file_id, "pending content write cancelled");
        }
    }

    pub fn has_pending(&self) -> bool {
        lock_unpoisoned(&self.slot).pending.is_some()
    }

    /// The write that would be committed if the timer fired now.
    pub fn pending(&self) -> Option<PendingWrite> {
        lock_unpoisoned(&self.slot).pending.clone()
    }
}

impl Drop for UpdateCoalescer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn commit(shared: &Mutex<Slot>, model: &ModelHandle, generation: u64) {
    // Held through the model call: `cancel` and `post` wait for an in-flight commit
    let mut slot = lock_unpoisoned(shared);
    if slot.generation != generation {
        return;
    }
    slot.timer = None;
    let Some(write) = slot.pending.take() else {
        return;
    };
    tracing::trace!(file_id = %write.file_id, len = write.content.len(), "committing coalesced content");

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        model.update_file_content(&write.file_id, &write.content)
    }));
    if outcome.is_err() {
        tracing::warn!(file_id = %write.file_id, "file model panicked during content commit");
    }
}
