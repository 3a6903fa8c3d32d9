//! User input channel guarded by the answering lock.
//!
//! The UI holds an [`InputHandle`]; the orchestrator owns the matching
//! [`InputQueue`]. Both share one lock flag. While the lock is held the handle
//! drops every input instead of queueing it, and acquiring the lock discards
//! anything still pending, so one burst of clicks yields at most one answer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// An input event raised by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourInput {
    /// The user clicked the answer at this index.
    AnswerSelected(usize),
    /// The user asked to leave the tour for the menu.
    MenuExitRequested,
}

/// What happened to an input handed to [`InputHandle::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The input was queued for the orchestrator.
    Queued,
    /// The answering lock was held; the input was dropped.
    Locked,
    /// The queue was full; the input was dropped.
    Full,
    /// The orchestrator is gone.
    Closed,
}

/// Sending side of the input channel, held by the presentation layer.
#[derive(Debug, Clone)]
pub struct InputHandle {
    sender: mpsc::Sender<TourInput>,
    locked: Arc<AtomicBool>,
}

impl InputHandle {
    /// Offers an input to the orchestrator. Never blocks.
    pub fn send(&self, input: TourInput) -> Delivery {
        if self.locked.load(Ordering::Acquire) {
            tracing::debug!(?input, "input dropped while answering lock is held");
            return Delivery::Locked;
        }
        match self.sender.try_send(input) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(?input, "input queue full, dropping input");
                Delivery::Full
            }
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Shorthand for sending [`TourInput::AnswerSelected`].
    pub fn answer_selected(&self, index: usize) -> Delivery {
        self.send(TourInput::AnswerSelected(index))
    }

    /// Shorthand for sending [`TourInput::MenuExitRequested`].
    pub fn menu_exit_requested(&self) -> Delivery {
        self.send(TourInput::MenuExitRequested)
    }

    /// Returns whether the answering lock is currently held.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }
}

/// Receiving side of the input channel, owned by the orchestrator.
#[derive(Debug)]
pub struct InputQueue {
    receiver: mpsc::Receiver<TourInput>,
    locked: Arc<AtomicBool>,
}

impl InputQueue {
    /// Waits for the next queued input. Returns `None` once every
    /// [`InputHandle`] has been dropped and the queue is empty.
    pub async fn next(&mut self) -> Option<TourInput> {
        self.receiver.recv().await
    }

    /// Returns whether the answering lock is currently held.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Acquires the answering lock and discards every pending input.
    ///
    /// Returns `false` without side effects if the lock is already held.
    pub fn try_lock(&mut self) -> bool {
        if self.locked.swap(true, Ordering::AcqRel) {
            return false;
        }
        let mut discarded = 0_usize;
        while let Ok(input) = self.receiver.try_recv() {
            tracing::debug!(?input, "discarding input queued behind an accepted one");
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!(discarded, "pending inputs discarded on lock");
        }
        true
    }

    /// Releases the answering lock.
    pub fn release(&mut self) {
        self.locked.store(false, Ordering::Release);
    }
}

/// Creates a bounded input channel. The answering lock starts held, so no
/// input is accepted before the first challenge is on screen.
#[must_use]
pub fn input_channel(capacity: usize) -> (InputHandle, InputQueue) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let locked = Arc::new(AtomicBool::new(true));
    (
        InputHandle {
            sender,
            locked: Arc::clone(&locked),
        },
        InputQueue { receiver, locked },
    )
}
