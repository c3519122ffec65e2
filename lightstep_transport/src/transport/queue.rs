/**
 * Bounded FIFO between submitting threads and the worker.
 *
 * A thin layer over `crossbeam_channel::bounded`. The controller keeps
 * both ends: the sender for `push`, and a receiver for the non-blocking
 * `try_pop` used by `close()` when no worker is left to drain the queue.
 * The worker gets its own receiver clone via `receiver()`.
 *
 * `push` blocks while the queue is full. Backpressure lands on the
 * submitting thread rather than dropping reports or growing memory.
 */
use crossbeam_channel::{Receiver, SendError, Sender};

use crate::protocol::constants::QUEUE_CAPACITY;
use crate::protocol::types::WorkerMsg;

pub struct JobQueue {
    sender: Sender<WorkerMsg>,
    receiver: Receiver<WorkerMsg>,
}

impl JobQueue {
    /// Creates an empty queue holding at most `QUEUE_CAPACITY` messages.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(QUEUE_CAPACITY);
        Self { sender, receiver }
    }

    /**
     * Appends `msg` at the tail, blocking until a slot is free.
     *
     * Only fails if every receiver is gone, which cannot happen while
     * this `JobQueue` is alive since it holds one itself.
     */
    pub fn push(&self, msg: WorkerMsg) -> Result<(), SendError<WorkerMsg>> {
        self.sender.send(msg)
    }

    /// Removes the head without blocking. `None` if the queue is empty.
    pub fn try_pop(&self) -> Option<WorkerMsg> {
        self.receiver.try_recv().ok()
    }

    /// A consuming end for the worker thread.
    pub fn receiver(&self) -> Receiver<WorkerMsg> {
        self.receiver.clone()
    }

    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}
