/**
 * Background worker thread that drains the job queue and delivers
 * reports to the collector.
 *
 * Architecture overview:
 *
 * ```text
 *  ┌─────────────┐     bounded queue (16)    ┌────────────────┐
 *  │ submit()     │ ───── WorkerMsg ───────► │ Worker thread  │
 *  │ (any thread) │                          │ (single)       │
 *  └─────────────┘                          └───────┬────────┘
 *                                                   │
 *                                            Deliver::deliver()
 *                                                   │
 *                                            ┌──────▼──────┐
 *                                            │  Collector  │
 *                                            └─────────────┘
 * ```
 *
 * The loop ends on the `Shutdown` sentinel, when the queue disconnects,
 * or when the controller abandons the worker after a fork. A failing or
 * panicking delivery never ends it. Jobs are handled one at a time, so
 * deliveries never overlap and keep queue order.
 */
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use log::{debug, error, warn};

use super::http::Deliver;
use crate::protocol::constants::{VERBOSITY_DEBUG, VERBOSITY_WARN};
use crate::protocol::types::WorkerMsg;

// ---------------------------------------------------------------------------
// Worker mode — how the loop treats the jobs it pops
// ---------------------------------------------------------------------------

/// Deliver every job.
const MODE_RUNNING: u8 = 0;

/// Drop jobs until the shutdown sentinel arrives.
const MODE_DISCARDING: u8 = 1;

/// Stop at the next message without delivering it.
const MODE_ABANDONED: u8 = 2;

// ---------------------------------------------------------------------------
// WorkerHandle
// ---------------------------------------------------------------------------

/**
 * Controller-side handle to the single worker thread.
 *
 * Records the owner identity the worker was spawned under, so the
 * controller can tell when a fork has left it behind.
 */
pub struct WorkerHandle {
    owner: u32,
    mode: Arc<AtomicU8>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn owner(&self) -> u32 {
        self.owner
    }

    /// `false` once the loop has ended (shutdown, disconnect, or abandon).
    pub fn is_alive(&self) -> bool {
        !self.thread.is_finished()
    }

    /**
     * Makes the worker drop queued jobs instead of delivering them.
     * A delivery already in progress still runs to completion.
     */
    pub fn discard_pending(&self) {
        let _ = self.mode.compare_exchange(
            MODE_RUNNING,
            MODE_DISCARDING,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    /**
     * Best-effort termination: the worker stops at its next message.
     * Does not wait. Anything still queued is never delivered.
     */
    pub fn abandon(&self) {
        self.mode.store(MODE_ABANDONED, Ordering::SeqCst);
    }

    /**
     * Waits for the worker thread to exit.
     *
     * Delivery panics are caught inside the loop, so a join error would
     * carry nothing the loop has not already logged.
     */
    pub fn join(self) {
        let _ = self.thread.join();
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

pub struct Worker;

impl Worker {
    /**
     * Spawns the worker thread.
     *
     * # Arguments
     * * `receiver` — consuming end of the job queue.
     * * `transport` — performs the network submission for each job.
     * * `owner` — identity of the process spawning the worker.
     */
    pub fn spawn(
        receiver: Receiver<WorkerMsg>,
        transport: Arc<dyn Deliver>,
        owner: u32,
    ) -> io::Result<WorkerHandle> {
        let mode = Arc::new(AtomicU8::new(MODE_RUNNING));
        let loop_mode = Arc::clone(&mode);

        let thread = thread::Builder::new()
            .name("lightstep-reporter".into())
            .spawn(move || Self::run_loop(&receiver, transport.as_ref(), &loop_mode))?;

        Ok(WorkerHandle {
            owner,
            mode,
            thread,
        })
    }

    fn run_loop(receiver: &Receiver<WorkerMsg>, transport: &dyn Deliver, mode: &AtomicU8) {
        while let Ok(msg) = receiver.recv() {
            let job = match msg {
                WorkerMsg::Shutdown => break,
                WorkerMsg::Job(job) => job,
            };

            match mode.load(Ordering::SeqCst) {
                MODE_ABANDONED => break,
                MODE_DISCARDING => {
                    if job.connection.verbosity >= VERBOSITY_DEBUG {
                        debug!("Discarding pending report on close");
                    }
                    continue;
                }
                _ => {}
            }

            /*
             * Delivery is attempted exactly once. Errors and panics alike are
             * logged and dropped here on purpose: nothing is retried, nothing
             * reaches the submitting thread, and the loop keeps draining so a
             * full queue never wedges producers.
             */
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                transport.deliver(&job)
            }));

            if job.connection.verbosity < VERBOSITY_WARN {
                continue;
            }
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!("Failed to deliver report to {}: {err}", job.connection.endpoint());
                }
                Err(_) => {
                    error!("Report transport panicked; dropping report");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::protocol::types::{ConnectionConfig, DeliveryJob};
    use crate::testing::{wait_until, TestTransport, FAIL, PANIC};
    use crate::transport::JobQueue;

    fn job(content: Value) -> WorkerMsg {
        let connection = ConnectionConfig {
            host: "localhost".into(),
            port: 80,
            secure: false,
            verbosity: 0,
        };
        WorkerMsg::Job(DeliveryJob::new(connection, "tok", content))
    }

    fn spawn(queue: &JobQueue, transport: &Arc<TestTransport>) -> WorkerHandle {
        let transport: Arc<dyn Deliver> = transport.clone();
        Worker::spawn(queue.receiver(), transport, 1).expect("spawn worker")
    }

    #[test]
    fn test_delivers_in_order_and_stops_on_sentinel() {
        let queue = JobQueue::new();
        let transport = Arc::new(TestTransport::open());
        let worker = spawn(&queue, &transport);

        for n in 0..5 {
            queue.push(job(json!(n))).expect("push");
        }
        queue.push(WorkerMsg::Shutdown).expect("push");
        worker.join();

        assert_eq!(transport.contents(), vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
        assert!(queue.is_empty());
    }

    /**
     * A failed delivery is dropped and the worker moves on to the next job.
     */
    #[test]
    fn test_failure_does_not_stop_the_loop() {
        let queue = JobQueue::new();
        let transport = Arc::new(TestTransport::open());
        let worker = spawn(&queue, &transport);

        queue.push(job(json!(FAIL))).expect("push");
        queue.push(job(json!("after"))).expect("push");
        queue.push(WorkerMsg::Shutdown).expect("push");
        worker.join();

        assert_eq!(transport.contents(), vec![json!(FAIL), json!("after")]);
    }

    #[test]
    fn test_discard_mode_drops_queued_jobs() {
        let queue = JobQueue::new();
        let transport = Arc::new(TestTransport::gated());
        let worker = spawn(&queue, &transport);

        queue.push(job(json!(1))).expect("push");
        assert_eq!(transport.wait_started(), json!(1));

        queue.push(job(json!(2))).expect("push");
        queue.push(job(json!(3))).expect("push");
        worker.discard_pending();
        queue.push(WorkerMsg::Shutdown).expect("push");
        transport.release();
        worker.join();

        assert_eq!(transport.contents(), vec![json!(1)]);
    }

    #[test]
    fn test_abandoned_worker_stops_without_delivering() {
        let queue = JobQueue::new();
        let transport = Arc::new(TestTransport::gated());
        let worker = spawn(&queue, &transport);

        queue.push(job(json!(1))).expect("push");
        transport.wait_started();
        queue.push(job(json!(2))).expect("push");

        worker.abandon();
        transport.release();

        assert!(wait_until(|| !worker.is_alive()));
        assert_eq!(transport.contents(), vec![json!(1)]);
    }

    #[test]
    fn test_panicking_delivery_is_dropped_and_loop_continues() {
        let queue = JobQueue::new();
        let transport = Arc::new(TestTransport::open());
        let worker = spawn(&queue, &transport);

        queue.push(job(json!(PANIC))).expect("push");
        queue.push(job(json!("after"))).expect("push");
        queue.push(WorkerMsg::Shutdown).expect("push");
        worker.join();

        assert_eq!(transport.contents(), vec![json!("after")]);
        assert!(queue.is_empty());
    }
}
