//! Test doubles shared by the worker and controller tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use serde_json::Value;

use crate::error::DeliveryError;
use crate::identity::OwnerIdentity;
use crate::protocol::types::DeliveryJob;
use crate::transport::Deliver;

/// Content that makes `TestTransport` fail the delivery.
pub const FAIL: &str = "fail";

/// Content that makes `TestTransport` panic inside the worker.
pub const PANIC: &str = "panic";

/**
 * Records every attempted job. Optionally holds deliveries behind a gate
 * so tests can keep the worker busy on a known job.
 */
pub struct TestTransport {
    attempts: Mutex<Vec<DeliveryJob>>,
    gate_open: Mutex<bool>,
    gate: Condvar,
    started_tx: Sender<Value>,
    started_rx: Receiver<Value>,
}

impl TestTransport {
    pub fn open() -> Self {
        Self::with_gate(true)
    }

    /// Every delivery blocks until `release()` is called.
    pub fn gated() -> Self {
        Self::with_gate(false)
    }

    fn with_gate(open: bool) -> Self {
        let (started_tx, started_rx) = crossbeam_channel::unbounded();
        Self {
            attempts: Mutex::new(Vec::new()),
            gate_open: Mutex::new(open),
            gate: Condvar::new(),
            started_tx,
            started_rx,
        }
    }

    pub fn release(&self) {
        *self.gate_open.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.gate.notify_all();
    }

    /// Blocks until a delivery has started and returns its content.
    pub fn wait_started(&self) -> Value {
        self.started_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("no delivery started in time")
    }

    pub fn attempts(&self) -> Vec<DeliveryJob> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contents(&self) -> Vec<Value> {
        self.attempts().into_iter().map(|job| job.content).collect()
    }
}

impl Deliver for TestTransport {
    fn deliver(&self, job: &DeliveryJob) -> Result<(), DeliveryError> {
        let _ = self.started_tx.send(job.content.clone());

        let open = self.gate_open.lock().unwrap_or_else(PoisonError::into_inner);
        drop(
            self.gate
                .wait_while(open, |open| !*open)
                .unwrap_or_else(PoisonError::into_inner),
        );

        if job.content == PANIC {
            panic!("transport blew up");
        }

        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(job.clone());

        if job.content == FAIL {
            Err(DeliveryError::Rejected { status: 500 })
        } else {
            Ok(())
        }
    }
}

/// Identity whose value the test can change to simulate a fork.
pub struct TestIdentity(AtomicU32);

impl TestIdentity {
    pub fn new(id: u32) -> Self {
        Self(AtomicU32::new(id))
    }

    pub fn set(&self, id: u32) {
        self.0.store(id, Ordering::SeqCst);
    }
}

impl OwnerIdentity for TestIdentity {
    fn current(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Polls `cond` until it holds or five seconds pass.
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}
