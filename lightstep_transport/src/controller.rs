/**
 * The lifecycle controller — owns the job queue and worker, creates them
 * lazily, resets them after a fork, and shuts them down in order.
 *
 * Lifecycle:
 * 1. A new `Controller` is uninitialized: no queue, no worker.
 * 2. The first valid `submit()` creates both and enqueues the report.
 * 3. `close()` drains or discards what is queued, joins the worker, and
 *    returns the controller to the uninitialized state. A later
 *    `submit()` starts over transparently.
 *
 * If the owner identity changes (the process forked), the inherited
 * queue and worker are dropped without draining and recreated on the
 * next call. Reports queued before the fork are lost in the child.
 *
 * All state sits behind one mutex. `submit()` holds it across the push,
 * so a push racing with `close()` lands either before the shutdown
 * sentinel or on a freshly created queue, never on a dead one.
 */
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, warn};
use serde::Serialize;

use crate::config::Options;
use crate::guard::Guard;
use crate::identity::{OwnerIdentity, ProcessIdentity};
use crate::protocol::constants::{VERBOSITY_DEBUG, VERBOSITY_WARN};
use crate::protocol::types::{Auth, ConnectionConfig, DeliveryJob, WorkerMsg};
use crate::transport::{Deliver, HttpTransport, JobQueue, Worker, WorkerHandle};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

struct State {
    /// Settings snapshotted into each new job.
    connection: ConnectionConfig,

    queue: Option<JobQueue>,

    worker: Option<WorkerHandle>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct Controller {
    state: Mutex<State>,
    transport: Arc<dyn Deliver>,
    identity: Arc<dyn OwnerIdentity>,
}

impl Controller {
    /**
     * Creates a controller that delivers over HTTP(S) and detects forks
     * through the OS process id.
     *
     * Timeouts in `options` are fixed here for the controller's lifetime.
     */
    pub fn new(options: &Options) -> Self {
        let transport = HttpTransport::new(options.connect_timeout(), options.request_timeout());
        Self::with_parts(options, Arc::new(transport), Arc::new(ProcessIdentity))
    }

    /**
     * Creates a controller with a custom transport and owner identity.
     */
    pub fn with_parts(
        options: &Options,
        transport: Arc<dyn Deliver>,
        identity: Arc<dyn OwnerIdentity>,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                connection: options.connection(),
                queue: None,
                worker: None,
            }),
            transport,
            identity,
        }
    }

    /**
     * Replaces the connection settings used by subsequent submits.
     * Jobs already queued keep the settings they were created with.
     */
    pub fn ensure_connection(&self, options: &Options) {
        self.lock().connection = options.connection();
    }

    /**
     * Queues a report for background delivery.
     *
     * A missing `auth` or `report` makes this a no-op, as does a report
     * that cannot be converted to JSON. Blocks only while the queue is
     * full. Network problems are never visible here.
     */
    pub fn submit<A, R>(&self, auth: Option<&A>, report: Option<&R>)
    where
        A: Auth + ?Sized,
        R: Serialize + ?Sized,
    {
        let mut state = self.lock();
        let verbosity = state.connection.verbosity;

        let (Some(auth), Some(report)) = (auth, report) else {
            if verbosity >= VERBOSITY_WARN {
                warn!("Auth or report not set.");
            }
            return;
        };

        let content = match serde_json::to_value(report) {
            Ok(content) => content,
            Err(err) => {
                if verbosity >= VERBOSITY_WARN {
                    warn!("Dropping report that failed to serialize: {err}");
                }
                return;
            }
        };

        self.check_owner(&mut state);

        let queue = state.queue.get_or_insert_with(JobQueue::new);
        let receiver = queue.receiver();

        if verbosity >= VERBOSITY_DEBUG {
            debug!("Queueing report ({} pending): {content}", queue.len());
        }

        if !state.worker.as_ref().is_some_and(WorkerHandle::is_alive) {
            match Worker::spawn(receiver, Arc::clone(&self.transport), self.identity.current()) {
                Ok(worker) => state.worker = Some(worker),
                Err(err) => {
                    error!("Failed to spawn report worker: {err}");
                    return;
                }
            }
        }

        let job = DeliveryJob::new(state.connection.clone(), auth.access_token(), content);

        if let Some(queue) = &state.queue {
            if queue.push(WorkerMsg::Job(job)).is_err() && verbosity >= VERBOSITY_WARN {
                warn!("Report queue is disconnected; dropping report");
            }
        }
    }

    /**
     * Shuts down the worker and returns the controller to its initial
     * state. Does nothing if nothing was ever started.
     *
     * * Worker alive — sends the shutdown sentinel and waits for the
     *   worker to exit. With `discard_pending == false` every job queued
     *   ahead of the sentinel is delivered first; with `true` those jobs
     *   are dropped (an in-flight delivery still completes).
     * * Worker gone — unless `discard_pending`, makes one best-effort
     *   attempt to deliver a single job still left in the queue.
     */
    pub fn close(&self, discard_pending: bool) {
        let mut state = self.lock();
        if state.queue.is_none() && state.worker.is_none() {
            return;
        }

        self.check_owner(&mut state);

        let worker = state.worker.take();
        let queue = state.queue.take();

        match (worker, queue) {
            (Some(worker), Some(queue)) if worker.is_alive() => {
                if discard_pending {
                    worker.discard_pending();
                }
                if queue.push(WorkerMsg::Shutdown).is_ok() {
                    worker.join();
                }
            }
            (_, Some(queue)) if !discard_pending && !queue.is_empty() => {
                if let Some(WorkerMsg::Job(job)) = queue.try_pop() {
                    /*
                     * Last-chance flush with no worker left. The result is
                     * dropped on purpose so shutdown never fails because of
                     * the network.
                     */
                    let _ = self.transport.deliver(&job);
                }
            }
            _ => {}
        }
    }

    /// `true` while a live worker exists for the current owner.
    pub fn is_active(&self) -> bool {
        let current = self.identity.current();
        self.lock()
            .worker
            .as_ref()
            .is_some_and(|w| w.owner() == current && w.is_alive())
    }

    /**
     * Returns a guard that calls `close(false)` when dropped.
     *
     * ```ignore
     * let controller = Controller::new(&Options::default());
     * let _guard = controller.guard();
     * controller.submit(Some("token"), Some(&report));
     * // _guard dropped here → pending reports are delivered
     * ```
     */
    pub fn guard(&self) -> Guard<'_> {
        Guard::new(self)
    }

    /**
     * Drops the worker and queue if they were created under a different
     * owner identity. The old worker is told to stop but not waited for.
     */
    fn check_owner(&self, state: &mut State) {
        let current = self.identity.current();
        let stale = state.worker.as_ref().is_some_and(|w| w.owner() != current);
        if !stale {
            return;
        }

        if let Some(worker) = state.worker.take() {
            worker.abandon();
        }
        state.queue = None;

        if state.connection.verbosity >= VERBOSITY_DEBUG {
            debug!("Owner changed to {current}; discarded inherited report worker");
        }
    }

    /*
     * A panic while holding the lock leaves the state consistent enough to
     * keep going, so poisoning is ignored rather than spreading the panic.
     */
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
