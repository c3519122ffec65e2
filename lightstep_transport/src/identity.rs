/**
 * Owner identity used for fork detection.
 *
 * A worker thread does not survive `fork()`: the child inherits the
 * channel and the thread handle, but nothing is running behind them.
 * The controller records the identity that spawned its worker and
 * compares it with the current one before every operation. A mismatch
 * means the worker and queue are unusable and must be thrown away.
 *
 * On platforms without fork the identity never changes, so the check
 * is always false.
 */

pub trait OwnerIdentity: Send + Sync {
    fn current(&self) -> u32;
}

/// Identity of the running OS process, via `std::process::id()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessIdentity;

impl OwnerIdentity for ProcessIdentity {
    fn current(&self) -> u32 {
        std::process::id()
    }
}
