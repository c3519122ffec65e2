/**
 * RAII guard returned by `Controller::guard()`.
 *
 * Closes the controller when it goes out of scope, so reports queued
 * during the scope are delivered before the process moves on:
 *
 * ```ignore
 * fn main() {
 *     let controller = Controller::new(&Options::default());
 *     let _guard = controller.guard();
 *
 *     // ... submit reports ...
 *
 * }   // <-- _guard is dropped here, triggering close(false)
 * ```
 */
use crate::controller::Controller;

pub struct Guard<'a> {
    controller: &'a Controller,
}

impl<'a> Guard<'a> {
    pub(crate) fn new(controller: &'a Controller) -> Self {
        Self { controller }
    }
}

impl Drop for Guard<'_> {
    /**
     * Closes without discarding: every queued report is attempted before
     * the drop returns. A no-op if nothing was submitted.
     */
    fn drop(&mut self) {
        self.controller.close(false);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::config::Options;
    use crate::controller::Controller;
    use crate::testing::{TestIdentity, TestTransport};

    #[test]
    fn test_drop_delivers_pending_reports() {
        let transport = Arc::new(TestTransport::open());
        let controller = Controller::with_parts(
            &Options::default(),
            transport.clone(),
            Arc::new(TestIdentity::new(1)),
        );

        {
            let _guard = controller.guard();
            controller.submit(Some("tok"), Some(&json!("a")));
            controller.submit(Some("tok"), Some(&json!("b")));
        }

        assert_eq!(transport.contents(), vec![json!("a"), json!("b")]);
        assert!(!controller.is_active());
    }
}
