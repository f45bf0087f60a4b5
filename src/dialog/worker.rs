/*
 * Worker-side primitives for the progress window: the cooperative
 * `CancelToken`, the explicit `OperationContext` handed to the operation,
 * the `WorkerHandle` owned by the window while a background thread is
 * running, and the panic-containing operation runner. Cancellation here is
 * advisory only; the runtime never forcibly stops the thread, the operation
 * is expected to poll the token at convenient points.
 */

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use super::config::{Operation, OperationError};

// A cooperative cancellation flag shared between the window and its worker.
//
// Cloning yields another handle to the same flag. Signalling an
// already-signalled token is a no-op.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/*
 * The execution context handed to the caller-supplied operation.
 *
 * The original design relied on ambient thread state (interrupt flags,
 * implicitly propagated session); here everything the operation may need
 * from the launcher travels explicitly in this context. Operations that
 * support cancellation should poll `is_cancelled` and return early when it
 * reports true.
 */
#[derive(Debug)]
pub struct OperationContext {
    cancel: CancelToken,
}

impl OperationContext {
    pub(crate) fn new(cancel: CancelToken) -> Self {
        OperationContext { cancel }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

// Represents the background execution context while a cancellable operation
// is running. Owned exclusively by the window; exists only between start
// and terminal state.
pub(crate) struct WorkerHandle {
    pub(crate) cancel: CancelToken,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    pub(crate) fn new(cancel: CancelToken, join: JoinHandle<()>) -> Self {
        WorkerHandle { cancel, join }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    // Signals cooperative cancellation, unless the worker already finished
    // or was already signalled. Safe to call repeatedly.
    pub(crate) fn interrupt(&self) {
        if self.join.is_finished() {
            log::trace!("WorkerHandle: interrupt skipped, worker already finished");
            return;
        }
        if self.cancel.is_cancelled() {
            log::trace!("WorkerHandle: interrupt skipped, already signalled");
            return;
        }
        log::debug!("WorkerHandle: signalling cancellation to worker");
        self.cancel.cancel();
    }
}

/*
 * Runs the operation with a finally-equivalent guarantee: a panicking
 * operation is converted into an `OperationError` instead of unwinding past
 * the launcher, so teardown on the calling side always executes.
 */
pub(crate) fn run_contained(
    operation: Operation,
    context: &OperationContext,
) -> Result<(), OperationError> {
    match panic::catch_unwind(AssertUnwindSafe(|| operation(context))) {
        Ok(result) => result,
        Err(payload) => Err(panic_description(payload.as_ref()).into()),
    }
}

fn panic_description(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("operation panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("operation panicked: {message}")
    } else {
        "operation panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn cancel_token_is_idempotent_and_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn run_contained_passes_through_operation_result() {
        let context = OperationContext::new(CancelToken::new());
        assert!(run_contained(Box::new(|_| Ok(())), &context).is_ok());

        let err = run_contained(Box::new(|_| Err("boom".into())), &context)
            .expect_err("operation error expected");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn run_contained_converts_panic_into_operation_error() {
        let context = OperationContext::new(CancelToken::new());
        let err = run_contained(Box::new(|_| panic!("kaboom")), &context)
            .expect_err("panic should surface as an error");
        assert_eq!(err.to_string(), "operation panicked: kaboom");
    }

    #[test]
    fn interrupt_is_noop_once_worker_finished() {
        // Arrange: a worker that exits immediately.
        let token = CancelToken::new();
        let handle = WorkerHandle::new(token.clone(), thread::spawn(|| {}));
        while !handle.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }

        // Act
        handle.interrupt();

        // Assert: the terminal worker was never signalled.
        assert!(!token.is_cancelled());
    }

    #[test]
    fn interrupt_signals_running_worker_exactly_once() {
        // Arrange: a worker that waits for the signal.
        let token = CancelToken::new();
        let observed = token.clone();
        let join = thread::spawn(move || {
            while !observed.is_cancelled() {
                thread::sleep(Duration::from_millis(1));
            }
        });
        let handle = WorkerHandle::new(token.clone(), join);

        // Act: double interrupt must be harmless.
        handle.interrupt();
        handle.interrupt();

        // Assert
        assert!(token.is_cancelled());
        while !handle.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
    }
}
