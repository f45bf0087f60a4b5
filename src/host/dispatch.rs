/*
 * A minimal serialized execution queue for UI work.
 *
 * `UiDispatcher` is the receiving end, owned by the thread that owns
 * rendering; `UiThreadHandle` is the cloneable, thread-safe sending end that
 * `HostUi::run_on_ui_thread` implementations can delegate to. Tasks execute
 * strictly in submission order, one at a time, on the thread that pumps the
 * dispatcher. Hosts with a native event loop will typically have their own
 * equivalent; this one exists for hosts that do not, and doubles as the UI
 * context in this crate's own tests.
 */

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use super::types::UiTask;

// The sending end of a `UiDispatcher`. Cheap to clone and safe to use from
// any thread.
#[derive(Clone)]
pub struct UiThreadHandle {
    sender: Sender<UiTask>,
}

impl UiThreadHandle {
    // Enqueues `task` for execution on the dispatcher's thread. Returns
    // false if the dispatcher has been dropped, in which case the task is
    // discarded.
    pub fn submit(&self, task: UiTask) -> bool {
        match self.sender.send(task) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("UiDispatcher: task submitted after dispatcher shutdown was dropped");
                false
            }
        }
    }
}

// The receiving end: owns the queue and executes tasks when pumped.
pub struct UiDispatcher {
    sender: Sender<UiTask>,
    receiver: Receiver<UiTask>,
}

impl UiDispatcher {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        UiDispatcher { sender, receiver }
    }

    // Creates a new sending handle bound to this dispatcher.
    pub fn handle(&self) -> UiThreadHandle {
        UiThreadHandle {
            sender: self.sender.clone(),
        }
    }

    // Executes every task currently queued, without blocking. Returns the
    // number of tasks executed.
    pub fn process_pending(&self) -> usize {
        let mut executed = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            executed += 1;
        }
        executed
    }

    /*
     * Pumps tasks until `done` reports true or `timeout` elapses, blocking
     * between tasks. Returns the final value of `done`. The predicate is
     * re-evaluated after every executed task, so a task that flips the
     * condition terminates the pump promptly.
     */
    pub fn process_until<P: FnMut() -> bool>(&self, mut done: P, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if done() {
                return true;
            }
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(remaining) => remaining,
                None => return done(),
            };
            match self.receiver.recv_timeout(remaining) {
                Ok(task) => task(),
                // The dispatcher holds its own sender, so the channel can
                // only report a timeout here.
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return done();
                }
            }
        }
    }
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn tasks_execute_in_submission_order() {
        // Arrange
        let dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            assert!(handle.submit(Box::new(move || order.lock().unwrap().push(label))));
        }

        // Act
        let executed = dispatcher.process_pending();

        // Assert
        assert_eq!(executed, 3);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn submit_after_dispatcher_drop_reports_failure() {
        // Arrange
        let dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();
        drop(dispatcher);

        // Act & Assert
        assert!(!handle.submit(Box::new(|| {})));
    }

    #[test]
    fn process_until_stops_when_condition_flips() {
        // Arrange
        let dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let counter = Arc::clone(&counter);
            handle.submit(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        // Act: stop as soon as two tasks have run.
        let counter_for_done = Arc::clone(&counter);
        let done = dispatcher.process_until(
            || counter_for_done.load(Ordering::SeqCst) >= 2,
            Duration::from_secs(1),
        );

        // Assert
        assert!(done);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn process_until_times_out_when_condition_never_flips() {
        // Arrange
        let dispatcher = UiDispatcher::new();

        // Act
        let done = dispatcher.process_until(|| false, Duration::from_millis(20));

        // Assert
        assert!(!done);
    }
}
