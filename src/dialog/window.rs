/*
 * The progress window state machine. A `ProgressWindow` is created via
 * `open`, which shows the modal overlay (or runs the operation inline in
 * headless mode). The host delivers `UiEvent`s to `handle_event` on its
 * UI-owning execution context; the first focus event starts the operation,
 * either directly on the calling context or on a single background worker
 * when cancellation is supported. Every terminal path funnels into
 * `clean_exit`, which an atomic flag makes idempotent, so the window is
 * closed exactly once no matter how completion, cancellation, and the
 * window's own close affordance race.
 */

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::thread;

use crate::host::error::Result as HostResult;
use crate::host::types::{HostSession, HostUi, UiEvent, WindowId, WindowSpec};

use super::config::{FailureHook, Operation, OperationError, ProgressWindowConfig};
use super::ui_constants::{CLOSING_LABEL, ID_BUTTON_CANCEL, NO_PROGRESS_WINDOW_ATTRIBUTE};
use super::worker::{self, CancelToken, OperationContext, WorkerHandle};

pub struct ProgressWindow {
    pub(crate) host: Arc<dyn HostUi>,
    // Handle to this window's own Arc, needed when the worker thread must
    // carry the window across the thread boundary.
    weak_self: Weak<ProgressWindow>,
    // None in headless mode, where no window is ever shown.
    pub(crate) window_id: Option<WindowId>,
    // True when a cancel label was supplied AND the host supports push.
    pub(crate) cancel_enabled: bool,
    pub(crate) push_supported: bool,
    // Guards against duplicate starts from repeated focus events.
    pub(crate) started: AtomicBool,
    // Guards `clean_exit` so the window closes exactly once.
    pub(crate) closed: AtomicBool,
    // Taken exactly once by the first focus event.
    pub(crate) operation: Mutex<Option<Operation>>,
    pub(crate) failure_hook: FailureHook,
    // At most one worker per window lifetime.
    pub(crate) worker: Mutex<Option<WorkerHandle>>,
}

impl ProgressWindow {
    /*
     * Shows the modal progress window described by `config` and returns its
     * shared handle. The operation does NOT start here; it starts on the
     * first `UiEvent::WindowFocused` the host delivers, so the user
     * perceives the overlay before the heavy work begins.
     *
     * Two construction-time decisions are made:
     * - Headless mode: when the session attribute `NoProgressWindow` is
     *   true, the operation runs inline and the window is torn down without
     *   ever being shown, synchronously before `open` returns.
     * - Capability check: a requested cancel button is silently dropped
     *   when the host cannot push UI changes asynchronously, since a
     *   background worker would have no way to surface its completion.
     */
    pub fn open(
        host: Arc<dyn HostUi>,
        session: &dyn HostSession,
        config: ProgressWindowConfig,
    ) -> HostResult<Arc<Self>> {
        let ProgressWindowConfig {
            title,
            description,
            cancel_label,
            operation,
            failure_hook,
        } = config;

        if session.flag(NO_PROGRESS_WINDOW_ATTRIBUTE).unwrap_or(false) {
            log::debug!("ProgressWindow: headless mode, running operation without a window");
            let window = Arc::new_cyclic(|weak_self| ProgressWindow {
                host,
                weak_self: weak_self.clone(),
                window_id: None,
                cancel_enabled: false,
                push_supported: false,
                started: AtomicBool::new(true),
                closed: AtomicBool::new(false),
                operation: Mutex::new(None),
                failure_hook,
                worker: Mutex::new(None),
            });
            window.run_direct(operation);
            return Ok(window);
        }

        let push_supported = host.push_supported();
        let cancel_enabled = cancel_label.is_some() && push_supported;
        if cancel_label.is_some() && !cancel_enabled {
            log::warn!(
                "ProgressWindow: cancel button requested but host reports no push support; \
                 running without cancellation"
            );
        }

        let spec = WindowSpec {
            title,
            description,
            cancel_label: if cancel_enabled { cancel_label } else { None },
            // The window exposes its own close affordance only when it can
            // be cancelled.
            closable: cancel_enabled,
        };
        let window_id = host.show_window(&spec)?;
        host.set_window_modal(window_id, true)?;
        log::debug!(
            "ProgressWindow: window {window_id:?} shown (cancel_enabled: {cancel_enabled}, \
             push_supported: {push_supported})"
        );

        Ok(Arc::new_cyclic(|weak_self| ProgressWindow {
            host,
            weak_self: weak_self.clone(),
            window_id: Some(window_id),
            cancel_enabled,
            push_supported,
            started: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            operation: Mutex::new(Some(operation)),
            failure_hook,
            worker: Mutex::new(None),
        }))
    }

    // Handles a host event. Must be called on the host's UI-owning
    // execution context. Events for other windows are ignored.
    pub fn handle_event(&self, event: UiEvent) {
        match event {
            UiEvent::WindowFocused { window_id } if self.owns(window_id) => self.on_focus(),
            UiEvent::ButtonClicked {
                window_id,
                control_id,
            } if self.owns(window_id) && control_id == ID_BUTTON_CANCEL => {
                self.on_cancel_clicked();
            }
            UiEvent::WindowCloseRequested { window_id } if self.owns(window_id) => {
                self.on_close_requested();
            }
            _ => {}
        }
    }

    // True once `clean_exit` has run; the window is dismissed and all
    // further events are no-ops.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn window_id(&self) -> Option<WindowId> {
        self.window_id
    }

    fn owns(&self, window_id: WindowId) -> bool {
        self.window_id == Some(window_id)
    }

    /*
     * First-focus trigger. The `started` swap makes repeated focus events
     * no-ops; focus events all arrive on the UI context, but the atomic
     * keeps the guarantee even for a misbehaving host.
     */
    fn on_focus(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            log::trace!("ProgressWindow: ignoring repeated focus event");
            return;
        }
        let Some(operation) = lock_unpoisoned(&self.operation).take() else {
            log::error!("ProgressWindow: focus fired but no operation is pending");
            return;
        };

        if self.cancel_enabled {
            self.spawn_worker(operation);
        } else {
            self.run_direct(operation);
        }
    }

    // Runs the operation on the calling (UI) context, then tears down.
    fn run_direct(&self, operation: Operation) {
        let context = OperationContext::new(CancelToken::new());
        if let Err(error) = worker::run_contained(operation, &context) {
            self.invoke_failure_hook(&error);
        }
        self.clean_exit();
    }

    /*
     * Spawns the single background worker. The worker never touches window
     * state directly; on any terminal outcome it marshals a closure back to
     * the UI context via `HostUi::run_on_ui_thread` which invokes the
     * failure hook if applicable, tears the window down, and pushes the
     * changes to the client (background-originated mutations are not
     * auto-flushed).
     */
    fn spawn_worker(&self, operation: Operation) {
        let Some(window) = self.weak_self.upgrade() else {
            // Unreachable while the caller holds the Arc.
            return;
        };
        let token = CancelToken::new();
        let context = OperationContext::new(token.clone());
        let push_supported = self.push_supported;

        let spawn_result = thread::Builder::new()
            .name("progress-window-worker".to_string())
            .spawn(move || {
                let result = worker::run_contained(operation, &context);
                if context.is_cancelled() {
                    log::debug!("ProgressWindow: worker finished after cancellation signal");
                }
                let ui_window = Arc::clone(&window);
                window.host.run_on_ui_thread(Box::new(move || {
                    if let Err(error) = &result {
                        ui_window.invoke_failure_hook(error);
                    }
                    ui_window.clean_exit();
                    if push_supported {
                        ui_window.host.push();
                    }
                }));
            });

        match spawn_result {
            Ok(join) => {
                log::debug!(
                    "ProgressWindow: worker spawned for window {:?}",
                    self.window_id
                );
                *lock_unpoisoned(&self.worker) = Some(WorkerHandle::new(token, join));
            }
            Err(error) => {
                // No worker: report the spawn failure like an operation
                // failure and tear down on the calling context.
                log::error!("ProgressWindow: failed to spawn worker thread: {error}");
                let error: OperationError = Box::new(error);
                self.invoke_failure_hook(&error);
                self.clean_exit();
            }
        }
    }

    /*
     * Cancel button click. Only meaningful while the cancel button exists
     * and the window is still open: disables the button, switches its label
     * to the closing indicator, tears the window down, and finally signals
     * the worker (which may already have finished, in which case the signal
     * is skipped). Cancellation is advisory; the operation decides when to
     * observe it.
     */
    fn on_cancel_clicked(&self) {
        if !self.cancel_enabled {
            log::trace!("ProgressWindow: cancel click ignored, no cancel button configured");
            return;
        }
        if self.is_closed() {
            log::trace!("ProgressWindow: cancel click ignored, window already closed");
            return;
        }
        if let Some(window_id) = self.window_id {
            if let Err(error) = self
                .host
                .set_control_enabled(window_id, ID_BUTTON_CANCEL, false)
            {
                log::warn!("ProgressWindow: failed to disable cancel button: {error}");
            }
            if let Err(error) =
                self.host
                    .set_control_text(window_id, ID_BUTTON_CANCEL, CLOSING_LABEL.to_string())
            {
                log::warn!("ProgressWindow: failed to relabel cancel button: {error}");
            }
        }
        self.clean_exit();
        self.interrupt_worker();
    }

    // The window's own close affordance must behave like an explicit
    // cancel with respect to the worker.
    fn on_close_requested(&self) {
        self.interrupt_worker();
        self.clean_exit();
    }

    fn interrupt_worker(&self) {
        if let Some(worker) = lock_unpoisoned(&self.worker).as_ref() {
            worker.interrupt();
        }
    }

    /*
     * Idempotent teardown, reachable from every terminal path: direct
     * success or failure, worker success or failure, cancellation, and the
     * close affordance. The atomic swap guarantees the host sees at most
     * one un-modal/close sequence even when completion and cancellation
     * race. Host errors during teardown are logged and swallowed.
     */
    pub(crate) fn clean_exit(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            log::trace!("ProgressWindow: clean_exit already performed");
            return;
        }
        let Some(window_id) = self.window_id else {
            // Headless mode: nothing was shown, nothing to dismiss.
            return;
        };
        if let Err(error) = self.host.set_window_modal(window_id, false) {
            log::warn!("ProgressWindow: failed to clear modal state during teardown: {error}");
        }
        if let Err(error) = self.host.close_window(window_id) {
            log::warn!("ProgressWindow: failed to close window during teardown: {error}");
        }
        log::debug!("ProgressWindow: window {window_id:?} closed");
    }

    // Invokes the failure hook, containing any panic it raises so that
    // teardown always completes afterwards.
    pub(crate) fn invoke_failure_hook(&self, error: &OperationError) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.failure_hook)(error)));
        if outcome.is_err() {
            log::error!("ProgressWindow: failure hook panicked; continuing teardown");
        }
    }
}

// A worker that panicked mid-update leaves the state behind the lock fully
// usable for teardown purposes, so poisoning is ignored rather than
// propagated.
fn lock_unpoisoned<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
