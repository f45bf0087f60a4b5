/*
 * This module defines the core data types exchanged between the widget and
 * the host UI. It includes identifiers for windows and controls, the
 * `WindowSpec` describing the progress window to be shown, host-agnostic
 * event types (`UiEvent`), and the `HostUi` / `HostSession` traits the host
 * application must implement.
 */

use super::error::Result;

// An opaque identifier for a host window.
//
// The widget uses this ID to refer to its window when sending follow-up
// requests (modal state, close, control updates), without needing to know
// about native window handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub usize);

// An opaque identifier for a logical control within a host window.
//
// The widget assigns logical IDs (see `dialog::ui_constants`) and the host
// maps them to native control handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(i32);

impl ControlId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn value(self) -> i32 {
        self.0
    }
}

// Describes the progress window the host should render.
//
// The progress indicator is always indeterminate, so the spec carries no
// percentage field. `cancel_label` is `Some` only when the cancel button
// survived the push-capability check at construction time; `closable`
// mirrors it, since the window exposes its own close affordance only when
// it can be cancelled.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub title: String,
    pub description: String,
    pub cancel_label: Option<String>,
    pub closable: bool,
}

// --- Events from Host to the Widget ---

/*
 * Represents host-agnostic UI events relevant to the progress window.
 *
 * The host translates native toolkit events into these types and delivers
 * them to `ProgressWindow::handle_event` on its UI-owning execution context.
 * Events carrying a `WindowId` other than the widget's own are ignored.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    // Signals that the window has been granted input focus. The first such
    // event starts the long-running operation.
    WindowFocused {
        window_id: WindowId,
    },
    // Signals that a button was clicked inside the window.
    ButtonClicked {
        window_id: WindowId,
        control_id: ControlId,
    },
    // Signals that the user requested the window to close via the window's
    // own close affordance.
    WindowCloseRequested {
        window_id: WindowId,
    },
}

// A unit of work to be executed on the host's UI-owning execution context.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

// --- Traits the Host Application Must Implement ---

/*
 * The host UI collaborator.
 *
 * All methods except `run_on_ui_thread` must only be called from the host's
 * UI-owning execution context; the widget upholds this by marshalling every
 * background-originated effect through `run_on_ui_thread`. The trait object
 * is shared with the worker thread, hence `Send + Sync`.
 */
pub trait HostUi: Send + Sync {
    // Shows a modal overlay described by `spec` and returns its handle.
    fn show_window(&self, spec: &WindowSpec) -> Result<WindowId>;

    // Dismisses the window. Dismissing an already-dismissed window is a
    // host-level error; the widget guards against ever requesting it twice.
    fn close_window(&self, window_id: WindowId) -> Result<()>;

    // Sets or clears the modal state of the window.
    fn set_window_modal(&self, window_id: WindowId, modal: bool) -> Result<()>;

    // Enables or disables a logical control within the window.
    fn set_control_enabled(
        &self,
        window_id: WindowId,
        control_id: ControlId,
        enabled: bool,
    ) -> Result<()>;

    // Replaces the text of a logical control within the window.
    fn set_control_text(
        &self,
        window_id: WindowId,
        control_id: ControlId,
        text: String,
    ) -> Result<()>;

    // Enqueues `task` for execution on the host's serialized UI context.
    // Must be safe to call from any thread. Tasks submitted after the UI
    // context has shut down are dropped.
    fn run_on_ui_thread(&self, task: UiTask);

    // Reports whether the host can flush UI changes to the client outside
    // the normal request/response cycle. Without this capability a
    // background worker has no way to make its completion visible, so
    // cancellation support is disabled at construction time.
    fn push_supported(&self) -> bool;

    // Flushes pending UI changes to the client. Only invoked after
    // background-originated mutations, and only when `push_supported`
    // reported true.
    fn push(&self);
}

/*
 * The host session collaborator: a key-value attribute store.
 *
 * The widget reads a single boolean attribute from it (see
 * `dialog::ui_constants::NO_PROGRESS_WINDOW_ATTRIBUTE`) to detect the
 * headless testing mode in which the operation runs inline without any
 * window ever being shown.
 */
pub trait HostSession: Send + Sync {
    // Looks up a boolean attribute by name. `None` when the attribute is
    // absent or not a boolean.
    fn flag(&self, name: &str) -> Option<bool>;
}
