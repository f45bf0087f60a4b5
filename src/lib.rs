/*
 * A modal "progress window" widget for server-side / retained-mode UI hosts.
 *
 * The widget shows a modal overlay with an indeterminate progress indicator
 * while a caller-supplied long-running operation executes, optionally offers
 * a cancel button, and closes itself when the operation reaches a terminal
 * state. The crate owns the coordination between the host's UI-owning
 * execution context and an optional background worker thread; the host
 * itself is abstracted behind the `HostUi` and `HostSession` traits in the
 * `host` module.
 */

pub mod dialog;
pub mod host;

pub use dialog::{
    CancelToken, FailureHook, Operation, OperationContext, OperationError, ProgressWindow,
    ProgressWindowConfig,
};
pub use host::{
    ControlId, HostError, HostResult, HostSession, HostUi, UiDispatcher, UiEvent, UiTask,
    UiThreadHandle, WindowId, WindowSpec,
};
