/*
 * This module provides the progress window widget itself: the configuration
 * struct (`ProgressWindowConfig`), the window state machine
 * (`ProgressWindow`), and the worker-side primitives (`CancelToken`,
 * `OperationContext`). Unit tests for `ProgressWindow` are in
 * `window_tests.rs`.
 */
pub mod config;
pub mod ui_constants;
pub mod window;
pub mod worker;


pub use config::{FailureHook, Operation, OperationError, ProgressWindowConfig};
pub use window::ProgressWindow;
pub use worker::{CancelToken, OperationContext};
