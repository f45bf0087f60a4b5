/*
 * This module provides the host-abstraction layer. The widget never talks to
 * a concrete UI toolkit; it talks to the `HostUi` trait (window lifecycle,
 * control mutation, the serialized "run on UI thread" primitive, and the
 * push/async-refresh capability) and to the `HostSession` trait (boolean
 * attribute lookup, used for the headless testing mode). `UiDispatcher` is a
 * ready-made single-writer task queue a host can use as its serialized
 * execution context.
 */
pub mod dispatch;
pub mod error;
pub mod types;

pub use dispatch::{UiDispatcher, UiThreadHandle};
pub use error::{HostError, Result as HostResult};
pub use types::{ControlId, HostSession, HostUi, UiEvent, UiTask, WindowId, WindowSpec};
