/*
 * Configuration for a progress window: the window texts, the optional cancel
 * button label, the caller-supplied operation, and the overridable failure
 * hook. The original widget used subclassing for the operation and the
 * failure hook; this struct replaces that with two boxed callables supplied
 * at construction time.
 */

use super::ui_constants::{DEFAULT_DESCRIPTION, DEFAULT_TITLE};
use super::worker::OperationContext;

// The error produced by a failing operation. The widget never inspects it
// beyond logging; it is carried verbatim to the failure hook.
pub type OperationError = Box<dyn std::error::Error + Send + Sync + 'static>;

// The caller-supplied unit of work. Runs at most once, possibly on a
// background thread, and receives the explicit `OperationContext` through
// which cooperative cancellation is observed.
pub type Operation = Box<dyn FnOnce(&OperationContext) -> Result<(), OperationError> + Send>;

// The overridable hook invoked with the causing error whenever the operation
// fails. Always invoked on the UI-safe execution context.
pub type FailureHook = Box<dyn Fn(&OperationError) + Send + Sync>;

pub struct ProgressWindowConfig {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) cancel_label: Option<String>,
    pub(crate) operation: Operation,
    pub(crate) failure_hook: FailureHook,
}

impl ProgressWindowConfig {
    // A progress window with default title and description and no cancel
    // button.
    pub fn new<F>(operation: F) -> Self
    where
        F: FnOnce(&OperationContext) -> Result<(), OperationError> + Send + 'static,
    {
        Self::with_details(DEFAULT_TITLE, DEFAULT_DESCRIPTION, operation)
    }

    // A progress window with a custom title, default description, and no
    // cancel button.
    pub fn titled<F>(title: impl Into<String>, operation: F) -> Self
    where
        F: FnOnce(&OperationContext) -> Result<(), OperationError> + Send + 'static,
    {
        Self::with_details(title, DEFAULT_DESCRIPTION, operation)
    }

    // A progress window with custom title and description and no cancel
    // button.
    pub fn with_details<F>(
        title: impl Into<String>,
        description: impl Into<String>,
        operation: F,
    ) -> Self
    where
        F: FnOnce(&OperationContext) -> Result<(), OperationError> + Send + 'static,
    {
        ProgressWindowConfig {
            title: title.into(),
            description: description.into(),
            cancel_label: None,
            operation: Box::new(operation),
            failure_hook: default_failure_hook(),
        }
    }

    /*
     * A progress window with a cancel button. Note that cancel support is
     * subject to the host's push capability: without asynchronous refresh
     * there is no way to surface the worker's completion, so the button is
     * silently dropped at construction time (see `ProgressWindow::open`).
     */
    pub fn cancellable<F>(
        title: impl Into<String>,
        description: impl Into<String>,
        cancel_label: impl Into<String>,
        operation: F,
    ) -> Self
    where
        F: FnOnce(&OperationContext) -> Result<(), OperationError> + Send + 'static,
    {
        let mut config = Self::with_details(title, description, operation);
        config.cancel_label = Some(cancel_label.into());
        config
    }

    // Replaces the default failure hook. The hook must not assume any
    // particular thread beyond the UI-safe execution context.
    pub fn failure_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(&OperationError) + Send + Sync + 'static,
    {
        self.failure_hook = Box::new(hook);
        self
    }
}

fn default_failure_hook() -> FailureHook {
    Box::new(|error| log::error!("ProgressWindow: operation failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_default_texts_and_no_cancel_button() {
        let config = ProgressWindowConfig::new(|_| Ok(()));
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert!(config.cancel_label.is_none());
    }

    #[test]
    fn titled_keeps_default_description() {
        let config = ProgressWindowConfig::titled("Loading Table", |_| Ok(()));
        assert_eq!(config.title, "Loading Table");
        assert_eq!(config.description, DEFAULT_DESCRIPTION);
        assert!(config.cancel_label.is_none());
    }

    #[test]
    fn cancellable_records_cancel_label() {
        let config =
            ProgressWindowConfig::cancellable("Connecting you...", "Please wait", "Can't wait", |_| {
                Ok(())
            });
        assert_eq!(config.cancel_label.as_deref(), Some("Can't wait"));
    }
}
