// Represents errors that can occur at the host boundary.
//
// This enum centralizes error handling for operations delegated to the host
// UI toolkit, such as failure to show the progress window or an invalid
// window handle being used. The widget itself produces no other error kinds;
// failures of the caller-supplied operation travel through the failure hook
// instead (see `dialog::config::FailureHook`).
#[derive(Debug, Clone)]
pub enum HostError {
    /// The host failed to create or show the progress window.
    WindowCreationFailed(String),
    /// An invalid handle (e.g., a stale `WindowId`) was used.
    InvalidHandle(String),
    /// A requested host operation could not be completed.
    OperationFailed(String),
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::WindowCreationFailed(s) => write!(f, "Window Creation Failed: {s}"),
            HostError::InvalidHandle(s) => write!(f, "Invalid Handle: {s}"),
            HostError::OperationFailed(s) => write!(f, "Operation Failed: {s}"),
        }
    }
}

impl std::error::Error for HostError {}

/// A specialized `Result` type for host boundary operations.
pub type Result<T> = std::result::Result<T, HostError>;
