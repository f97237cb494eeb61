//! Render error types.

/// Error raised when an operation's precondition does not hold.
///
/// Only operations whose input could otherwise produce broken markup fail;
/// every other rendering operation is infallible.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An argument violates the operation's documented precondition.
    #[error("Invalid argument to {operation}: {message}")]
    InvalidArgument {
        /// Renderer operation that rejected the argument (e.g. "heading").
        operation: &'static str,
        /// Description of the violated precondition.
        message: String,
    },
}

impl RenderError {
    pub(crate) fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            message: message.into(),
        }
    }
}
