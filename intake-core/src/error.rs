use intake_store::StoreError;
use thiserror::Error;

/// Error types for intake workflows
#[derive(Error, Debug)]
pub enum CoreError {
    /// A record store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Expected exactly-one semantics were violated; the current
    /// workflow step cannot continue
    #[error("Invariant violated: {message}")]
    Invariant { message: String },

    /// Attachment transport or encoding failed; local state is
    /// unchanged and the same call may be retried
    #[error("Attachment upload failed: {message}")]
    Upload { message: String },
}

impl CoreError {
    /// Create an invariant violation error
    pub fn invariant<S: Into<String>>(message: S) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }

    /// Create an upload error
    pub fn upload<S: Into<String>>(message: S) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }
}
