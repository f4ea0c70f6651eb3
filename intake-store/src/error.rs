use thiserror::Error;

/// Remote operation that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Create,
    Update,
    Delete,
    Download,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Query => write!(f, "query"),
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::Download => write!(f, "download"),
        }
    }
}

/// Error types for record store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Temporary-token exchange failed; the caller must abort, not retry
    #[error("Authorization failed: {message}")]
    Auth { message: String },

    /// Non-success response from a record operation
    #[error("{operation} on {collection} failed (status {status}): {message}")]
    Remote {
        collection: String,
        operation: Operation,
        status: u16,
        message: String,
    },

    /// File transfer or payload encoding failed
    #[error("File transfer failed: {message}")]
    Upload { message: String },

    /// The store returned fewer records than matched the filter
    #[error("Query on {collection} truncated: got {returned} of {total} records")]
    Incomplete {
        collection: String,
        returned: u32,
        total: u32,
    },

    /// Request rejected before it was sent
    #[error("Invalid request: {message}")]
    Invalid { message: String },

    /// Network or connection error
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// JSON parsing or serialization error
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    /// Configuration is missing or malformed
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl StoreError {
    /// Create an authorization error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a remote operation error
    pub fn remote<S: Into<String>>(
        collection: S,
        operation: Operation,
        status: u16,
        message: String,
    ) -> Self {
        Self::Remote {
            collection: collection.into(),
            operation,
            status,
            message,
        }
    }

    /// Create a file transfer error
    pub fn upload<S: Into<String>>(message: S) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
