//! CLI-specific error types

use std::fmt;
use std::io;

use crate::store::StoreError;
use crate::view::ViewError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout, data file)
    IoError,
    /// Request JSON does not fit the operation
    InvalidRequest,
    /// `--view` names neither a view nor the collection
    UnknownView,
    /// The store rejected the operation
    OperationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "COLLVIEW_CLI_CONFIG_ERROR",
            Self::IoError => "COLLVIEW_CLI_IO_ERROR",
            Self::InvalidRequest => "COLLVIEW_CLI_INVALID_REQUEST",
            Self::UnknownView => "COLLVIEW_CLI_UNKNOWN_VIEW",
            Self::OperationFailed => "COLLVIEW_CLI_OPERATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid request
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    /// Unknown view
    pub fn unknown_view(name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownView,
            format!("No view or collection named '{}'", name),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io(_) | StoreError::Serialization(_) => {
                Self::io_error(format!("{}: {}", e.code(), e))
            }
            _ => Self::new(CliErrorCode::OperationFailed, format!("{}: {}", e.code(), e)),
        }
    }
}

impl From<ViewError> for CliError {
    fn from(e: ViewError) -> Self {
        match e {
            ViewError::Store(inner) => inner.into(),
            other => Self::new(
                CliErrorCode::OperationFailed,
                format!("{}: {}", other.code(), other),
            ),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
