//! Error types module
//!
//! Every failure of the receipt pipeline is a `ReceiptError`. None of them are fatal:
//! the dialog renders `client_message()` inline and the user either retries or cancels.

use std::fmt;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Stage in which an encode failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStage {
    Edit,
    Compression,
}

impl fmt::Display for EncodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeStage::Edit => f.write_str("Edit"),
            EncodeStage::Compression => f.write_str("Compression"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReceiptError {
    /// The file is not an image (rejected before any decoding).
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Failed to read image: {0}")]
    Decode(String),

    #[error("{stage} failed: {message}")]
    Encode { stage: EncodeStage, message: String },

    /// Upload collaborator failure, message kept verbatim.
    #[error("{0}")]
    Upload(String),

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pipeline operations
pub type ReceiptResult<T> = Result<T, ReceiptError>;

impl ReceiptError {
    pub fn edit_failed(message: impl Into<String>) -> Self {
        ReceiptError::Encode {
            stage: EncodeStage::Edit,
            message: message.into(),
        }
    }

    pub fn compression_failed(message: impl Into<String>) -> Self {
        ReceiptError::Encode {
            stage: EncodeStage::Compression,
            message: message.into(),
        }
    }

    /// Wrap a collaborator error, keeping its full context chain.
    pub fn upload(err: &anyhow::Error) -> Self {
        ReceiptError::Upload(format!("{:#}", err))
    }

    /// Machine-readable error code (e.g., "DECODE_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            ReceiptError::InputValidation(_) => "INPUT_VALIDATION_ERROR",
            ReceiptError::Decode(_) => "DECODE_ERROR",
            ReceiptError::Encode { .. } => "ENCODE_ERROR",
            ReceiptError::Upload(_) => "UPLOAD_ERROR",
            ReceiptError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ReceiptError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }

    /// Whether the user can recover by retrying or picking another file.
    /// Configuration errors need an operator, everything else stays in the dialog.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ReceiptError::InvalidConfig(_))
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            ReceiptError::InputValidation(_) | ReceiptError::InvalidTransition { .. } => {
                LogLevel::Debug
            }
            ReceiptError::Decode(_) | ReceiptError::Upload(_) => LogLevel::Warn,
            ReceiptError::Encode { .. } | ReceiptError::InvalidConfig(_) => LogLevel::Error,
        }
    }

    /// Message rendered inline in the dialog.
    pub fn client_message(&self) -> String {
        match self {
            ReceiptError::InputValidation(message) => message.clone(),
            ReceiptError::Decode(_) => "Failed to read image".to_string(),
            ReceiptError::Encode {
                stage: EncodeStage::Edit,
                ..
            } => "Edit failed".to_string(),
            ReceiptError::Encode {
                stage: EncodeStage::Compression,
                ..
            } => "Compression failed".to_string(),
            ReceiptError::Upload(message) => message.clone(),
            ReceiptError::InvalidTransition { .. } => {
                "Please wait for the current step".to_string()
            }
            ReceiptError::InvalidConfig(_) => "Receipt uploads are misconfigured".to_string(),
        }
    }

    /// Emit this error through `tracing` at its own level.
    pub fn log(&self) {
        let code = self.error_code();
        match self.log_level() {
            LogLevel::Debug => {
                tracing::debug!(error_code = code, error = %self, "Receipt pipeline error")
            }
            LogLevel::Warn => {
                tracing::warn!(error_code = code, error = %self, "Receipt pipeline error")
            }
            LogLevel::Error => {
                tracing::error!(error_code = code, error = %self, "Receipt pipeline error")
            }
        }
    }
}
