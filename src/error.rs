//! Error types and user-facing error messages.
//!
//! This module defines all application errors and how they collapse into
//! the single notification channel shown to the user.

/// Generic text shown when a submission fails without a usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to verify identity. Please try again.";

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation Errors**: bad file type or missing file, rejected before any network activity
/// - **Transport Errors**: the request could not complete
/// - **Application Errors**: non-2xx status or a body signalling failure
/// - **Storage Errors**: the client storage could not be read or written
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Selected file is not a JPEG or PNG image.
    #[error("Please upload a valid image file (JPG or PNG)")]
    InvalidFileType(String),

    /// Submit was requested without a selected file.
    #[error("Please upload your student ID")]
    NoFileSelected,

    /// No auth token in client storage.
    #[error("Please log in or sign up to get your API key")]
    NotLoggedIn,

    /// Request to the verification service could not complete.
    ///
    /// This wraps any reqwest::Error using the `#[from]` attribute.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered but did not report success.
    ///
    /// The String is the message from the response body, or the HTTP status fallback.
    #[error("{0}")]
    Rejected(String),

    /// Client storage file could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A stored value is not valid JSON of the expected shape.
    #[error("Malformed stored value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Environment configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configured base URL does not form a valid endpoint.
    #[error("Invalid verification URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AppError {
    /// Text for the user-visible error notification.
    ///
    /// # Mapping
    ///
    /// - Validation and rejection errors → their own message
    /// - Transport, storage and configuration errors → generic failure text (details go to logs)
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidFileType(_) | AppError::NoFileSelected | AppError::NotLoggedIn => {
                self.to_string()
            }
            AppError::Rejected(msg) if !msg.is_empty() => msg.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
