//! Error types and handling for the `PackMate` pipeline

use thiserror::Error;

/// How much of an offending generator payload is kept in error messages.
const EXCERPT_LEN: usize = 200;

/// Main error type for the `PackMate` pipeline
#[derive(Error, Debug)]
pub enum PackmateError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed trip input, surfaced to the caller
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Forecast retrieval failed; recovered by the orchestrator, never
    /// surfaced as a request failure
    #[error("Forecast unavailable: {message}")]
    Forecast { message: String },

    /// The generative backend failed or returned an empty payload
    #[error("Generation failed: {message}")]
    Generation { message: String },

    /// Generator output was not a JSON object
    #[error("Malformed generator output: {excerpt}")]
    MalformedOutput { excerpt: String },

    /// A top-level category value was not an array of items
    #[error("Category \"{category}\" is not an item list")]
    InvalidCategory { category: String },

    /// An item inside a category was structurally invalid
    #[error("Invalid item in category \"{category}\"")]
    InvalidItem { category: String },

    /// The persistence collaborator failed after persistence was requested
    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl PackmateError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new forecast error
    pub fn forecast<S: Into<String>>(message: S) -> Self {
        Self::Forecast {
            message: message.into(),
        }
    }

    /// Create a new generation error
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create a malformed-output error carrying a truncated excerpt of the
    /// offending payload. The full payload is never stored.
    pub fn malformed_output(raw: &str) -> Self {
        Self::MalformedOutput {
            excerpt: truncate_excerpt(raw),
        }
    }

    /// Create an invalid-category error naming the offending category
    pub fn invalid_category<S: Into<String>>(category: S) -> Self {
        Self::InvalidCategory {
            category: category.into(),
        }
    }

    /// Create an invalid-item error naming the containing category
    pub fn invalid_item<S: Into<String>>(category: S) -> Self {
        Self::InvalidItem {
            category: category.into(),
        }
    }

    /// Create a new persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PackmateError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            PackmateError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            PackmateError::Forecast { .. } => {
                "Weather forecast is currently unavailable.".to_string()
            }
            PackmateError::Generation { .. } => {
                "The packing list service is currently unavailable. Please try again later."
                    .to_string()
            }
            PackmateError::MalformedOutput { .. }
            | PackmateError::InvalidCategory { .. }
            | PackmateError::InvalidItem { .. } => {
                "The generated packing list could not be processed.".to_string()
            }
            PackmateError::Persistence { .. } => {
                "The packing list was generated but could not be saved.".to_string()
            }
        }
    }
}

/// Truncate raw generator output for diagnostics, respecting char boundaries.
fn truncate_excerpt(raw: &str) -> String {
    if raw.len() <= EXCERPT_LEN {
        return raw.to_string();
    }
    let mut end = EXCERPT_LEN;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &raw[..end])
}
