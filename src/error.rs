//! Error handling for section-template
//!
//! Only file handling and variable conversion can fail. Rendering itself never
//! returns an error: an unassigned section, a disabled switch or a missing
//! include simply renders as nothing.
//!
//! # Error Types
//!
//! - [`Error::NotFound`] - Template alias, template file or fallback file missing
//! - [`Error::Unreadable`] - File exists but could not be read
//! - [`Error::InvalidVariables`] - Variables did not serialize to a key/value map
//! - [`Error::ConfigError`] - A session was built without a template source
//! - [`Error::JsonError`] - Serialization of host variables failed
//! - [`Error::IoError`] - Any other I/O failure
//!
//! # Usage
//!
//! ```rust,ignore
//! use section_template::{HtmlTemplate, Error};
//!
//! match tpl.render("index") {
//!     Ok(html) => println!("{}", html),
//!     Err(Error::NotFound(msg)) => eprintln!("missing template: {}", msg),
//!     Err(err) => eprintln!("other error: {}", err),
//! }
//! ```

use std::borrow::Cow;
use thiserror::Error;

/// Error type for all section-template operations
#[derive(Error, Debug)]
pub enum Error {
    /// A template alias or file could not be found
    ///
    /// Raised when assigning a file that exists in neither the active nor the
    /// fallback template directory, or when rendering an alias that was never
    /// assigned.
    #[error("Not found: {0}")]
    NotFound(Cow<'static, str>),

    /// A template file exists but could not be read
    #[error("Unreadable: {0}")]
    Unreadable(Cow<'static, str>),

    /// Host variables were not a key/value map
    #[error("Invalid variables: {0}")]
    InvalidVariables(Cow<'static, str>),

    /// Session configuration errors
    ///
    /// Raised by the builder when neither a template directory nor a custom
    /// loader was provided.
    #[error("Configuration error: {0}")]
    ConfigError(Cow<'static, str>),

    /// JSON serialization errors
    ///
    /// Automatically converted from `serde_json::Error` when host variables
    /// cannot be serialized.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File system and I/O errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Create a not-found error with a static string
    pub fn not_found_static(msg: &'static str) -> Self {
        Error::NotFound(Cow::Borrowed(msg))
    }

    /// Create a not-found error with an owned string
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use section_template::Error;
    ///
    /// let error = Error::not_found_owned(format!("Template file \"{}\" could not be found.", alias));
    /// ```
    pub fn not_found_owned(msg: String) -> Self {
        Error::NotFound(Cow::Owned(msg))
    }

    /// Create an unreadable-file error with an owned string
    pub fn unreadable_owned(msg: String) -> Self {
        Error::Unreadable(Cow::Owned(msg))
    }

    /// Create an invalid-variables error with a static string
    pub fn invalid_vars_static(msg: &'static str) -> Self {
        Error::InvalidVariables(Cow::Borrowed(msg))
    }

    /// Create an invalid-variables error with an owned string
    pub fn invalid_vars_owned(msg: String) -> Self {
        Error::InvalidVariables(Cow::Owned(msg))
    }

    /// Create a configuration error with a static string
    pub fn config_static(msg: &'static str) -> Self {
        Error::ConfigError(Cow::Borrowed(msg))
    }

    /// Whether this error means something was missing rather than broken
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::IoError(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result type alias for section-template operations
pub type Result<T> = std::result::Result<T, Error>;
