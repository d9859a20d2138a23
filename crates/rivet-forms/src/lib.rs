//! Rivet Forms
//!
//! Declarative model<->form binding on top of rivet-view: a model-form map
//! with one-time default filling, a binder that reads fields into a model
//! and maps validation errors back onto the DOM, and a submission controller
//! that runs the spinner/disable/validate/save flow with guaranteed cleanup.

mod binder;
mod binding;
mod model;
mod submit;

pub use binder::{apply_validation_errors, clear_errors, read_into_model};
pub use binding::{
    normalize, FieldBinding, FormDefaults, InputToggle, ModelFormMap, ValueReader, ValueTransform,
    DEFAULT_ERROR_CLASS, DEFAULT_HIDDEN_CLASS,
};
pub use model::{default_setter, AttributeSetter, FieldValue, Model};
pub use submit::{
    async_callback, cancel, install, listeners, submit, AsyncCallback, ErrorHook, FormConfig,
    MapBuilder, ViewHook,
};

use std::collections::HashMap;

/// Per-attribute validation failure detail
#[derive(Debug, Clone, Default)]
pub struct FieldError {
    /// Machine-readable code, looked up in the field's message table
    pub code: Option<String>,
    /// Explicit message; takes precedence over the code lookup
    pub message: Option<String>,
}

/// Structured validation failure: model attribute -> failure detail
///
/// Expected and recoverable: the submission controller displays it per field
/// and re-raises it; it is never routed to the generic error callback.
#[derive(Debug, Clone, Default, thiserror::Error)]
#[error("validation failed for {} attribute(s)", .errors.len())]
pub struct ValidationError {
    pub errors: HashMap<String, FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute failure with an error code
    pub fn code(mut self, attribute: &str, code: &str) -> Self {
        self.errors.insert(
            attribute.to_string(),
            FieldError {
                code: Some(code.to_string()),
                message: None,
            },
        );
        self
    }

    /// Add an attribute failure with an explicit message
    pub fn message(mut self, attribute: &str, message: &str) -> Self {
        self.errors.insert(
            attribute.to_string(),
            FieldError {
                code: None,
                message: Some(message.to_string()),
            },
        );
        self
    }

    /// Add an attribute failure with no code or message
    pub fn attribute(mut self, attribute: &str) -> Self {
        self.errors
            .insert(attribute.to_string(), FieldError::default());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
