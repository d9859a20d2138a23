//! Form binder
//!
//! Wires fields into the model and validation errors back onto the DOM. The
//! validation itself is a caller-supplied callback; this module stops at the
//! wiring.

use std::cell::RefCell;
use std::rc::Rc;

use rivet_view::View;

use crate::binding::{default_value_reader, identity_transform, ModelFormMap, DEFAULT_ERROR_CLASS};
use crate::model::{AttributeSetter, Model};
use crate::ValidationError;

/// Read every mapped field into the model
///
/// Per field: await the value reader, await the transform, write through the
/// setter. Fields are processed in declaration order; every write completes
/// before this returns, so validation always sees the full model.
pub async fn read_into_model(
    view: &View,
    map: &ModelFormMap,
    model: &Rc<RefCell<Model>>,
    setter: &AttributeSetter,
) -> anyhow::Result<()> {
    for (attribute, binding) in map.iter() {
        let reader = binding
            .value_reader
            .clone()
            .unwrap_or_else(default_value_reader);
        let transform = binding.transform.clone().unwrap_or_else(identity_transform);

        let raw = reader(view.clone(), binding.element).await?;
        let value = transform(view.clone(), raw).await?;
        setter(&mut *model.borrow_mut(), attribute, value);
    }
    Ok(())
}

/// Unconditionally clear previously displayed field errors
///
/// Removes the error class from every error-class target, empties each
/// error-message element and re-hides it.
pub fn clear_errors(view: &View, map: &ModelFormMap, hidden_class: &str) {
    let doc = view.document();
    let mut doc = doc.borrow_mut();
    let tree = doc.tree_mut();
    for (_, binding) in map.iter() {
        let target = binding.error_class_element.unwrap_or(binding.element);
        let class = binding.error_class.as_deref().unwrap_or(DEFAULT_ERROR_CLASS);
        tree.remove_class(target, class);
        if let Some(message_element) = binding.error_message_element {
            tree.set_text(message_element, "");
            tree.add_class(message_element, hidden_class);
        }
    }
}

/// Display a structured validation error on the mapped fields
///
/// Explicit message wins over the code lookup; with neither, the field is
/// still marked. Attributes absent from the map are dropped.
pub fn apply_validation_errors(
    view: &View,
    map: &ModelFormMap,
    error: &ValidationError,
    hidden_class: &str,
) {
    let doc = view.document();
    let mut doc = doc.borrow_mut();
    let tree = doc.tree_mut();
    for (attribute, field_error) in &error.errors {
        let Some(binding) = map.get(attribute) else {
            tracing::debug!(attribute, "validation error for unmapped attribute, dropping");
            continue;
        };
        let message = field_error.message.clone().or_else(|| {
            field_error
                .code
                .as_ref()
                .and_then(|code| binding.error_messages.get(code).cloned())
        });

        let target = binding.error_class_element.unwrap_or(binding.element);
        let class = binding.error_class.as_deref().unwrap_or(DEFAULT_ERROR_CLASS);
        tree.add_class(target, class);

        if let Some(message_element) = binding.error_message_element {
            tree.set_text(message_element, message.as_deref().unwrap_or(""));
            tree.remove_class(message_element, hidden_class);
        }
    }
}
