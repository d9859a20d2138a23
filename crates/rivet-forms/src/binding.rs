//! Model-form map and normalization
//!
//! A declarative binding from model attributes to form fields, with a
//! one-time defaulting pass. Precedence during normalization: explicit value
//! > per-field default > view-level default. Normalization only fills unset
//! options, so applying it twice changes nothing.

use std::collections::HashMap;
use std::rc::Rc;

use rivet_dom::NodeId;
use rivet_view::{LocalBoxFuture, View};

use crate::model::FieldValue;

/// Default CSS class marking a field in error
pub const DEFAULT_ERROR_CLASS: &str = "erroneousInput";
/// Default CSS class hiding an error-message element
pub const DEFAULT_HIDDEN_CLASS: &str = "hidden";

/// Async hook reading a field's raw value
pub type ValueReader = Rc<dyn Fn(View, NodeId) -> LocalBoxFuture<anyhow::Result<FieldValue>>>;
/// Async hook transforming a read value before it reaches the model
pub type ValueTransform = Rc<dyn Fn(View, FieldValue) -> LocalBoxFuture<anyhow::Result<FieldValue>>>;
/// Hook toggling a field's input element
pub type InputToggle = Rc<dyn Fn(&View, NodeId)>;

/// Declarative binding of one model attribute to a form field
#[derive(Clone)]
pub struct FieldBinding {
    /// The input element
    pub element: NodeId,
    /// Element receiving the error class (the input itself by default)
    pub error_class_element: Option<NodeId>,
    /// Element showing the error message, if any
    pub error_message_element: Option<NodeId>,
    /// Error-code -> message lookup table
    pub error_messages: HashMap<String, String>,
    /// Reads the raw value (the element's form value by default)
    pub value_reader: Option<ValueReader>,
    /// Transforms the raw value (identity by default)
    pub transform: Option<ValueTransform>,
    /// Error class for this field (view-level default if unset)
    pub error_class: Option<String>,
    /// Custom disable hook (generic disabled flag by default)
    pub disable_input: Option<InputToggle>,
    /// Custom enable hook
    pub enable_input: Option<InputToggle>,
}

impl FieldBinding {
    pub fn new(element: NodeId) -> Self {
        Self {
            element,
            error_class_element: None,
            error_message_element: None,
            error_messages: HashMap::new(),
            value_reader: None,
            transform: None,
            error_class: None,
            disable_input: None,
            enable_input: None,
        }
    }

    pub fn error_class_element(mut self, element: NodeId) -> Self {
        self.error_class_element = Some(element);
        self
    }

    pub fn error_message_element(mut self, element: NodeId) -> Self {
        self.error_message_element = Some(element);
        self
    }

    /// Register a message for an error code
    pub fn error_message(mut self, code: &str, message: &str) -> Self {
        self.error_messages
            .insert(code.to_string(), message.to_string());
        self
    }

    pub fn error_class(mut self, class: &str) -> Self {
        self.error_class = Some(class.to_string());
        self
    }

    pub fn value_reader<F, Fut>(mut self, reader: F) -> Self
    where
        F: Fn(View, NodeId) -> Fut + 'static,
        Fut: std::future::Future<Output = anyhow::Result<FieldValue>> + 'static,
    {
        self.value_reader = Some(Rc::new(move |view, element| {
            Box::pin(reader(view, element))
        }));
        self
    }

    pub fn transform<F, Fut>(mut self, transform: F) -> Self
    where
        F: Fn(View, FieldValue) -> Fut + 'static,
        Fut: std::future::Future<Output = anyhow::Result<FieldValue>> + 'static,
    {
        self.transform = Some(Rc::new(move |view, value| Box::pin(transform(view, value))));
        self
    }

    pub fn disable_input<F>(mut self, hook: F) -> Self
    where
        F: Fn(&View, NodeId) + 'static,
    {
        self.disable_input = Some(Rc::new(hook));
        self
    }

    pub fn enable_input<F>(mut self, hook: F) -> Self
    where
        F: Fn(&View, NodeId) + 'static,
    {
        self.enable_input = Some(Rc::new(hook));
        self
    }
}

/// Ordered model-attribute -> field-binding map
#[derive(Clone, Default)]
pub struct ModelFormMap {
    fields: Vec<(String, FieldBinding)>,
}

impl ModelFormMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field binding, preserving declaration order
    pub fn field(mut self, attribute: &str, binding: FieldBinding) -> Self {
        self.fields.push((attribute.to_string(), binding));
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&FieldBinding> {
        self.fields
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, binding)| binding)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldBinding)> {
        self.fields
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn fields_mut(&mut self) -> impl Iterator<Item = &mut FieldBinding> {
        self.fields.iter_mut().map(|(_, binding)| binding)
    }
}

/// View-level defaults merged during normalization
#[derive(Debug, Clone)]
pub struct FormDefaults {
    pub error_class: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            error_class: DEFAULT_ERROR_CLASS.to_string(),
        }
    }
}

/// One-time defaulting pass over a model-form map
///
/// Only unset options are filled, so the pass is idempotent. The map is
/// rebuilt and re-normalized fresh for every submission attempt.
pub fn normalize(mut map: ModelFormMap, defaults: &FormDefaults) -> ModelFormMap {
    for binding in map.fields_mut() {
        if binding.error_class_element.is_none() {
            binding.error_class_element = Some(binding.element);
        }
        if binding.error_class.is_none() {
            binding.error_class = Some(defaults.error_class.clone());
        }
        if binding.value_reader.is_none() {
            binding.value_reader = Some(default_value_reader());
        }
        if binding.transform.is_none() {
            binding.transform = Some(identity_transform());
        }
    }
    map
}

/// Default reader: the element's form value, `Empty` when it has none
pub(crate) fn default_value_reader() -> ValueReader {
    Rc::new(|view: View, element| {
        Box::pin(async move {
            let doc = view.document().borrow();
            Ok(match doc.tree().form_value(element) {
                Some(value) => FieldValue::Text(value.to_string()),
                None => FieldValue::Empty,
            })
        })
    })
}

/// Default transform: identity
pub(crate) fn identity_transform() -> ValueTransform {
    Rc::new(|_view, value| Box::pin(async move { Ok(value) }))
}
