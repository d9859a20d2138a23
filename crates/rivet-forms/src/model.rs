//! Model and field values
//!
//! The model is a plain attribute map; writes go through a configurable
//! setter so callers can intercept or redirect assignments.

use std::collections::HashMap;
use std::rc::Rc;

/// Form field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Multiple(Vec<String>),
    Empty,
}

impl FieldValue {
    /// Text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty) || matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Model: attribute name -> field value
#[derive(Debug, Clone, Default)]
pub struct Model {
    values: HashMap<String, FieldValue>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: &str) -> Option<&FieldValue> {
        self.values.get(attribute)
    }

    pub fn set(&mut self, attribute: &str, value: FieldValue) {
        self.values.insert(attribute.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Hook writing one attribute into the model
pub type AttributeSetter = Rc<dyn Fn(&mut Model, &str, FieldValue)>;

/// The default setter: direct assignment into the model map
pub fn default_setter() -> AttributeSetter {
    Rc::new(|model, attribute, value| model.set(attribute, value))
}
