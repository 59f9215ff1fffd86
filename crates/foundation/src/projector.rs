//! Strict object projection
//!
//! Maps an untyped JSON value onto a declared [`Shape`]: a list of named,
//! typed fields with default values. Two modes are supported:
//!
//! - **permissive** (`strict = false`): every declared field is copied from the
//!   input when present and of the declared kind, otherwise the default is
//!   used. Unknown keys are dropped and a null input yields the defaults.
//! - **strict** (`strict = true`): the input must be an object carrying exactly
//!   the declared keys, each of the same kind class (object, array or
//!   primitive) as the declaration. The result deep-equals the input.
//!
//! Projection is pure; it never touches the input.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

use crate::{HiveError, HiveResult};

/// Declared kind of a shape field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Accepts any non-null value.
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindClass {
    Primitive,
    Array,
    Object,
}

impl FieldKind {
    fn class(&self) -> Option<KindClass> {
        match self {
            FieldKind::String | FieldKind::Number | FieldKind::Boolean => {
                Some(KindClass::Primitive)
            }
            FieldKind::Array => Some(KindClass::Array),
            FieldKind::Object => Some(KindClass::Object),
            FieldKind::Any => None,
        }
    }

    /// Exact kind check used by permissive projection.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => false,
            (FieldKind::Any, _) => true,
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Array, Value::Array(_)) => true,
            (FieldKind::Object, Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Kind-class check used by strict projection. Null is let through so the
    /// metadata layer can report it with its own wording.
    fn compatible(&self, value: &Value) -> bool {
        match (self.class(), class_of(value)) {
            (None, _) | (_, None) => true,
            (Some(expected), Some(actual)) => expected == actual,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
            FieldKind::Any => "any",
        };
        f.write_str(label)
    }
}

fn class_of(value: &Value) -> Option<KindClass> {
    match value {
        Value::Null => None,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Some(KindClass::Primitive),
        Value::Array(_) => Some(KindClass::Array),
        Value::Object(_) => Some(KindClass::Object),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub default: Value,
}

/// Declarative field list a value is projected onto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    fields: Vec<FieldSpec>,
}

impl Shape {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, name: &str, kind: FieldKind, default: Value) -> Self {
        self.fields.retain(|field| field.name != name);
        self.fields.push(FieldSpec {
            name: name.to_string(),
            kind,
            default,
        });
        self
    }

    pub fn string(self, name: &str, default: &str) -> Self {
        self.field(name, FieldKind::String, Value::String(default.to_string()))
    }

    pub fn number(self, name: &str, default: i64) -> Self {
        self.field(name, FieldKind::Number, Value::from(default))
    }

    pub fn boolean(self, name: &str, default: bool) -> Self {
        self.field(name, FieldKind::Boolean, Value::Bool(default))
    }

    pub fn array(self, name: &str) -> Self {
        self.field(name, FieldKind::Array, Value::Array(Vec::new()))
    }

    pub fn object(self, name: &str) -> Self {
        self.field(name, FieldKind::Object, Value::Object(Map::new()))
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn defaults(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.default.clone()))
            .collect()
    }
}

/// Projects `input` onto `shape`.
pub fn project(shape: &Shape, input: Option<&Value>, strict: bool) -> HiveResult<Map<String, Value>> {
    if strict {
        project_strict(shape, input)
    } else {
        Ok(project_permissive(shape, input))
    }
}

/// Projects and then deserializes the projected object into `T`.
pub fn project_as<T: DeserializeOwned>(
    shape: &Shape,
    input: Option<&Value>,
    strict: bool,
) -> HiveResult<T> {
    let projected = project(shape, input, strict)?;
    serde_json::from_value(Value::Object(projected))
        .map_err(|e| HiveError::validation_error(e.to_string()))
}

/// Element-wise [`project`]. Strict mode stops at the first failing element.
pub fn project_array(
    shape: &Shape,
    inputs: &[Value],
    strict: bool,
) -> HiveResult<Vec<Map<String, Value>>> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            project(shape, Some(input), strict).map_err(|e| match e {
                HiveError::Validation { worker, message } => HiveError::Validation {
                    worker,
                    message: format!("Element {index}: {message}"),
                },
                other => other,
            })
        })
        .collect()
}

fn project_permissive(shape: &Shape, input: Option<&Value>) -> Map<String, Value> {
    let source = match input {
        Some(Value::Object(map)) => map,
        _ => return shape.defaults(),
    };

    shape
        .fields
        .iter()
        .map(|field| {
            let value = match source.get(&field.name) {
                Some(value) if field.kind.accepts(value) => value.clone(),
                _ => field.default.clone(),
            };
            (field.name.clone(), value)
        })
        .collect()
}

fn project_strict(shape: &Shape, input: Option<&Value>) -> HiveResult<Map<String, Value>> {
    let source = match input {
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(HiveError::validation_error(format!(
                "Expected an object but received {}",
                describe(other)
            )))
        }
        None => {
            return Err(HiveError::validation_error(
                "Expected an object but received null",
            ))
        }
    };

    if let Some(key) = source.keys().find(|key| shape.get(key).is_none()) {
        return Err(HiveError::validation_error(format!(
            "Unexpected key '{key}'"
        )));
    }

    let mut projected = Map::new();
    for field in &shape.fields {
        let value = source.get(&field.name).ok_or_else(|| {
            HiveError::validation_error(format!("Missing key '{}'", field.name))
        })?;
        if !field.kind.compatible(value) {
            return Err(HiveError::validation_error(format!(
                "Key '{}' expected {} but received {}",
                field.name,
                field.kind,
                describe(value)
            )));
        }
        projected.insert(field.name.clone(), value.clone());
    }

    Ok(projected)
}
