//! Scalar values for template variables
//!
//! Template variables are plain text substitutions, so only scalar values can
//! be assigned: strings, numbers and booleans. The [`TemplateValue`] trait
//! converts a value into the text that replaces its placeholder, or `None` for
//! values that cannot be substituted (null, arrays, objects).
//!
//! Non-scalar values are dropped silently when variables are assigned. This
//! applies to root variables and section variables alike.
//!
//! # Built-in Implementations
//!
//! - `serde_json::Value` - scalars only
//! - `String`, `&str` - used as-is
//! - Numeric types - decimal representation
//! - `bool` - `"1"` for true, `""` for false
//! - `Option<T>` - `None` is dropped
//!
//! Maps of variables are usually passed as anything implementing
//! `serde::Serialize` (a `json!` object, a `HashMap`, a struct with named
//! fields); see [`scalar_pairs`].

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::borrow::Cow;

use crate::error::{Error, Result};

/// A value that can replace a placeholder in a template
///
/// # Examples
///
/// ```rust,ignore
/// use section_template::TemplateValue;
///
/// assert_eq!("hello".to_template_string().unwrap(), "hello");
/// assert_eq!(42u32.to_template_string().unwrap(), "42");
/// assert_eq!(true.to_template_string().unwrap(), "1");
/// ```
pub trait TemplateValue {
    /// Text to substitute, or `None` if this value is not a scalar
    fn to_template_string(&self) -> Option<Cow<'_, str>>;
}

impl TemplateValue for JsonValue {
    fn to_template_string(&self) -> Option<Cow<'_, str>> {
        match self {
            JsonValue::String(s) => Some(Cow::Borrowed(s.as_str())),
            JsonValue::Number(n) => Some(Cow::Owned(n.to_string())),
            JsonValue::Bool(b) => b.to_template_string(),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }
}

impl TemplateValue for String {
    fn to_template_string(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl TemplateValue for str {
    fn to_template_string(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl TemplateValue for bool {
    fn to_template_string(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if *self { "1" } else { "" }))
    }
}

impl<T: TemplateValue + ?Sized> TemplateValue for &T {
    fn to_template_string(&self) -> Option<Cow<'_, str>> {
        (**self).to_template_string()
    }
}

impl<T: TemplateValue> TemplateValue for Option<T> {
    fn to_template_string(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|v| v.to_template_string())
    }
}

macro_rules! impl_template_value_for_number {
    ($($t:ty),*) => {
        $(
            impl TemplateValue for $t {
                fn to_template_string(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

impl_template_value_for_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Serialize host variables into a map, in map order
///
/// `vars` must serialize to a map. Unit and `null` count as an empty map.
pub fn variable_map<T: Serialize + ?Sized>(vars: &T) -> Result<serde_json::Map<String, JsonValue>> {
    match serde_json::to_value(vars)? {
        JsonValue::Object(map) => Ok(map),
        JsonValue::Null => Ok(serde_json::Map::new()),
        other => Err(Error::invalid_vars_owned(format!(
            "expected a map of variables, got {}",
            json_kind(&other)
        ))),
    }
}

/// Keep the entries of `map` whose values are scalars
pub fn filter_scalars(map: serde_json::Map<String, JsonValue>) -> Vec<(String, String)> {
    map.into_iter()
        .filter_map(|(key, value)| {
            let text = value.to_template_string()?.into_owned();
            Some((key, text))
        })
        .collect()
}

/// Serialize host variables and keep the scalar entries, in map order
///
/// Entries whose values are not scalars are skipped; see [`variable_map`].
pub fn scalar_pairs<T: Serialize + ?Sized>(vars: &T) -> Result<Vec<(String, String)>> {
    variable_map(vars).map(filter_scalars)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "a map",
    }
}
