//! Field-by-field validation of tool arguments.
//!
//! Arguments are decoded one field at a time so every failure names the
//! offending field instead of surfacing a bare serde message.

use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, de::DeserializeOwned};

use super::ToolError;

/// A single value or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Arguments passed to a tool call.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    values: JsonObject,
}

impl ToolArguments {
    pub fn new(arguments: Option<JsonObject>) -> Self {
        Self {
            values: arguments.unwrap_or_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reject any field not in `allowed`.
    pub fn accept_only(&self, allowed: &[&str]) -> Result<(), ToolError> {
        let mut unknown: Vec<&str> = self
            .values
            .keys()
            .map(String::as_str)
            .filter(|key| !allowed.contains(key))
            .collect();
        unknown.sort_unstable();

        match unknown.first() {
            None => Ok(()),
            Some(field) if allowed.is_empty() => Err(ToolError::invalid_argument(
                *field,
                "this tool takes no arguments",
            )),
            Some(field) => Err(ToolError::invalid_argument(
                *field,
                format!("unknown field, expected one of: {}", allowed.join(", ")),
            )),
        }
    }

    /// Decode an optional field. `null` counts as absent.
    pub fn optional<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, ToolError> {
        match self.values.get(field) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ToolError::invalid_argument(field, e.to_string())),
        }
    }

    /// Decode a required field.
    pub fn required<T: DeserializeOwned>(&self, field: &str) -> Result<T, ToolError> {
        self.optional(field)?
            .ok_or_else(|| ToolError::invalid_argument(field, "missing required field"))
    }

    /// Decode a field that may be given under any of `names` (canonical name first).
    pub fn optional_any<T: DeserializeOwned>(&self, names: &[&str]) -> Result<Option<T>, ToolError> {
        let present: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !matches!(self.values.get(*name), None | Some(serde_json::Value::Null)))
            .collect();

        match present.as_slice() {
            [] => Ok(None),
            [name] => self.optional(name),
            [first, second, ..] => Err(ToolError::invalid_argument(
                *second,
                format!("conflicts with '{first}', pass only one of them"),
            )),
        }
    }

    /// Like [`required`](Self::required), accepting aliases.
    pub fn required_any<T: DeserializeOwned>(&self, names: &[&str]) -> Result<T, ToolError> {
        let canonical = names.first().copied().unwrap_or_default();
        self.optional_any(names)?
            .ok_or_else(|| ToolError::invalid_argument(canonical, "missing required field"))
    }

    /// Decode an optional integer and check it lies in `min..=max`.
    pub fn optional_bounded(
        &self,
        field: &str,
        min: usize,
        max: usize,
    ) -> Result<Option<usize>, ToolError> {
        let Some(value) = self.optional::<i64>(field)? else {
            return Ok(None);
        };
        match usize::try_from(value) {
            Ok(value) if (min..=max).contains(&value) => Ok(Some(value)),
            _ => Err(ToolError::invalid_argument(
                field,
                format!("must be between {min} and {max}, got {value}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> ToolArguments {
        ToolArguments::new(value.as_object().cloned())
    }

    fn field_of(err: ToolError) -> String {
        match err {
            ToolError::InvalidArguments { field, .. } => field,
            other => panic!("expected invalid arguments, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_field_is_named() {
        let err = args(json!({ "limit": 5, "colour": "red" }))
            .accept_only(&["limit"])
            .unwrap_err();
        assert_eq!(field_of(err), "colour");
    }

    #[test]
    fn test_no_argument_tool() {
        assert!(args(json!({})).accept_only(&[]).is_ok());
        let err = args(json!({ "x": 1 })).accept_only(&[]).unwrap_err();
        assert!(err.to_string().contains("takes no arguments"));
    }

    #[test]
    fn test_wrong_type_is_named() {
        let err = args(json!({ "limit": "ten" }))
            .optional::<u32>("limit")
            .unwrap_err();
        assert_eq!(field_of(err), "limit");
    }

    #[test]
    fn test_null_is_absent() {
        let value: Option<String> = args(json!({ "state": null })).optional("state").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_required_missing() {
        let err = args(json!({})).required::<String>("path").unwrap_err();
        assert_eq!(field_of(err), "path");
    }

    #[test]
    fn test_aliases() {
        let a = args(json!({ "course_id": 42 }));
        assert_eq!(a.required_any::<u64>(&["id", "course_id"]).unwrap(), 42);

        let err = args(json!({ "id": 1, "course_id": 2 }))
            .optional_any::<u64>(&["id", "course_id"])
            .unwrap_err();
        assert_eq!(field_of(err), "course_id");

        let err = args(json!({})).required_any::<u64>(&["id", "course_id"]).unwrap_err();
        assert_eq!(field_of(err), "id");
    }

    #[test]
    fn test_bounds() {
        let a = args(json!({ "limit": 0, "per_page": 100, "big": -3 }));
        assert_eq!(field_of(a.optional_bounded("limit", 1, 1000).unwrap_err()), "limit");
        assert_eq!(a.optional_bounded("per_page", 1, 100).unwrap(), Some(100));
        assert!(a.optional_bounded("big", 1, 10).is_err());
        assert_eq!(a.optional_bounded("missing", 1, 10).unwrap(), None);
    }
}
