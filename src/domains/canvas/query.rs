//! Query string construction for Canvas requests.
//!
//! Canvas expects list parameters as repeated bracketed keys
//! (`include[]=term&include[]=teachers`), so parameters are kept as ordered
//! pairs rather than a map.

use reqwest::Url;

use super::error::ApiError;

/// Ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single key/value pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Append a pair only when a value is present.
    pub fn push_opt<V: Into<String>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Append a list parameter as `key[]=v1&key[]=v2`.
    pub fn push_list<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = list_key(key);
        for value in values {
            self.pairs.push((key.clone(), value.into()));
        }
        self
    }

    /// Replace any existing value of `key` with `value`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.pairs.retain(|(k, _)| k != key);
        self.push(key, value)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Build query parameters from a JSON object of caller-supplied values.
    ///
    /// Scalars become single pairs, arrays become repeated keys and `null`
    /// values are skipped. Nested objects are rejected.
    pub fn from_json(object: &serde_json::Map<String, serde_json::Value>) -> Result<Self, String> {
        let mut params = Self::new();
        for (key, value) in object {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Array(items) => {
                    let values = items
                        .iter()
                        .map(|item| scalar_to_string(item).ok_or_else(|| key.clone()))
                        .collect::<Result<Vec<_>, _>>()?;
                    for value in values {
                        params.push(key.as_str(), value);
                    }
                }
                other => {
                    let value = scalar_to_string(other).ok_or_else(|| key.clone())?;
                    params.push(key.as_str(), value);
                }
            }
        }
        Ok(params)
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> Result<String, ApiError> {
        serde_urlencoded::to_string(&self.pairs)
            .map_err(|e| ApiError::invalid_url(format!("failed to encode query: {e}")))
    }

    /// Append these parameters to the URL's existing query string.
    pub fn apply_to(&self, url: &mut Url) -> Result<(), ApiError> {
        if self.pairs.is_empty() {
            return Ok(());
        }
        let encoded = self.encode()?;
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded,
        };
        url.set_query(Some(&query));
        Ok(())
    }
}

fn list_key(key: &str) -> String {
    if key.ends_with("[]") {
        key.to_string()
    } else {
        format!("{key}[]")
    }
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
