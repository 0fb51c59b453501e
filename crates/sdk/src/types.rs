//! SDK Request/Response Types
//!
//! Task specs and responses are JSON objects on the wire. Known fields are
//! typed; everything else travels through an open string-keyed map.

use crate::error::{Result, SdkError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Crawl strategy that accepts arbitrary URLs
pub const UNIVERSAL: &str = "universal";

/// Description of a crawl task to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Crawl strategy tag (e.g. `universal`)
    #[serde(rename = "type")]
    pub task_type: String,

    /// Seed URLs, in submission order
    #[serde(default)]
    pub input: Vec<String>,

    /// Additional fields, sent alongside `type` and `input`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskSpec {
    pub fn new(task_type: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            input: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Shorthand for a `universal` task over the given URLs
    pub fn universal<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(UNIVERSAL).with_inputs(urls)
    }

    pub fn with_input(mut self, url: impl Into<String>) -> Self {
        self.input.push(url.into());
        self
    }

    pub fn with_inputs<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input.extend(urls.into_iter().map(Into::into));
        self
    }

    /// Attach an extra field. Later values for the same key win.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Reject specs the service could never accept.
    pub fn validate(&self) -> Result<()> {
        if self.task_type.trim().is_empty() {
            return Err(SdkError::InvalidSpec("task type must not be empty".into()));
        }
        if self.input.is_empty() {
            return Err(SdkError::InvalidSpec(
                "input must contain at least one URL".into(),
            ));
        }
        if let Some(pos) = self.input.iter().position(|url| url.trim().is_empty()) {
            return Err(SdkError::InvalidSpec(format!("input[{}] is empty", pos)));
        }
        for reserved in ["type", "input"] {
            if self.extra.contains_key(reserved) {
                return Err(SdkError::InvalidSpec(format!(
                    "extra field '{}' collides with a typed field",
                    reserved
                )));
            }
        }
        Ok(())
    }
}

/// Identifier assigned to a created task
///
/// The service may send it as a string or an integer; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => TaskId(s),
            RawId::Signed(n) => TaskId(n.to_string()),
            RawId::Unsigned(n) => TaskId(n.to_string()),
        })
    }
}

/// Response from the create-task call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct TaskResponse {
    pub id: TaskId,

    /// Every other key the service returned
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for TaskResponse {
    type Error = SdkError;

    fn try_from(object: Map<String, Value>) -> Result<Self> {
        Self::from_object(object)
    }
}

impl TaskResponse {
    /// Build a response from a decoded JSON object, enforcing the `id` contract.
    pub fn from_object(mut object: Map<String, Value>) -> Result<Self> {
        let id = match object.remove("id") {
            None | Some(Value::Null) => return Err(SdkError::MissingId),
            Some(raw) => serde_json::from_value::<TaskId>(raw)
                .map_err(|e| SdkError::Decode(format!("invalid task id: {}", e)))?,
        };
        if id.as_str().is_empty() {
            return Err(SdkError::MissingId);
        }

        Ok(Self { id, fields: object })
    }

    /// Whether `key` is present in the response (always true for `id`).
    pub fn contains_key(&self, key: &str) -> bool {
        key == "id" || self.fields.contains_key(key)
    }

    /// Look up a non-`id` field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Task status, if the service reported one
    pub fn status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }

    /// Full response as a JSON object, `id` included
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert("id".to_string(), Value::String(self.id.to_string()));
        object.extend(self.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Value::Object(object)
    }
}
