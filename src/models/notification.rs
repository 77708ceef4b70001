use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `createdAt` exactly as the backend sent it. Normalized by
/// [`crate::utils::timestamp::normalize`] before it reaches the view-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Integer(i64),
    Float(f64),
    Object(Map<String, Value>),
    Other(Value),
}

impl std::fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawTimestamp::Text(text) => write!(f, "{:?}", text),
            RawTimestamp::Integer(n) => write!(f, "{}", n),
            RawTimestamp::Float(n) => write!(f, "{}", n),
            RawTimestamp::Object(map) => write!(f, "{}", Value::Object(map.clone())),
            RawTimestamp::Other(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, alias = "acknowledged")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
    /// Type-specific payload (`userName`, `userEmail`, ...), read only by the resolver.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Notification {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind.into()),
            read: false,
            created_at: None,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn with_created_at(mut self, created_at: RawTimestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }

    /// Non-blank string field, trimmed.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
