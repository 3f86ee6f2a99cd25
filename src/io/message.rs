use serde_json::Value;

use crate::engine::RawPost;

/// One line of the upstream stream, classified by its top-level key
#[derive(Debug)]
pub enum StreamMessage {
    /// A post payload carrying a point
    Post(Box<RawPost>),
    /// A post without a precise point; not applicable, never decoded further
    Unlocated { id: Option<u64> },
    /// Deletion notice for an earlier post
    Delete,
    /// Number of matching posts withheld by rate limiting
    Limit { undelivered: u64 },
    /// Stall or other server warning
    Warning { code: String, message: String },
    /// The server is about to close the connection
    Disconnect { code: u64, reason: String },
    /// Anything else the stream may carry
    Other,
}

impl StreamMessage {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if let Some(limit) = value.get("limit") {
            return Ok(Self::Limit {
                undelivered: limit.get("track").and_then(Value::as_u64).unwrap_or(0),
            });
        }
        if let Some(warning) = value.get("warning") {
            return Ok(Self::Warning {
                code: string_field(warning, "code"),
                message: string_field(warning, "message"),
            });
        }
        if let Some(disconnect) = value.get("disconnect") {
            return Ok(Self::Disconnect {
                code: disconnect.get("code").and_then(Value::as_u64).unwrap_or(0),
                reason: string_field(disconnect, "reason"),
            });
        }
        if value.get("delete").is_some() {
            return Ok(Self::Delete);
        }
        if value.get("id").is_some() {
            if !has_point(&value) {
                return Ok(Self::Unlocated {
                    id: value.get("id").and_then(Value::as_u64),
                });
            }
            return Ok(Self::Post(Box::new(serde_json::from_value(value)?)));
        }
        Ok(Self::Other)
    }
}

fn has_point(value: &Value) -> bool {
    value.get("coordinates").is_some_and(|point| !point.is_null())
}

fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
