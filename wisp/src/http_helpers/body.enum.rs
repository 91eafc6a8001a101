use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Empty,
    Text(String),
    Json(Value),
}

impl Body {
    /// Decode raw request bytes the way the host adapters do: JSON when it
    /// parses, text otherwise, `Empty` for a zero-length payload.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Body::Empty;
        }

        match std::str::from_utf8(bytes) {
            Ok(text) => match serde_json::from_str::<Value>(text) {
                Ok(json) => Body::Json(json),
                Err(_) => Body::Text(text.to_string()),
            },
            Err(_) => Body::Text(String::from_utf8_lossy(bytes).to_string()),
        }
    }

    /// The payload as a service `data` value. `Empty` and JSON `null` both
    /// count as "no payload".
    pub fn into_data(self) -> Option<Value> {
        match self {
            Body::Empty | Body::Json(Value::Null) => None,
            Body::Json(json) => Some(json),
            Body::Text(text) => Some(Value::String(text)),
        }
    }
}
