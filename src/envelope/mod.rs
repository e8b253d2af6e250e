//! Result envelope - the uniform shape of every successful tool call.
//!
//! An envelope holds one or more content blocks. Every tool in this server
//! returns exactly one text block holding pretty-printed JSON.

use serde::{Deserialize, Serialize};

use crate::types::Result;

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
        }
    }
}

/// Successful tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub content: Vec<Content>,
}

impl ResultEnvelope {
    /// Wrap a serializable value as a single pretty-printed (2-space) JSON text block.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let text = serde_json::to_string_pretty(value)?;
        Ok(Self {
            content: vec![Content::text(text)],
        })
    }

    /// Text of the first block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(Content::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_envelope_is_pretty_printed() {
        let envelope = ResultEnvelope::json(&json!({"barcode": "123"})).unwrap();
        assert_eq!(envelope.content.len(), 1);
        assert_eq!(envelope.first_text(), Some("{\n  \"barcode\": \"123\"\n}"));
    }

    #[test]
    fn test_wire_shape() {
        let envelope = ResultEnvelope {
            content: vec![Content::text("hello")],
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"content": [{"type": "text", "text": "hello"}]})
        );
    }
}
