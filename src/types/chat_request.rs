use serde::{Deserialize, Serialize};

use crate::types::SessionId;

/// Body of a `POST /chat` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// Identifier correlating the turns of one conversation.
    pub session_id: SessionId,

    /// The user's message, already trimmed.
    pub query: String,
}

impl ChatRequest {
    /// Create a new `ChatRequest` for the given session.
    pub fn new(session_id: SessionId, query: impl Into<String>) -> Self {
        Self {
            session_id,
            query: query.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn chat_request_wire_format() {
        let request = ChatRequest::new(SessionId::from("session_1_abc"), "hello");
        let json = to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "session_id": "session_1_abc",
                "query": "hello"
            })
        );
    }
}
