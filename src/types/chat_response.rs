use serde::{Deserialize, Serialize};

/// Body of a successful `POST /chat` response.
///
/// Whether a reply is a crisis reply is decided entirely by the backend; the
/// client only highlights it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    /// The text to show as the bot's turn.
    pub response: String,

    /// Whether the crisis banner should be shown for this turn.
    #[serde(default)]
    pub crisis: bool,
}

impl ChatResponse {
    /// Create a new `ChatResponse`.
    pub fn new(response: impl Into<String>, crisis: bool) -> Self {
        Self {
            response: response.into(),
            crisis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_response_deserialization() {
        let json = json!({"response": "seek help", "crisis": true});
        let response: ChatResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response, ChatResponse::new("seek help", true));
    }

    #[test]
    fn missing_crisis_defaults_false() {
        let response: ChatResponse = serde_json::from_str(r#"{"response":"ok"}"#).unwrap();
        assert!(!response.crisis);
    }

    #[test]
    fn missing_response_is_an_error() {
        assert!(serde_json::from_str::<ChatResponse>(r#"{"crisis":false}"#).is_err());
    }
}
