//! Wire types for the Telegram Bot API.

use serde::{Deserialize, Serialize};

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendMessageRequest {
    /// An HTML-formatted message without buttons.
    #[must_use]
    pub fn html(chat_id: String, text: String) -> Self {
        Self {
            chat_id,
            text,
            parse_mode: "HTML",
            reply_markup: None,
        }
    }
}

/// Inline keyboard attached below a message.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// One inline keyboard button.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

/// Envelope every Bot API call answers with.
#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_markup_omitted_when_absent() {
        let request = SendMessageRequest::html("42".to_owned(), "<b>hi</b>".to_owned());
        let json = serde_json::to_string(&request).expect("serialize");
        assert!(!json.contains("reply_markup"));
        assert!(json.contains("\"parse_mode\":\"HTML\""));
    }

    #[test]
    fn test_error_response_parses() {
        let response: SendMessageResponse =
            serde_json::from_str(r#"{"ok":false,"description":"chat not found"}"#)
                .expect("deserialize");
        assert!(!response.ok);
        assert_eq!(response.description.as_deref(), Some("chat not found"));
    }
}
