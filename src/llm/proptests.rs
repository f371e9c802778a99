//! Property-based tests for the chat-completions translation layer
//!
//! - Translation keeps every message, with the system message first
//! - Whitespace-only completions are rejected
//! - Non-empty completions come back trimmed

use super::openai::{ChatChoice, ChatMessage, ChatResponse, OpenAiCompatService};
use super::types::{LlmMessage, LlmRequest};
use super::{LlmConfig, LlmErrorKind};
use proptest::prelude::*;

fn arb_message() -> impl Strategy<Value = LlmMessage> {
    (any::<bool>(), "[a-zA-Z0-9 _.!?,]{0,80}").prop_map(|(user, text)| {
        if user {
            LlmMessage::user(text)
        } else {
            LlmMessage::assistant(text)
        }
    })
}

fn arb_request() -> impl Strategy<Value = LlmRequest> {
    (
        proptest::option::of("[a-zA-Z ]{1,40}"),
        proptest::collection::vec(arb_message(), 0..8),
    )
        .prop_map(|(system, messages)| LlmRequest {
            system,
            messages,
            max_tokens: Some(64),
            temperature: Some(0.8),
        })
}

fn response_with(content: Option<String>) -> ChatResponse {
    ChatResponse {
        choices: vec![ChatChoice {
            message: ChatMessage {
                role: "assistant".to_string(),
                content,
            },
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}

proptest! {
    #[test]
    fn translation_preserves_messages(request in arb_request()) {
        let service = OpenAiCompatService::new(&LlmConfig::default()).unwrap();
        let wire = service.translate_request(&request);

        let offset = usize::from(request.system.is_some());
        prop_assert_eq!(wire.messages.len(), request.messages.len() + offset);
        if offset == 1 {
            prop_assert_eq!(wire.messages[0].role.as_str(), "system");
        }
        for (msg, out) in request.messages.iter().zip(&wire.messages[offset..]) {
            prop_assert_eq!(msg.role.as_str(), out.role.as_str());
            prop_assert_eq!(Some(msg.text.as_str()), out.content.as_deref());
        }
    }

    #[test]
    fn whitespace_completions_rejected(ws in "[ \t\n]{0,10}") {
        let err = OpenAiCompatService::normalize_response(response_with(Some(ws))).unwrap_err();
        prop_assert_eq!(err.kind, LlmErrorKind::EmptyCompletion);
    }

    #[test]
    fn completions_trimmed(core in "[a-zA-Z0-9.!?]{1,40}", pad in "[ \n]{0,4}") {
        let raw = format!("{pad}{core}{pad}");
        let resp = OpenAiCompatService::normalize_response(response_with(Some(raw))).unwrap();
        prop_assert_eq!(resp.text, core);
    }
}
