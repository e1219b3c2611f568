//! Integration tests for the chat completions client
//!
//! Tests HTTP client behavior using wiremock for request/response mocking.

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use holonic_backcasting::config::{LlmConfig, RequestConfig};
use holonic_backcasting::error::LlmError;
use holonic_backcasting::llm::{ChatClient, ChatMessage, LlmChat};

/// Create a test client pointing to mock server
fn create_test_client(base_url: &str) -> ChatClient {
    let config = LlmConfig {
        api_key: "test-api-key".to_string(),
        base_url: base_url.to_string(),
        model: "gpt-4o-mini".to_string(),
        temperature: 0.7,
        max_tokens: 2000,
    };

    let request_config = RequestConfig {
        timeout_ms: 5000,
        max_retries: 0, // No retries for testing
        retry_delay_ms: 100,
    };

    ChatClient::new(&config, request_config).expect("Failed to create client")
}

fn quest_exchange() -> [ChatMessage; 2] {
    [
        ChatMessage::system("You are a facilitator."),
        ChatMessage::user("Generate seed quests."),
    ]
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ],
        "usage": {
            "prompt_tokens": 100,
            "completion_tokens": 50,
            "total_tokens": 150
        }
    })
}

#[cfg(test)]
mod completion_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_completion() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(header("Content-Type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(r#"[{"title":"Map water sources"}]"#)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.send_message(&quest_exchange()).await;

        assert!(result.is_ok(), "Completion should succeed: {:?}", result.err());
        let reply = result.unwrap();
        assert_eq!(reply.content, r#"[{"title":"Map water sources"}]"#);
        let usage = reply.usage.expect("usage should be parsed");
        assert_eq!(usage.total_tokens, Some(150));
    }

    #[tokio::test]
    async fn test_request_carries_model_and_messages() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "You are a facilitator."},
                    {"role": "user", "content": "Generate seed quests."}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("[]")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.send_message(&quest_exchange()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_authentication_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "message": "Invalid API key",
                    "type": "authentication_error"
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.send_message(&quest_exchange()).await;

        let err = result.unwrap_err();
        assert!(matches!(err, LlmError::Unavailable { retries: 1, .. }));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "Internal server error"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.send_message(&quest_exchange()).await;

        assert!(result.is_err(), "Should return error for server error");
    }

    #[tokio::test]
    async fn test_response_without_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": []
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.send_message(&quest_exchange()).await;

        assert!(result.is_err(), "Should fail when no choices are returned");
    }

    #[tokio::test]
    async fn test_malformed_response_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.send_message(&quest_exchange()).await;

        assert!(result.is_err(), "Should fail on malformed JSON");
    }
}

#[cfg(test)]
mod timeout_tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_request_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("Delayed"))
                    .set_delay(Duration::from_secs(10)), // Longer than timeout
            )
            .mount(&mock_server)
            .await;

        let config = LlmConfig {
            api_key: "test-api-key".to_string(),
            base_url: mock_server.uri(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        };
        let request_config = RequestConfig {
            timeout_ms: 100, // 100ms timeout
            max_retries: 0,
            retry_delay_ms: 100,
        };
        let client = ChatClient::new(&config, request_config).unwrap();

        let result = client.send_message(&quest_exchange()).await;

        assert!(result.is_err(), "Should timeout");
    }
}

#[cfg(test)]
mod retry_tests {
    use super::*;

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let mock_server = MockServer::start().await;

        // First call fails, the retry succeeds.
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "Server error"}
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body("recovered")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = LlmConfig {
            api_key: "test-api-key".to_string(),
            base_url: mock_server.uri(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        };
        let request_config = RequestConfig {
            timeout_ms: 5000,
            max_retries: 2,
            retry_delay_ms: 10,
        };
        let client = ChatClient::new(&config, request_config).unwrap();

        let result = client.send_message(&quest_exchange()).await;
        assert_eq!(result.unwrap().content, "recovered");
    }

    #[tokio::test]
    async fn test_exhausted_retries_report_attempt_count() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": {"message": "Overloaded"}
            })))
            .expect(3)
            .mount(&mock_server)
            .await;

        let config = LlmConfig {
            api_key: "test-api-key".to_string(),
            base_url: mock_server.uri(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        };
        let request_config = RequestConfig {
            timeout_ms: 5000,
            max_retries: 2,
            retry_delay_ms: 10,
        };
        let client = ChatClient::new(&config, request_config).unwrap();

        let err = client.send_message(&quest_exchange()).await.unwrap_err();
        assert!(matches!(err, LlmError::Unavailable { retries: 3, .. }));
        assert!(err.to_string().contains("503"));
    }
}
