#[cfg(test)]
mod tests {
    use crate::client::{LlmClient, truncate};
    use crate::{ChatModel, ChatRequest, LlmError};
    use companion_chat_core::PromptMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_mock_server() -> MockServer {
        MockServer::start().await
    }

    fn create_test_request() -> ChatRequest {
        ChatRequest {
            model: "test-model".to_owned(),
            messages: vec![PromptMessage::system("hello")],
        }
    }

    fn choice(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{
                "message": {
                    "content": content,
                    "role": "assistant"
                }
            }]
        })
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let server = setup_mock_server().await;
        let client = LlmClient::new("test-key".to_owned(), server.uri()).unwrap();
        let request = create_test_request();

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(choice("test response")))
            .mount(&server)
            .await;

        let result = client.chat_completion(&request).await.unwrap();
        assert_eq!(result, "test response");
    }

    #[tokio::test]
    async fn test_retry_on_429_then_success() {
        let server = setup_mock_server().await;
        let client = LlmClient::new("test-key".to_owned(), server.uri()).unwrap();
        let request = create_test_request();

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(choice("success after retry")))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let result = client.chat_completion(&request).await.unwrap();
        assert_eq!(result, "success after retry");
    }

    #[tokio::test]
    async fn test_no_retry_on_401() {
        let server = setup_mock_server().await;
        let client = LlmClient::new("test-key".to_owned(), server.uri()).unwrap();
        let request = create_test_request();

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client.chat_completion(&request).await;
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("401"));
        assert!(err_msg.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_all_retries_exhausted() {
        let server = setup_mock_server().await;
        let client = LlmClient::new("test-key".to_owned(), server.uri()).unwrap();
        let request = create_test_request();

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .expect(4)
            .mount(&server)
            .await;

        let err = client.chat_completion(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::RetriesExhausted(_)));
        let err_msg = err.to_string();
        assert!(err_msg.contains("503"));
        assert!(err_msg.contains("Service Unavailable"));
    }

    #[tokio::test]
    async fn test_complete_sends_model_and_trims_answer() {
        let server = setup_mock_server().await;
        let client = LlmClient::new("test-key".to_owned(), format!("{}/", server.uri()))
            .unwrap()
            .with_model("gpt-test".to_owned());
        assert_eq!(client.base_url(), server.uri());
        assert_eq!(client.model(), "gpt-test");

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-test",
                "messages": [{"role": "system", "content": "persona"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(choice("  Мой тан.\n")))
            .mount(&server)
            .await;

        let answer = client.complete(&[PromptMessage::system("persona")]).await.unwrap();
        assert_eq!(answer, "Мой тан.");
    }

    #[tokio::test]
    async fn test_null_content_and_empty_choices_become_empty_string() {
        let server = setup_mock_server().await;
        let client = LlmClient::new("test-key".to_owned(), server.uri()).unwrap();

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": null, "role": "assistant"}}]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        assert_eq!(client.complete(&[PromptMessage::system("p")]).await.unwrap(), "");
        assert_eq!(client.complete(&[PromptMessage::system("p")]).await.unwrap(), "");
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate("привет", 3), "п");
        assert_eq!(truncate("short", 10), "short");
    }
}
