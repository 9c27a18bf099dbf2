//! The inference client.
//!
//! [`InferenceClient`] orchestrates one call end to end: normalize the
//! request (substituting the configured default model when the caller
//! named none), dispatch it through the [`Transport`], and decode the
//! reply. It is stateless across calls apart from its read-only
//! configuration; concurrent invocations share nothing mutable.
//!
//! Changing configuration through [`set_default_model`] while calls are
//! in flight is not guarded and not supported.
//!
//! [`set_default_model`]: InferenceClient::set_default_model

use serde::de::DeserializeOwned;
use tracing::info;

use structo_core::{derive_schema, RequiredFields, Schematic};

use crate::config::ClientConfig;
use crate::decode::decode_response;
use crate::error::{Result, ValidationError};
use crate::request::{ChatRequest, InferenceRequest, InferenceRequestBuilder};
use crate::response::{ChatResponse, InferenceResponse, ModelInfo, ModelList};
use crate::transport::Transport;

/// Single-turn inference endpoint path.
const GENERATE_PATH: &str = "/api/generate";
/// Multi-turn chat endpoint path.
const CHAT_PATH: &str = "/api/chat/completions";
/// Model listing endpoint path.
const MODELS_PATH: &str = "/api/models";

/// Client for an Ollama-compatible inference endpoint.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    transport: Transport,
    default_model: Option<String>,
}

impl InferenceClient {
    /// Create a client for the given base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Create a client from full configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            transport: Transport::new(&config),
            default_model: config.default_model.clone(),
        }
    }

    /// Create a client from environment variables (see
    /// [`ClientConfig::from_env`] for the recognized keys).
    pub fn from_env(prefix: &str) -> Self {
        Self::with_config(ClientConfig::from_env(prefix))
    }

    /// Set the default model, fluent form.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Replace the default model after construction.
    ///
    /// Not safe to call while calls are in flight on clones of this
    /// client; callers own that synchronization.
    pub fn set_default_model(&mut self, model: impl Into<String>) {
        self.default_model = Some(model.into());
    }

    /// Run a single-turn inference call.
    ///
    /// Accepts either a built [`InferenceRequest`] or a bare
    /// [`InferenceRequestBuilder`]; a request naming no model gets the
    /// client's default substituted before validation. The caller's
    /// request is never mutated: substitution rebuilds through a
    /// re-seeded builder.
    pub async fn infer(
        &self,
        request: impl Into<InferenceRequestBuilder>,
    ) -> Result<InferenceResponse> {
        let request = self.normalize(request.into())?;
        let body = self.dispatch(&request).await?;
        Ok(decode_response(&body)?)
    }

    /// Run a single-turn inference call constrained to `T`'s schema and
    /// decode the response text into a `T`.
    ///
    /// Derives the schema for `T` honoring `required`, attaches it as
    /// the request's `format` (overriding any format already set), and
    /// after dispatch deserializes the response's text payload.
    ///
    /// # Errors
    ///
    /// Besides validation and transport failures, a response that does
    /// not parse as a `T` fails with a
    /// [`DecodeError`](crate::error::DecodeError) carrying the raw text.
    pub async fn infer_as<T>(
        &self,
        request: impl Into<InferenceRequestBuilder>,
        required: &RequiredFields,
    ) -> Result<T>
    where
        T: Schematic + DeserializeOwned,
    {
        let schema = derive_schema::<T>(required)?;
        let request = self.normalize(request.into().format(schema))?;
        let body = self.dispatch(&request).await?;
        let response: InferenceResponse = decode_response(&body)?;
        Ok(decode_response(&response.response)?)
    }

    /// Run a multi-turn chat call.
    ///
    /// A request naming no model gets the client's default substituted;
    /// the caller's conversation is passed through untouched.
    pub async fn chat(&self, mut request: ChatRequest) -> Result<ChatResponse> {
        if request.model.is_empty() {
            if let Some(default) = &self.default_model {
                request.model = default.clone();
            }
        }
        request.validate()?;

        info!(model = %request.model, "Messaging {}", request.model);
        let body = self.transport.post_json(CHAT_PATH, &request).await?;
        Ok(decode_response(&body)?)
    }

    /// List the models the server offers.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let body = self.transport.get(MODELS_PATH).await?;
        let listing: ModelList = decode_response(&body)?;
        Ok(listing.data)
    }

    /// Substitute the default model when none was named, then validate.
    fn normalize(
        &self,
        mut builder: InferenceRequestBuilder,
    ) -> std::result::Result<InferenceRequest, ValidationError> {
        if !builder.has_model() {
            if let Some(default) = &self.default_model {
                builder = builder.model(default.clone());
            }
        }
        builder.build()
    }

    async fn dispatch(&self, request: &InferenceRequest) -> Result<String> {
        info!(model = %request.model, "Messaging {}", request.model);
        Ok(self.transport.post_json(GENERATE_PATH, request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;
    use structo_core::{Message, SchemaDocument};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use crate::error::{DecodeError, Error, TransportError};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pet {
        id: i64,
        name: String,
    }

    impl Schematic for Pet {
        fn json_schema() -> SchemaDocument {
            json!({
                "$id": "urn:schematic:Pet",
                "title": "Pet",
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string"}
                }
            })
        }

        fn field_names() -> &'static [&'static str] {
            &["id", "name"]
        }

        fn schema_name() -> &'static str {
            "Pet"
        }
    }

    fn generate_body(response_text: &str) -> String {
        json!({
            "model": "m",
            "created_at": "2025-01-05T12:00:00Z",
            "response": response_text,
            "done": true
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_infer_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(generate_body("blue")))
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new(server.uri());
        let request = InferenceRequest::builder()
            .model("m")
            .prompt("why?")
            .build()
            .unwrap();
        let response = client.infer(request).await.unwrap();
        assert_eq!(response.response, "blue");
        assert!(response.done);
    }

    #[tokio::test]
    async fn test_infer_substitutes_default_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(generate_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new(server.uri()).with_default_model("fallback");
        client
            .infer(InferenceRequest::builder().prompt("p"))
            .await
            .unwrap();

        let sent: serde_json::Value = {
            let requests = server.received_requests().await.unwrap();
            serde_json::from_slice(&requests[0].body).unwrap()
        };
        assert_eq!(sent["model"], "fallback");
    }

    #[tokio::test]
    async fn test_infer_without_model_or_default_fails_validation() {
        let client = InferenceClient::new("http://localhost:0");
        let err = client
            .infer(InferenceRequest::builder().prompt("p"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingModel)
        ));
    }

    #[tokio::test]
    async fn test_infer_as_posts_schema_and_decodes_typed_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(generate_body(r#"{"id": 1, "name": "x"}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new(server.uri());
        let request = InferenceRequest::builder().model("m").prompt("p");
        let pet: Pet = client.infer_as(request, &RequiredFields::All).await.unwrap();
        assert_eq!(pet, Pet { id: 1, name: "x".to_string() });

        // The posted body carries the derived schema with both fields
        // required and no identifier markers.
        let sent: serde_json::Value = {
            let requests = server.received_requests().await.unwrap();
            serde_json::from_slice(&requests[0].body).unwrap()
        };
        assert_eq!(sent["format"]["required"], json!(["id", "name"]));
        assert_eq!(sent["format"]["type"], "object");
        assert!(sent["format"].get("$id").is_none());
    }

    #[tokio::test]
    async fn test_infer_as_decode_failure_carries_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(generate_body("not json at all")),
            )
            .mount(&server)
            .await;

        let client = InferenceClient::new(server.uri());
        let request = InferenceRequest::builder().model("m").prompt("p");
        let err = client
            .infer_as::<Pet>(request, &RequiredFields::All)
            .await
            .unwrap_err();
        match err {
            Error::Decode(DecodeError::Decode { raw, .. }) => {
                assert_eq!(raw, "not json at all");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_failure_surfaces_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = InferenceClient::new(server.uri());
        let request = InferenceRequest::builder().model("m").prompt("p");
        let err = client.infer(request).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::Http { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                json!({
                    "id": "chatcmpl-1",
                    "model": "m",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "hi there"},
                        "finish_reason": "stop"
                    }]
                })
                .to_string(),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new(server.uri());
        let chat = ChatRequest::new("m", vec![Message::user("hi")]);
        let response = client.chat(chat).await.unwrap();
        assert_eq!(response.text(), Some("hi there"));
    }

    #[tokio::test]
    async fn test_chat_substitutes_default_model_and_validates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                json!({"model": "fallback", "choices": []}).to_string(),
            ))
            .mount(&server)
            .await;

        let client = InferenceClient::new(server.uri()).with_default_model("fallback");
        client
            .chat(ChatRequest::new("", vec![Message::user("hi")]))
            .await
            .unwrap();

        let sent: serde_json::Value = {
            let requests = server.received_requests().await.unwrap();
            let sent: &Request = &requests[0];
            serde_json::from_slice(&sent.body).unwrap()
        };
        assert_eq!(sent["model"], "fallback");

        let err = client
            .chat(ChatRequest::new("m", Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingMessages)
        ));
    }

    #[tokio::test]
    async fn test_list_models_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                json!({"data": [
                    {"id": "llama3.1", "object": "model"},
                    {"id": "mistral"}
                ]})
                .to_string(),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new(server.uri());
        let models = client.list_models().await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].id, "llama3.1");
    }
}
