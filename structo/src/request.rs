//! Request models and builders.
//!
//! [`InferenceRequest`] is an immutable value object describing one
//! single-turn inference call; it is only ever constructed through
//! [`InferenceRequestBuilder`], which validates the mandatory fields at
//! [`build`](InferenceRequestBuilder::build) time. Deriving a new
//! request from an existing one goes through
//! [`to_builder`](InferenceRequest::to_builder): the builder is seeded
//! with every field of the source and subsequent setters override only
//! what they touch.
//!
//! [`ChatRequest`] is the multi-turn counterpart; its conversation is
//! extended strictly append-only.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use std::path::Path;

use structo_core::{derive_schema, Message, RequiredFields, SchemaDocument, Schematic};

use crate::error::{Error, ValidationError};

/// Sampling options for an inference call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Options {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Sampling seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

/// A single-turn inference request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    /// Model name.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Whether the server should stream the response.
    pub stream: bool,
    /// Base64-encoded image payloads, in insertion order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Sampling options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
    /// Schema the model output is constrained to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SchemaDocument>,
}

impl InferenceRequest {
    /// Start building a request.
    pub fn builder() -> InferenceRequestBuilder {
        InferenceRequestBuilder::default()
    }

    /// Seed a builder with every field of this request.
    ///
    /// Setter calls on the returned builder override only the touched
    /// fields; everything else stays identical to `self`.
    pub fn to_builder(&self) -> InferenceRequestBuilder {
        InferenceRequestBuilder {
            model: Some(self.model.clone()),
            prompt: Some(self.prompt.clone()),
            stream: self.stream,
            images: self.images.clone(),
            options: self.options.clone(),
            format: self.format.clone(),
        }
    }
}

impl From<InferenceRequest> for InferenceRequestBuilder {
    fn from(request: InferenceRequest) -> Self {
        request.to_builder()
    }
}

/// Builder for [`InferenceRequest`].
#[derive(Debug, Clone, Default)]
pub struct InferenceRequestBuilder {
    model: Option<String>,
    prompt: Option<String>,
    stream: bool,
    images: Option<Vec<String>>,
    options: Option<Options>,
    format: Option<SchemaDocument>,
}

impl InferenceRequestBuilder {
    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the prompt text.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the streaming flag. Defaults to `false`.
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Replace the images list with already-encoded payloads.
    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }

    /// Append an already-encoded image payload.
    pub fn image(mut self, encoded: impl Into<String>) -> Self {
        self.images.get_or_insert_with(Vec::new).push(encoded.into());
        self
    }

    /// Read a file, base64-encode it, and append it to the images list.
    ///
    /// This is the builder's only filesystem touch.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ImageFile`] when the file cannot be read.
    pub fn image_file(mut self, path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ValidationError::ImageFile {
            path: path.display().to_string(),
            source,
        })?;
        self.images
            .get_or_insert_with(Vec::new)
            .push(BASE64.encode(bytes));
        Ok(self)
    }

    /// Set the sampling options wholesale.
    pub fn options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the sampling temperature, keeping other options intact.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.options.get_or_insert_with(Options::default).temperature = Some(temperature);
        self
    }

    /// Set the sampling seed, keeping other options intact.
    pub fn seed(mut self, seed: i64) -> Self {
        self.options.get_or_insert_with(Options::default).seed = Some(seed);
        self
    }

    /// Constrain generation to the given schema document.
    pub fn format(mut self, schema: SchemaDocument) -> Self {
        self.format = Some(schema);
        self
    }

    /// Constrain generation to the schema derived for `T`.
    ///
    /// # Errors
    ///
    /// Propagates [`SchemaError`](structo_core::SchemaError) from
    /// derivation.
    pub fn format_as<T: Schematic>(mut self, required: &RequiredFields) -> Result<Self, Error> {
        self.format = Some(derive_schema::<T>(required)?);
        Ok(self)
    }

    pub(crate) fn has_model(&self) -> bool {
        self.model.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// Validate and build the request.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingModel`] when no non-empty model was
    /// set; [`ValidationError::MissingPrompt`] when no non-empty prompt
    /// was set. Nothing invalid is ever sent over the wire.
    pub fn build(self) -> Result<InferenceRequest, ValidationError> {
        let model = match self.model {
            Some(model) if !model.is_empty() => model,
            _ => return Err(ValidationError::MissingModel),
        };
        let prompt = match self.prompt {
            Some(prompt) if !prompt.is_empty() => prompt,
            _ => return Err(ValidationError::MissingPrompt),
        };

        Ok(InferenceRequest {
            model,
            prompt,
            stream: self.stream,
            images: self.images,
            options: self.options,
            format: self.format,
        })
    }
}

/// A multi-turn chat request.
///
/// The conversation is owned by whoever holds the request; [`push`] and
/// [`extend`] mutate it in place and only ever append. Sharing one
/// request across concurrent call sites requires caller-side
/// synchronization; this type performs no locking.
///
/// [`push`]: ChatRequest::push
/// [`extend`]: ChatRequest::extend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model name.
    pub model: String,
    /// Conversation so far, oldest first.
    pub messages: Vec<Message>,
    /// Whether the server should stream the response.
    pub stream: bool,
}

impl ChatRequest {
    /// Create a chat request over an existing conversation.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
        }
    }

    /// Append one message to the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append several messages to the conversation, preserving order.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// Validate the request before dispatch.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingModel`] on an empty model,
    /// [`ValidationError::MissingMessages`] on an empty conversation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.is_empty() {
            return Err(ValidationError::MissingModel);
        }
        if self.messages.is_empty() {
            return Err(ValidationError::MissingMessages);
        }
        Ok(())
    }
}
