//! services/api/src/adapters/transcribe.rs
//!
//! This module contains the adapter for OpenAI's speech-to-text (Whisper)
//! service. It implements the `TranscriptionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::audio::{AudioInput, CreateTranscriptionRequest},
    Client,
};
use async_trait::async_trait;
use symptom_core::ports::{PortError, PortResult, TranscriptionService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TranscriptionService` port using the
/// OpenAI Whisper API.
#[derive(Clone)]
pub struct OpenAiTranscriptionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTranscriptionAdapter {
    /// Creates a new `OpenAiTranscriptionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `TranscriptionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranscriptionService for OpenAiTranscriptionAdapter {
    /// Transcribes an uploaded audio file using the configured Whisper model.
    /// The bytes are forwarded as-is; the original filename carries the
    /// container format hint for the API.
    async fn transcribe(&self, audio_data: &[u8], filename: &str) -> PortResult<String> {
        let input = AudioInput::from_vec_u8(filename.to_string(), audio_data.to_vec());

        let request = CreateTranscriptionRequest {
            file: input,
            model: self.model.clone(),
            ..Default::default()
        };

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .audio()
            .transcription()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        Ok(response.text)
    }
}
