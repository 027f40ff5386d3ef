//! services/api/src/adapters/analysis_llm.rs
//!
//! This module contains the adapter for the symptom-analysis LLM.
//! It implements the `SymptomAnalysisService` port from the `core` crate.

const SYSTEM_PROMPT: &str = r#"You are a medical AI assistant helping people in rural areas understand their symptoms.
Analyze the provided symptoms and respond with a JSON object containing:
- analysis: detailed explanation of what the symptoms might indicate
- urgencyLevel: 'low', 'medium', or 'high' based on severity
- possibleCauses: array of potential causes
- healthTips: array of actionable health recommendations
- seekImmediateCare: boolean indicating if immediate medical attention is needed

Always remind users that this is not a substitute for professional medical advice.
Be empathetic and use clear, simple language suitable for rural communities."#;

const IMAGE_USER_PROMPT: &str =
    "Please analyze this medical image and provide health insights. \
     Focus on visible symptoms and conditions.";

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ImageUrlArgs,
        ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use symptom_core::{
    domain::{HealthAssessment, SubmissionKind, UrgencyLevel},
    ports::{PortError, PortResult, SymptomAnalysisService},
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SymptomAnalysisService` using an
/// OpenAI-compatible chat model constrained to JSON output.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Maps the model's JSON reply onto a `HealthAssessment`, degrading
    /// gracefully when fields are missing or malformed: an unknown urgency
    /// becomes `medium`, missing lists become empty.
    fn parse_assessment(raw: &str) -> HealthAssessment {
        let value: serde_json::Value = serde_json::from_str(raw).unwrap_or_default();

        let analysis = value["analysis"]
            .as_str()
            .unwrap_or("Unable to analyze symptoms at this time.")
            .to_string();

        let urgency_level = value["urgencyLevel"]
            .as_str()
            .and_then(UrgencyLevel::parse)
            .unwrap_or(UrgencyLevel::Medium);

        let string_list = |field: &str| -> Vec<String> {
            value[field]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        };

        HealthAssessment {
            analysis,
            urgency_level,
            possible_causes: string_list("possibleCauses"),
            health_tips: string_list("healthTips"),
            seek_immediate_care: value["seekImmediateCare"].as_bool().unwrap_or(false),
        }
    }
}

//=========================================================================================
// `SymptomAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SymptomAnalysisService for OpenAiAnalysisAdapter {
    /// Analyzes one submission's content. Photo submissions carry a base64
    /// data URL and are sent as an image content part; text and voice
    /// submissions are sent as plain text.
    async fn analyze(
        &self,
        content: &str,
        kind: SubmissionKind,
    ) -> PortResult<HealthAssessment> {
        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PROMPT)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let user_message = match kind {
            SubmissionKind::Photo => {
                let text_part = ChatCompletionRequestMessageContentPartTextArgs::default()
                    .text(IMAGE_USER_PROMPT)
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                let image_part = ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(
                        ImageUrlArgs::default()
                            .url(content)
                            .build()
                            .map_err(|e| PortError::Unexpected(e.to_string()))?,
                    )
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                ChatCompletionRequestUserMessageArgs::default()
                    .content(vec![text_part.into(), image_part.into()])
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
            }
            SubmissionKind::Text | SubmissionKind::Voice => {
                ChatCompletionRequestUserMessageArgs::default()
                    .content(format!("Please analyze these symptoms: {}", content))
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
            }
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![system_message.into(), user_message.into()])
            .response_format(ResponseFormat::JsonObject)
            .max_tokens(1000u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let raw = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "{}".to_string());

        Ok(Self::parse_assessment(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assessment_reads_all_fields() {
        let raw = r#"{
            "analysis": "Likely tension headache.",
            "urgencyLevel": "low",
            "possibleCauses": ["dehydration", "eye strain"],
            "healthTips": ["drink water"],
            "seekImmediateCare": false
        }"#;
        let assessment = OpenAiAnalysisAdapter::parse_assessment(raw);
        assert_eq!(assessment.analysis, "Likely tension headache.");
        assert_eq!(assessment.urgency_level, UrgencyLevel::Low);
        assert_eq!(assessment.possible_causes, vec!["dehydration", "eye strain"]);
        assert_eq!(assessment.health_tips, vec!["drink water"]);
        assert!(!assessment.seek_immediate_care);
    }

    #[test]
    fn parse_assessment_defaults_on_garbage() {
        let assessment = OpenAiAnalysisAdapter::parse_assessment("not json at all");
        assert_eq!(assessment.analysis, "Unable to analyze symptoms at this time.");
        assert_eq!(assessment.urgency_level, UrgencyLevel::Medium);
        assert!(assessment.possible_causes.is_empty());
        assert!(assessment.health_tips.is_empty());
        assert!(!assessment.seek_immediate_care);
    }

    #[test]
    fn parse_assessment_rejects_unknown_urgency() {
        let assessment =
            OpenAiAnalysisAdapter::parse_assessment(r#"{"urgencyLevel": "critical"}"#);
        assert_eq!(assessment.urgency_level, UrgencyLevel::Medium);
    }
}
