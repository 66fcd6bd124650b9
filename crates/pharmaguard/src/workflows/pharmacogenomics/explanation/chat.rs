use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::validator::NOT_DETERMINED;
use super::{ExplanationError, ExplanationGenerator, ExplanationRequest};
use crate::config::ExplainerConfig;

const SYSTEM_PROMPT: &str = "You are a clinical pharmacogenomics explanation engine.";
const TEMPERATURE: f32 = 0.2;

/// OpenAI-compatible chat-completion backend (Groq by default).
#[derive(Clone)]
pub struct ChatCompletionExplainer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatCompletionExplainer {
    /// Builds a client from configuration. Fails with `Disabled` when no API key is set.
    pub fn new(config: &ExplainerConfig) -> Result<Self, ExplanationError> {
        let api_key = config.api_key.clone().ok_or(ExplanationError::Disabled)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ExplanationError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl ExplanationGenerator for ChatCompletionExplainer {
    async fn generate(&self, request: &ExplanationRequest) -> Result<String, ExplanationError> {
        let prompt = build_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        debug!(
            drug = %request.drug,
            diplotype = %request.diplotype,
            phenotype = %request.phenotype,
            risk_label = %request.risk_label,
            model = %self.model,
            "requesting explanation"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ExplanationError::Transport(err.to_string()))?
            .error_for_status()
            .map_err(|err| ExplanationError::Transport(err.to_string()))?;

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|err| ExplanationError::MalformedResponse(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| ExplanationError::MalformedResponse("response has no choices".to_string()))
    }
}

/// Prompt restricting the model to the structured facts of one assessment.
pub fn build_prompt(request: &ExplanationRequest) -> String {
    let gene = request.gene.map_or(NOT_DETERMINED, |gene| gene.symbol());
    let variants = request.detected_variant_rsids.join(", ");

    format!(
        "You are a pharmacogenomics explanation engine.

Use ONLY the structured data provided.
Do NOT invent genes, variants, dosing, or additional risks.
Do NOT modify clinical recommendation.
If data missing, say \"Not determined.\"
Output STRICT JSON only.
No markdown.
No extra commentary.

STRUCTURED INPUT:
Drug: {drug}
Gene: {gene}
Diplotype: {diplotype}
Phenotype: {phenotype}
Risk Label: {risk_label}
Evidence Level: {evidence_level}
Detected Variants: {variants}

Required JSON format:
{{
  \"summary\": \"...\",
  \"variant_citation\": [...],
  \"biological_mechanism\": \"...\",
  \"clinical_rationale\": \"...\"
}}
",
        drug = request.drug,
        diplotype = request.diplotype,
        phenotype = request.phenotype,
        risk_label = request.risk_label,
        evidence_level = request.evidence_level,
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
