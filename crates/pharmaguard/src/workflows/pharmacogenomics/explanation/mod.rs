//! Natural-language explanations produced by an external generator.
//!
//! Generated text is untrusted. Every response is validated against the output contract
//! and only rsids detected for the analyzed gene may be cited. Any failure along the way
//! (skip, transport error, timeout, rejection) degrades to [`fallback_explanation`].

mod chat;
mod validator;

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use super::domain::{Diplotype, ExplanationPayload, Gene, Phenotype, RiskLabel};

pub use chat::{build_prompt, ChatCompletionExplainer};
pub use validator::{validate_explanation, validate_explanation_strict, ExplanationRejection};

pub const FALLBACK_SUMMARY: &str = "Pharmacogenomic explanation unavailable.";
pub const FALLBACK_MECHANISM: &str = validator::NOT_DETERMINED;
pub const FALLBACK_RATIONALE: &str = "Clinical logic derived from CPIC guidelines.";

pub fn fallback_explanation() -> ExplanationPayload {
    ExplanationPayload {
        summary: FALLBACK_SUMMARY.to_string(),
        variant_citation: Vec::new(),
        biological_mechanism: FALLBACK_MECHANISM.to_string(),
        clinical_rationale: FALLBACK_RATIONALE.to_string(),
    }
}

/// Structured facts handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationRequest {
    pub drug: String,
    pub gene: Option<Gene>,
    pub diplotype: Diplotype,
    pub phenotype: Phenotype,
    pub risk_label: RiskLabel,
    pub evidence_level: String,
    pub detected_variant_rsids: Vec<String>,
}

impl ExplanationRequest {
    /// Generation only makes sense with a gene and at least one cited variant.
    pub fn is_explainable(&self) -> bool {
        self.gene.is_some() && !self.detected_variant_rsids.is_empty()
    }
}

/// Produces raw explanation text for a request.
#[async_trait::async_trait]
pub trait ExplanationGenerator: Send + Sync {
    async fn generate(&self, request: &ExplanationRequest) -> Result<String, ExplanationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExplanationError {
    #[error("explanation generator is disabled")]
    Disabled,
    #[error("explanation transport failed: {0}")]
    Transport(String),
    #[error("explanation response was malformed: {0}")]
    MalformedResponse(String),
    #[error("explanation timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Rejected(#[from] ExplanationRejection),
}

/// Generator used when no backend is configured. Every call reports `Disabled`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineExplainer;

#[async_trait::async_trait]
impl ExplanationGenerator for OfflineExplainer {
    async fn generate(&self, _request: &ExplanationRequest) -> Result<String, ExplanationError> {
        Err(ExplanationError::Disabled)
    }
}

/// Calls the generator under `limit` and validates what comes back.
pub async fn request_explanation(
    generator: &dyn ExplanationGenerator,
    request: &ExplanationRequest,
    limit: Duration,
) -> Result<ExplanationPayload, ExplanationError> {
    let raw = timeout(limit, generator.generate(request))
        .await
        .map_err(|_| ExplanationError::Timeout(limit))??;
    let payload = validate_explanation(&raw, &request.detected_variant_rsids)?;
    Ok(payload)
}

/// Explanation for one drug. Never fails; every error path yields the fallback payload.
pub async fn explain(
    generator: &dyn ExplanationGenerator,
    request: &ExplanationRequest,
    limit: Duration,
) -> ExplanationPayload {
    if !request.is_explainable() {
        debug!(drug = %request.drug, "explanation skipped without detected variants");
        return fallback_explanation();
    }

    match request_explanation(generator, request, limit).await {
        Ok(payload) => payload,
        Err(ExplanationError::Disabled) => {
            debug!(drug = %request.drug, "explanation generator disabled");
            fallback_explanation()
        }
        Err(err) => {
            warn!(drug = %request.drug, error = %err, "using fallback explanation");
            fallback_explanation()
        }
    }
}
