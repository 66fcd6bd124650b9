use metrics_exporter_prometheus::PrometheusHandle;
use pharmaguard::config::ExplainerConfig;
use pharmaguard::workflows::pharmacogenomics::{
    AnalysisRepository, AnalysisResult, ChatCompletionExplainer, ExplanationGenerator,
    OfflineExplainer, RepositoryError,
};
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Results kept in memory before the oldest are evicted.
const DEFAULT_HISTORY_CAPACITY: usize = 500;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Bounded in-process history of analysis results, newest last.
#[derive(Clone)]
pub(crate) struct InMemoryAnalysisRepository {
    records: Arc<Mutex<VecDeque<AnalysisResult>>>,
    capacity: usize,
}

impl Default for InMemoryAnalysisRepository {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl InMemoryAnalysisRepository {
    /// A zero capacity still keeps the latest result.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn record(&self, result: &AnalysisResult) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("history lock poisoned".to_string()))?;
        while guard.len() >= self.capacity {
            guard.pop_front();
        }
        guard.push_back(result.clone());
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<AnalysisResult>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("history lock poisoned".to_string()))?;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

/// Chat-completion client when an API key is configured, otherwise the offline generator.
pub(crate) fn explainer_from_config(config: &ExplainerConfig) -> Arc<dyn ExplanationGenerator> {
    if !config.enabled() {
        info!("no explainer API key configured; explanations use the fallback payload");
        return Arc::new(OfflineExplainer);
    }

    match ChatCompletionExplainer::new(config) {
        Ok(explainer) => {
            info!(model = explainer.model(), "chat-completion explainer enabled");
            Arc::new(explainer)
        }
        Err(err) => {
            warn!(error = %err, "explainer client unavailable; falling back to offline mode");
            Arc::new(OfflineExplainer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pharmaguard::workflows::pharmacogenomics::{
        fallback_explanation, ClinicalRecommendation, Diplotype, ExplanationError,
        ExplanationRequest, Gene, PharmacogenomicProfile, Phenotype, QualityMetrics,
        RiskAssessment, RiskLabel, Severity,
    };

    fn result(drug: &str) -> AnalysisResult {
        AnalysisResult {
            patient_id: "PATIENT_ABC123".to_string(),
            drug: drug.to_string(),
            timestamp: Utc::now(),
            risk_assessment: RiskAssessment {
                risk_label: RiskLabel::Unknown,
                confidence_score: 0.35,
                severity: Severity::None,
            },
            pharmacogenomic_profile: PharmacogenomicProfile {
                primary_gene: "UNKNOWN".to_string(),
                diplotype: Diplotype::unresolved(),
                phenotype: Phenotype::Unknown,
                detected_variants: Vec::new(),
            },
            clinical_recommendation: ClinicalRecommendation {
                action: "No recommendation available".to_string(),
                dosing_guidance: "N/A".to_string(),
                alternative_therapy: "N/A".to_string(),
                monitoring: "N/A".to_string(),
                evidence_level: "CPIC Level B".to_string(),
            },
            llm_generated_explanation: fallback_explanation(),
            quality_metrics: QualityMetrics {
                vcf_parsing_success: true,
                gene_detected: false,
                phenotype_determined: false,
                malformed_lines_count: 0,
            },
        }
    }

    #[test]
    fn history_evicts_oldest_entries() {
        let repository = InMemoryAnalysisRepository::with_capacity(2);
        for drug in ["CODEINE", "WARFARIN", "CLOPIDOGREL"] {
            repository.record(&result(drug)).expect("recorded");
        }

        let recent = repository.recent(10).expect("history readable");
        let drugs: Vec<&str> = recent.iter().map(|result| result.drug.as_str()).collect();
        assert_eq!(drugs, ["CLOPIDOGREL", "WARFARIN"]);
    }

    #[test]
    fn zero_capacity_history_stays_bounded() {
        let repository = InMemoryAnalysisRepository::with_capacity(0);
        for drug in ["CODEINE", "WARFARIN", "CLOPIDOGREL"] {
            repository.record(&result(drug)).expect("recorded");
        }

        let recent = repository.recent(10).expect("history readable");
        let drugs: Vec<&str> = recent.iter().map(|result| result.drug.as_str()).collect();
        assert_eq!(drugs, ["CLOPIDOGREL"]);
    }

    #[tokio::test]
    async fn missing_api_key_selects_offline_explainer() {
        let explainer = explainer_from_config(&ExplainerConfig::default());
        let request = ExplanationRequest {
            drug: "CODEINE".to_string(),
            gene: Some(Gene::Cyp2d6),
            diplotype: Diplotype::new("*1", "*4"),
            phenotype: Phenotype::IntermediateMetabolizer,
            risk_label: RiskLabel::AdjustDosage,
            evidence_level: "CPIC Level A".to_string(),
            detected_variant_rsids: vec!["rs3892097".to_string()],
        };

        let outcome = explainer.generate(&request).await;
        assert!(matches!(outcome, Err(ExplanationError::Disabled)));
    }
}
