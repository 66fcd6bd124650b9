use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{info, warn};

use super::confidence::{confidence_score, ConfidenceInputs};
use super::diplotype::{build_diplotype, DiplotypeCall};
use super::domain::{
    AnalysisResult, Gene, GuidelineRecommendation, PharmacogenomicProfile, Phenotype,
    QualityMetrics, RiskAssessment, Severity,
};
use super::drug_gene::primary_gene;
use super::explanation::{explain, ExplanationGenerator, ExplanationRequest};
use super::guidelines::recommend;
use super::phenotype::infer_phenotype;
use super::repository::{AnalysisRepository, RepositoryError};
use super::request::AnalysisFormConfig;
use super::severity::severity_for;
use crate::config::AnalysisConfig;
use crate::workflows::vcf::{parse_variants, ParseResult};

const UNKNOWN_GENE: &str = "UNKNOWN";

/// Deterministic part of one drug's analysis, computed before any explanation is requested.
#[derive(Debug, Clone, PartialEq)]
pub struct DrugAssessment {
    pub drug: String,
    pub gene: Option<Gene>,
    pub call: DiplotypeCall,
    pub phenotype: Phenotype,
    pub recommendation: GuidelineRecommendation,
    pub severity: Severity,
    pub confidence_score: f64,
    pub gene_detected: bool,
}

impl DrugAssessment {
    pub fn explanation_request(&self) -> ExplanationRequest {
        ExplanationRequest {
            drug: self.drug.clone(),
            gene: self.gene.filter(|_| self.gene_detected),
            diplotype: self.call.diplotype.clone(),
            phenotype: self.phenotype,
            risk_label: self.recommendation.risk_label,
            evidence_level: self.recommendation.evidence_level.clone(),
            detected_variant_rsids: self.call.rsids(),
        }
    }
}

/// Runs the synchronous pipeline for one drug against an already parsed file.
pub fn assess_drug(parsed: &ParseResult, drug: &str) -> DrugAssessment {
    let drug = drug.trim().to_ascii_uppercase();
    let gene = primary_gene(&drug);
    let gene_records = gene.and_then(|gene| parsed.variants_for(gene.symbol()));

    let call = build_diplotype(&parsed.gene_variants, gene);
    let phenotype = infer_phenotype(gene, Some(&call.diplotype));
    let recommendation = recommend(&drug, phenotype);
    let severity = severity_for(recommendation.risk_label);

    let gene_detected = gene_records.is_some();
    let confidence_score = confidence_score(&ConfidenceInputs {
        gene_detected,
        detected_variants_count: gene_records.map_or(0, <[_]>::len),
        phenotype_determined: phenotype.is_determined(),
        evidence_level: &recommendation.evidence_level,
        malformed_lines: parsed.malformed_line_count,
    });

    DrugAssessment {
        drug,
        gene,
        call,
        phenotype,
        recommendation,
        severity,
        confidence_score,
        gene_detected,
    }
}

/// Service composing the variant parser, the decision tables, the explainer and the sink.
pub struct AnalysisService<S> {
    explainer: Arc<dyn ExplanationGenerator>,
    repository: Arc<S>,
    config: AnalysisConfig,
    explanation_timeout: Duration,
}

impl<S> AnalysisService<S>
where
    S: AnalysisRepository + 'static,
{
    pub fn new(
        explainer: Arc<dyn ExplanationGenerator>,
        repository: Arc<S>,
        config: AnalysisConfig,
        explanation_timeout: Duration,
    ) -> Self {
        Self {
            explainer,
            repository,
            config,
            explanation_timeout,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn form_config(&self) -> AnalysisFormConfig {
        AnalysisFormConfig::new(self.config.max_upload_bytes)
    }

    /// Analyze `content` for every requested drug, in request order.
    pub async fn analyze(&self, content: &[u8], drugs: &[String]) -> Vec<AnalysisResult> {
        self.analyze_at(content, drugs, Utc::now()).await
    }

    /// Same as [`analyze`](Self::analyze) with a caller-supplied timestamp shared by all
    /// results.
    pub async fn analyze_at(
        &self,
        content: &[u8],
        drugs: &[String],
        timestamp: DateTime<Utc>,
    ) -> Vec<AnalysisResult> {
        let parsed = parse_variants(content);
        let assessments: Vec<DrugAssessment> = drugs
            .iter()
            .map(|drug| assess_drug(&parsed, drug))
            .collect();

        let requests: Vec<ExplanationRequest> = assessments
            .iter()
            .map(DrugAssessment::explanation_request)
            .collect();
        let explanations = join_all(
            requests
                .iter()
                .map(|request| explain(self.explainer.as_ref(), request, self.explanation_timeout)),
        )
        .await;

        let results: Vec<AnalysisResult> = assessments
            .into_iter()
            .zip(explanations)
            .map(|(assessment, explanation)| AnalysisResult {
                patient_id: self.config.patient_id.clone(),
                drug: assessment.drug,
                timestamp,
                risk_assessment: RiskAssessment {
                    risk_label: assessment.recommendation.risk_label,
                    confidence_score: assessment.confidence_score,
                    severity: assessment.severity,
                },
                pharmacogenomic_profile: PharmacogenomicProfile {
                    primary_gene: assessment
                        .gene
                        .map_or(UNKNOWN_GENE, Gene::symbol)
                        .to_string(),
                    diplotype: assessment.call.diplotype,
                    phenotype: assessment.phenotype,
                    detected_variants: assessment.call.detected_variants,
                },
                clinical_recommendation: assessment.recommendation.into(),
                llm_generated_explanation: explanation,
                quality_metrics: QualityMetrics {
                    vcf_parsing_success: parsed.success,
                    gene_detected: assessment.gene_detected,
                    phenotype_determined: assessment.phenotype.is_determined(),
                    malformed_lines_count: parsed.malformed_line_count,
                },
            })
            .collect();

        for result in &results {
            if let Err(err) = self.repository.record(result) {
                warn!(drug = %result.drug, error = %err, "failed to record analysis result");
            }
        }

        info!(
            drugs = results.len(),
            parsed = parsed.success,
            malformed = parsed.malformed_line_count,
            "analysis completed"
        );

        results
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<AnalysisResult>, RepositoryError> {
        self.repository.recent(limit)
    }
}
