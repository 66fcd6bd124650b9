//! Pharmacogenomic risk assessment: decision tables, scoring, explanation guard rails and
//! the HTTP surface that strings them together per requested drug.

pub mod confidence;
pub mod diplotype;
pub mod domain;
pub mod drug_gene;
pub mod explanation;
pub mod guidelines;
pub mod phenotype;
pub mod repository;
pub mod request;
pub mod risk;
pub mod router;
pub mod service;
pub mod severity;

#[cfg(test)]
mod tests;

pub use confidence::{confidence_score, ConfidenceInputs};
pub use diplotype::{build_diplotype, DiplotypeCall};
pub use domain::{
    AnalysisResult, ClinicalRecommendation, DetectedVariant, Diplotype, Drug, ExplanationPayload,
    Gene, GuidelineRecommendation, PharmacogenomicProfile, Phenotype, QualityMetrics,
    RiskAssessment, RiskLabel, Severity,
};
pub use drug_gene::primary_gene;
pub use explanation::{
    explain, fallback_explanation, ChatCompletionExplainer, ExplanationError,
    ExplanationGenerator, ExplanationRejection, ExplanationRequest, OfflineExplainer,
};
pub use guidelines::{guideline_for, recommend};
pub use phenotype::infer_phenotype;
pub use repository::{AnalysisRepository, RepositoryError};
pub use request::{parse_drug_list, AnalysisFormConfig, AnalysisRequestError};
pub use risk::{overall_risk, OverallRisk};
pub use router::analysis_router;
pub use service::{assess_drug, AnalysisService, DrugAssessment};
pub use severity::{map_severity, severity_for};
