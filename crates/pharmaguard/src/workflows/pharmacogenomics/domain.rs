use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drugs covered by the guideline catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Drug {
    Codeine,
    Warfarin,
    Clopidogrel,
    Simvastatin,
    Azathioprine,
    Fluorouracil,
}

impl Drug {
    pub const ALL: [Drug; 6] = [
        Drug::Codeine,
        Drug::Warfarin,
        Drug::Clopidogrel,
        Drug::Simvastatin,
        Drug::Azathioprine,
        Drug::Fluorouracil,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Drug::Codeine => "CODEINE",
            Drug::Warfarin => "WARFARIN",
            Drug::Clopidogrel => "CLOPIDOGREL",
            Drug::Simvastatin => "SIMVASTATIN",
            Drug::Azathioprine => "AZATHIOPRINE",
            Drug::Fluorouracil => "FLUOROURACIL",
        }
    }

    /// Case-insensitive lookup of a drug identifier.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|drug| drug.as_str().eq_ignore_ascii_case(value))
    }

    /// The single pharmacogene governing this drug's metabolism.
    pub const fn primary_gene(self) -> Gene {
        match self {
            Drug::Codeine => Gene::Cyp2d6,
            Drug::Clopidogrel => Gene::Cyp2c19,
            Drug::Warfarin => Gene::Cyp2c9,
            Drug::Simvastatin => Gene::Slco1b1,
            Drug::Azathioprine => Gene::Tpmt,
            Drug::Fluorouracil => Gene::Dpyd,
        }
    }
}

impl fmt::Display for Drug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pharmacogenes with a known non-functional allele table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gene {
    Cyp2d6,
    Cyp2c19,
    Cyp2c9,
    Slco1b1,
    Tpmt,
    Dpyd,
}

impl Gene {
    pub const fn symbol(self) -> &'static str {
        match self {
            Gene::Cyp2d6 => "CYP2D6",
            Gene::Cyp2c19 => "CYP2C19",
            Gene::Cyp2c9 => "CYP2C9",
            Gene::Slco1b1 => "SLCO1B1",
            Gene::Tpmt => "TPMT",
            Gene::Dpyd => "DPYD",
        }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Allele placeholder used when a chromosome copy could not be resolved.
pub const UNRESOLVED_ALLELE: &str = "*?";

/// Two alleles written `allele/allele`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diplotype(String);

impl Diplotype {
    pub fn new(first: &str, second: &str) -> Self {
        Self(format!("{first}/{second}"))
    }

    pub fn unresolved() -> Self {
        Self::new(UNRESOLVED_ALLELE, UNRESOLVED_ALLELE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_resolved(&self) -> bool {
        !self.0.contains(UNRESOLVED_ALLELE)
    }

    /// Alleles split on `/`. More than two entries only occur when an allele label
    /// itself contained a slash.
    pub fn alleles(&self) -> Vec<&str> {
        self.0.split('/').collect()
    }
}

impl fmt::Display for Diplotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metabolizer status inferred from a diplotype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phenotype {
    #[serde(rename = "PM")]
    PoorMetabolizer,
    #[serde(rename = "IM")]
    IntermediateMetabolizer,
    #[serde(rename = "NM")]
    NormalMetabolizer,
    Unknown,
}

impl Phenotype {
    pub const fn code(self) -> &'static str {
        match self {
            Phenotype::PoorMetabolizer => "PM",
            Phenotype::IntermediateMetabolizer => "IM",
            Phenotype::NormalMetabolizer => "NM",
            Phenotype::Unknown => "Unknown",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Phenotype::PoorMetabolizer => "Poor Metabolizer",
            Phenotype::IntermediateMetabolizer => "Intermediate Metabolizer",
            Phenotype::NormalMetabolizer => "Normal Metabolizer",
            Phenotype::Unknown => "Unknown",
        }
    }

    pub const fn is_determined(self) -> bool {
        !matches!(self, Phenotype::Unknown)
    }
}

impl fmt::Display for Phenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Clinical risk category attached to a guideline recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    Safe,
    #[serde(rename = "Adjust Dosage")]
    AdjustDosage,
    Ineffective,
    Toxic,
    Unknown,
}

impl RiskLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Safe => "Safe",
            RiskLabel::AdjustDosage => "Adjust Dosage",
            RiskLabel::Ineffective => "Ineffective",
            RiskLabel::Toxic => "Toxic",
            RiskLabel::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Safe" => Some(RiskLabel::Safe),
            "Adjust Dosage" => Some(RiskLabel::AdjustDosage),
            "Ineffective" => Some(RiskLabel::Ineffective),
            "Toxic" => Some(RiskLabel::Toxic),
            "Unknown" => Some(RiskLabel::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse alert tier derived from a risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guideline-derived recommendation for one drug and phenotype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineRecommendation {
    pub risk_label: RiskLabel,
    pub action: String,
    pub dosing_guidance: String,
    pub alternative_therapy: String,
    pub monitoring: String,
    pub evidence_level: String,
}

/// rsid observed for the analyzed gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedVariant {
    pub rsid: String,
}

/// Narrative explanation whose citations are restricted to detected rsids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationPayload {
    pub summary: String,
    pub variant_citation: Vec<String>,
    pub biological_mechanism: String,
    pub clinical_rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_label: RiskLabel,
    pub confidence_score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacogenomicProfile {
    pub primary_gene: String,
    pub diplotype: Diplotype,
    pub phenotype: Phenotype,
    pub detected_variants: Vec<DetectedVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecommendation {
    pub action: String,
    pub dosing_guidance: String,
    pub alternative_therapy: String,
    pub monitoring: String,
    pub evidence_level: String,
}

impl From<GuidelineRecommendation> for ClinicalRecommendation {
    fn from(value: GuidelineRecommendation) -> Self {
        Self {
            action: value.action,
            dosing_guidance: value.dosing_guidance,
            alternative_therapy: value.alternative_therapy,
            monitoring: value.monitoring,
            evidence_level: value.evidence_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub vcf_parsing_success: bool,
    pub gene_detected: bool,
    pub phenotype_determined: bool,
    pub malformed_lines_count: usize,
}

/// Complete assessment for one requested drug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub patient_id: String,
    pub drug: String,
    pub timestamp: DateTime<Utc>,
    pub risk_assessment: RiskAssessment,
    pub pharmacogenomic_profile: PharmacogenomicProfile,
    pub clinical_recommendation: ClinicalRecommendation,
    pub llm_generated_explanation: ExplanationPayload,
    pub quality_metrics: QualityMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drug_parse_is_case_insensitive_and_trims() {
        assert_eq!(Drug::parse(" clopidogrel "), Some(Drug::Clopidogrel));
        assert_eq!(Drug::parse("FLUOROURACIL"), Some(Drug::Fluorouracil));
        assert_eq!(Drug::parse("ibuprofen"), None);
    }

    #[test]
    fn wire_names_match_the_result_contract() {
        assert_eq!(
            serde_json::to_value(RiskLabel::AdjustDosage).expect("serialize"),
            serde_json::json!("Adjust Dosage")
        );
        assert_eq!(
            serde_json::to_value(Phenotype::IntermediateMetabolizer).expect("serialize"),
            serde_json::json!("IM")
        );
        assert_eq!(
            serde_json::to_value(Severity::None).expect("serialize"),
            serde_json::json!("none")
        );
        assert_eq!(
            serde_json::to_value(Gene::Slco1b1).expect("serialize"),
            serde_json::json!("SLCO1B1")
        );
    }

    #[test]
    fn unresolved_diplotype_is_flagged() {
        let diplotype = Diplotype::unresolved();
        assert_eq!(diplotype.as_str(), "*?/*?");
        assert!(!diplotype.is_resolved());
        assert!(Diplotype::new("*1", "*2").is_resolved());
        assert!(!Diplotype::new("*4", UNRESOLVED_ALLELE).is_resolved());
    }
}
