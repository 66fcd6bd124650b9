use serde::Serialize;
use serde_json::{json, Value};

use super::domain::Drug;

pub const VCF_FIELD: &str = "vcf_file";
pub const DRUGS_FIELD: &str = "drugs";

/// Boundary validation failures for an analysis request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisRequestError {
    #[error("VCF file is required")]
    MissingVariantFile,
    #[error("Drugs field is required")]
    MissingDrugs,
    #[error("At least one valid drug must be provided")]
    EmptyDrugList,
    #[error("Invalid drug name: {0}")]
    UnsupportedDrug(String),
    #[error("VCF file exceeds the {limit} byte upload limit")]
    FileTooLarge { limit: usize },
    #[error("invalid multipart payload: {0}")]
    Malformed(String),
}

/// Splits a comma-separated drug list, normalizing case and dropping empty entries.
///
/// The first unsupported name aborts the whole request.
pub fn parse_drug_list(raw: &str) -> Result<Vec<Drug>, AnalysisRequestError> {
    let names: Vec<String> = raw
        .split(',')
        .map(|name| name.trim().to_ascii_uppercase())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        return Err(AnalysisRequestError::EmptyDrugList);
    }

    names
        .into_iter()
        .map(|name| Drug::parse(&name).ok_or(AnalysisRequestError::UnsupportedDrug(name)))
        .collect()
}

/// Upload form description served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisFormConfig {
    pub supported_drugs: Vec<&'static str>,
    pub form_schema: FormSchema,
    pub example_analysis: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub fields: Vec<FormField>,
    pub validations: FormValidations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<&'static str>,
    #[serde(rename = "maxSizeMB", skip_serializing_if = "Option::is_none")]
    pub max_size_mb: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormValidations {
    #[serde(rename = "drugsPattern")]
    pub drugs_pattern: &'static str,
}

impl AnalysisFormConfig {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self {
            supported_drugs: Drug::ALL.iter().map(|drug| drug.as_str()).collect(),
            form_schema: FormSchema {
                fields: vec![
                    FormField {
                        name: VCF_FIELD,
                        kind: "file",
                        accept: Some(".vcf"),
                        max_size_mb: Some(max_upload_bytes.div_ceil(1024 * 1024)),
                        description: None,
                    },
                    FormField {
                        name: DRUGS_FIELD,
                        kind: "string",
                        accept: None,
                        max_size_mb: None,
                        description: Some("Comma-separated drug names"),
                    },
                ],
                validations: FormValidations {
                    drugs_pattern: r"^[a-zA-Z,\s]*$",
                },
            },
            example_analysis: example_analysis(),
        }
    }
}

/// Shape of an undetermined result, shown by clients before the first upload.
fn example_analysis() -> Value {
    json!({
        "patient_id": "PATIENT_ABC123",
        "drug": "CODEINE",
        "risk_assessment": {
            "risk_label": "Unknown",
            "confidence_score": 0.5,
            "severity": "none",
        },
        "pharmacogenomic_profile": {
            "primary_gene": "UNKNOWN",
            "diplotype": "*?/*?",
            "phenotype": "Unknown",
            "detected_variants": [],
        },
        "clinical_recommendation": {
            "dosing_guidance": "No recommendation available in Phase 1",
            "alternative_therapy": "N/A",
        },
        "llm_generated_explanation": {
            "biological_mechanism": "Not determined.",
            "variant_citation": [],
        },
    })
}
