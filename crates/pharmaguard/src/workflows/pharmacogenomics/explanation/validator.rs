use serde_json::{Map, Value};

use super::super::domain::ExplanationPayload;

const REQUIRED_KEYS: [&str; 4] = [
    "summary",
    "variant_citation",
    "biological_mechanism",
    "clinical_rationale",
];
const TEXT_FIELDS: [&str; 3] = ["summary", "biological_mechanism", "clinical_rationale"];
const CITATION_FIELD: &str = "variant_citation";

const MIN_TEXT_CHARS: usize = 5;
const MAX_TEXT_CHARS: usize = 1500;

pub(crate) const NOT_DETERMINED: &str = "Not determined.";

/// Reason generated text was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExplanationRejection {
    #[error("explanation is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("explanation is not a JSON object")]
    NotAnObject,
    #[error("explanation is missing required key `{0}`")]
    MissingKey(&'static str),
    #[error("explanation carries unexpected key `{0}`")]
    UnexpectedKey(String),
    #[error("explanation field `{0}` has an invalid type or length")]
    InvalidField(&'static str),
    #[error("explanation cites `{0}` more than once")]
    DuplicateCitation(String),
    #[error("explanation cites `{0}`, which was not detected")]
    UnknownCitation(String),
}

/// Runtime validation: required keys must exist, everything else is repaired.
///
/// Citations are narrowed to strings on the allow-list with duplicates removed (first
/// occurrence wins). A non-array citation field becomes empty and text fields of the wrong
/// type become `"Not determined."`. Extra keys are ignored.
pub fn validate_explanation(
    raw: &str,
    allowed_rsids: &[String],
) -> Result<ExplanationPayload, ExplanationRejection> {
    let object = parse_object(raw)?;
    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(ExplanationRejection::MissingKey(*missing));
    }

    let mut variant_citation: Vec<String> = Vec::new();
    if let Some(Value::Array(entries)) = object.get(CITATION_FIELD) {
        for rsid in entries.iter().filter_map(Value::as_str) {
            let allowed = allowed_rsids.iter().any(|candidate| candidate == rsid);
            if allowed && !variant_citation.iter().any(|cited| cited == rsid) {
                variant_citation.push(rsid.to_string());
            }
        }
    }

    Ok(ExplanationPayload {
        summary: text_or_placeholder(&object, "summary"),
        variant_citation,
        biological_mechanism: text_or_placeholder(&object, "biological_mechanism"),
        clinical_rationale: text_or_placeholder(&object, "clinical_rationale"),
    })
}

/// Conformance validation: the object must already satisfy the output contract.
pub fn validate_explanation_strict(
    raw: &str,
    allowed_rsids: &[String],
) -> Result<ExplanationPayload, ExplanationRejection> {
    let object = parse_object(raw)?;
    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(ExplanationRejection::MissingKey(*missing));
    }
    if let Some(extra) = object
        .keys()
        .find(|key| !REQUIRED_KEYS.contains(&key.as_str()))
    {
        return Err(ExplanationRejection::UnexpectedKey(extra.clone()));
    }

    for field in TEXT_FIELDS {
        let within_bounds = object
            .get(field)
            .and_then(Value::as_str)
            .map(|text| text.chars().count())
            .is_some_and(|len| len > MIN_TEXT_CHARS && len <= MAX_TEXT_CHARS);
        if !within_bounds {
            return Err(ExplanationRejection::InvalidField(field));
        }
    }

    let Some(Value::Array(entries)) = object.get(CITATION_FIELD) else {
        return Err(ExplanationRejection::InvalidField(CITATION_FIELD));
    };
    let mut variant_citation: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let rsid = entry
            .as_str()
            .ok_or(ExplanationRejection::InvalidField(CITATION_FIELD))?;
        if variant_citation.iter().any(|cited| cited == rsid) {
            return Err(ExplanationRejection::DuplicateCitation(rsid.to_string()));
        }
        if !allowed_rsids.iter().any(|candidate| candidate == rsid) {
            return Err(ExplanationRejection::UnknownCitation(rsid.to_string()));
        }
        variant_citation.push(rsid.to_string());
    }

    Ok(ExplanationPayload {
        summary: text_or_placeholder(&object, "summary"),
        variant_citation,
        biological_mechanism: text_or_placeholder(&object, "biological_mechanism"),
        clinical_rationale: text_or_placeholder(&object, "clinical_rationale"),
    })
}

/// Removes markdown code fences that models tend to wrap JSON in.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, ExplanationRejection> {
    let cleaned = strip_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|err| ExplanationRejection::InvalidJson(err.to_string()))?;
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ExplanationRejection::NotAnObject),
    }
}

fn text_or_placeholder(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(NOT_DETERMINED)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn allowed() -> Vec<String> {
        vec!["rs4244285".to_string(), "rs12248560".to_string()]
    }

    fn payload(citations: Value) -> String {
        json!({
            "summary": "Reduced CYP2C19 activation of clopidogrel.",
            "variant_citation": citations,
            "biological_mechanism": "Loss-of-function alleles abolish enzyme activity.",
            "clinical_rationale": "Poor metabolizers gain little antiplatelet effect.",
        })
        .to_string()
    }

    #[test]
    fn lenient_drops_unknown_duplicate_and_non_string_citations() {
        let raw = payload(json!(["rs4244285", "rs999", "rs4244285", 42, "rs12248560"]));
        let validated = validate_explanation(&raw, &allowed()).expect("accepted");
        assert_eq!(validated.variant_citation, vec!["rs4244285", "rs12248560"]);
    }

    #[test]
    fn lenient_strips_code_fences() {
        let raw = format!("```json\n{}\n```", payload(json!(["rs4244285"])));
        let validated = validate_explanation(&raw, &allowed()).expect("accepted");
        assert_eq!(validated.variant_citation, vec!["rs4244285"]);
        assert_eq!(
            validated.summary,
            "Reduced CYP2C19 activation of clopidogrel."
        );
    }

    #[test]
    fn lenient_rejects_missing_key() {
        let raw = json!({
            "summary": "Reduced activation.",
            "variant_citation": [],
            "clinical_rationale": "Use an alternative.",
        })
        .to_string();
        assert_eq!(
            validate_explanation(&raw, &allowed()),
            Err(ExplanationRejection::MissingKey("biological_mechanism"))
        );
    }

    #[test]
    fn lenient_repairs_wrong_types_instead_of_rejecting() {
        let raw = json!({
            "summary": 12,
            "variant_citation": "rs4244285",
            "biological_mechanism": null,
            "clinical_rationale": "Use prasugrel or ticagrelor.",
            "confidence": "high",
        })
        .to_string();
        let validated = validate_explanation(&raw, &allowed()).expect("repaired");
        assert_eq!(validated.summary, NOT_DETERMINED);
        assert_eq!(validated.biological_mechanism, NOT_DETERMINED);
        assert_eq!(validated.clinical_rationale, "Use prasugrel or ticagrelor.");
        assert!(validated.variant_citation.is_empty());
    }

    #[test]
    fn rejects_non_json_and_non_objects() {
        assert!(matches!(
            validate_explanation("The patient is a poor metabolizer.", &allowed()),
            Err(ExplanationRejection::InvalidJson(_))
        ));
        assert_eq!(
            validate_explanation("[1, 2]", &allowed()),
            Err(ExplanationRejection::NotAnObject)
        );
    }

    #[test]
    fn strict_accepts_conforming_payload() {
        let raw = payload(json!(["rs12248560"]));
        let validated = validate_explanation_strict(&raw, &allowed()).expect("conforms");
        assert_eq!(validated.variant_citation, vec!["rs12248560"]);
    }

    #[test]
    fn strict_rejects_contract_violations() {
        assert_eq!(
            validate_explanation_strict(&payload(json!(["rs999"])), &allowed()),
            Err(ExplanationRejection::UnknownCitation("rs999".to_string()))
        );
        assert_eq!(
            validate_explanation_strict(&payload(json!(["rs4244285", "rs4244285"])), &allowed()),
            Err(ExplanationRejection::DuplicateCitation("rs4244285".to_string()))
        );
        assert_eq!(
            validate_explanation_strict(&payload(json!("rs4244285")), &allowed()),
            Err(ExplanationRejection::InvalidField("variant_citation"))
        );

        let mut extra: Map<String, Value> =
            serde_json::from_str(&payload(json!([]))).expect("object");
        extra.insert("risk".to_string(), json!("high"));
        assert_eq!(
            validate_explanation_strict(&Value::Object(extra).to_string(), &allowed()),
            Err(ExplanationRejection::UnexpectedKey("risk".to_string()))
        );
    }

    #[test]
    fn strict_enforces_text_length_bounds() {
        let short = json!({
            "summary": "Short",
            "variant_citation": [],
            "biological_mechanism": "Loss-of-function alleles.",
            "clinical_rationale": "Use an alternative agent.",
        })
        .to_string();
        assert_eq!(
            validate_explanation_strict(&short, &allowed()),
            Err(ExplanationRejection::InvalidField("summary"))
        );

        let long = json!({
            "summary": "Reduced activation.",
            "variant_citation": [],
            "biological_mechanism": "x".repeat(1501),
            "clinical_rationale": "Use an alternative agent.",
        })
        .to_string();
        assert_eq!(
            validate_explanation_strict(&long, &allowed()),
            Err(ExplanationRejection::InvalidField("biological_mechanism"))
        );
    }
}
