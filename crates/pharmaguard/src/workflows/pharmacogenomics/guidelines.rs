//! CPIC-derived decision table.
//!
//! Every supported drug carries exactly four rows: one per resolved phenotype plus a row for
//! `Unknown` that also serves as the default branch. The texts are versioned reference data
//! and are reproduced verbatim in API responses, so edits here are clinically visible.

use super::domain::{Drug, GuidelineRecommendation, Phenotype, RiskLabel};
use super::domain::Phenotype::{
    IntermediateMetabolizer as IM, NormalMetabolizer as NM, PoorMetabolizer as PM,
};

pub const EVIDENCE_LEVEL_A: &str = "CPIC Level A";
pub const EVIDENCE_LEVEL_B: &str = "CPIC Level B";

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidelineRow {
    pub drug: Drug,
    pub phenotype: Phenotype,
    pub risk_label: RiskLabel,
    pub action: &'static str,
    pub dosing_guidance: &'static str,
    pub alternative_therapy: &'static str,
    pub monitoring: &'static str,
    pub evidence_level: &'static str,
}

impl GuidelineRow {
    pub fn recommendation(&self) -> GuidelineRecommendation {
        GuidelineRecommendation {
            risk_label: self.risk_label,
            action: self.action.to_string(),
            dosing_guidance: self.dosing_guidance.to_string(),
            alternative_therapy: self.alternative_therapy.to_string(),
            monitoring: self.monitoring.to_string(),
            evidence_level: self.evidence_level.to_string(),
        }
    }
}

const fn row(
    drug: Drug,
    phenotype: Phenotype,
    risk_label: RiskLabel,
    texts: [&'static str; 4],
    evidence_level: &'static str,
) -> GuidelineRow {
    GuidelineRow {
        drug,
        phenotype,
        risk_label,
        action: texts[0],
        dosing_guidance: texts[1],
        alternative_therapy: texts[2],
        monitoring: texts[3],
        evidence_level,
    }
}

const GUIDELINE_TABLE: &[GuidelineRow] = &[
    // Codeine / CYP2D6
    row(
        Drug::Codeine,
        PM,
        RiskLabel::Ineffective,
        [
            "Avoid codeine use.",
            "Codeine is unlikely to provide adequate analgesia.",
            "Consider morphine or non-opioid analgesics.",
            "Monitor pain control closely.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Codeine,
        IM,
        RiskLabel::AdjustDosage,
        [
            "Use with caution.",
            "May require dose adjustment.",
            "Consider alternative analgesics if response inadequate.",
            "Monitor analgesic response.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Codeine,
        NM,
        RiskLabel::Safe,
        [
            "Use standard dosing.",
            "Standard recommended dosing applies.",
            "Not required.",
            "Routine monitoring.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Codeine,
        Phenotype::Unknown,
        RiskLabel::Unknown,
        [
            "Insufficient genetic information.",
            "Proceed with clinical caution.",
            "Consider alternative if clinically indicated.",
            "Monitor patient response.",
        ],
        EVIDENCE_LEVEL_B,
    ),
    // Clopidogrel / CYP2C19
    row(
        Drug::Clopidogrel,
        PM,
        RiskLabel::Ineffective,
        [
            "Avoid clopidogrel use.",
            "Reduced antiplatelet effect expected.",
            "Consider prasugrel or ticagrelor.",
            "Monitor cardiovascular status closely.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Clopidogrel,
        IM,
        RiskLabel::AdjustDosage,
        [
            "Consider alternative therapy.",
            "Reduced response possible.",
            "Prasugrel or ticagrelor may be preferred.",
            "Monitor platelet response.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Clopidogrel,
        NM,
        RiskLabel::Safe,
        [
            "Use standard dosing.",
            "Standard dosing recommended.",
            "Not required.",
            "Routine monitoring.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Clopidogrel,
        Phenotype::Unknown,
        RiskLabel::Unknown,
        [
            "Insufficient genetic data.",
            "Use clinical judgment.",
            "Consider alternatives if needed.",
            "Monitor patient closely.",
        ],
        EVIDENCE_LEVEL_B,
    ),
    // Warfarin / CYP2C9
    row(
        Drug::Warfarin,
        PM,
        RiskLabel::Toxic,
        [
            "Reduce starting dose significantly.",
            "Increased bleeding risk expected.",
            "Consider alternative anticoagulant if appropriate.",
            "Close INR monitoring required.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Warfarin,
        IM,
        RiskLabel::AdjustDosage,
        [
            "Reduce starting dose.",
            "Moderate bleeding risk.",
            "Not routinely required.",
            "Frequent INR monitoring.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Warfarin,
        NM,
        RiskLabel::Safe,
        [
            "Use standard dosing.",
            "Standard dosing appropriate.",
            "Not required.",
            "Routine INR monitoring.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Warfarin,
        Phenotype::Unknown,
        RiskLabel::Unknown,
        [
            "Insufficient genetic data.",
            "Use standard clinical protocol.",
            "Consider alternatives if clinically indicated.",
            "Monitor INR closely.",
        ],
        EVIDENCE_LEVEL_B,
    ),
    // Simvastatin / SLCO1B1
    row(
        Drug::Simvastatin,
        PM,
        RiskLabel::Toxic,
        [
            "Avoid simvastatin use.",
            "High risk of statin-induced myopathy.",
            "Consider pravastatin or rosuvastatin.",
            "Monitor CK levels and muscle symptoms closely.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Simvastatin,
        IM,
        RiskLabel::AdjustDosage,
        [
            "Reduce simvastatin dose.",
            "Increased myopathy risk at higher doses.",
            "Consider alternative statin if needed.",
            "Monitor for muscle pain or weakness.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Simvastatin,
        NM,
        RiskLabel::Safe,
        [
            "Use standard dosing.",
            "Standard simvastatin dosing appropriate.",
            "Not required.",
            "Routine monitoring.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Simvastatin,
        Phenotype::Unknown,
        RiskLabel::Unknown,
        [
            "Insufficient genetic data.",
            "Use clinical judgment.",
            "Consider alternative statin if clinically indicated.",
            "Monitor patient closely.",
        ],
        EVIDENCE_LEVEL_B,
    ),
    // Azathioprine / TPMT
    row(
        Drug::Azathioprine,
        PM,
        RiskLabel::Toxic,
        [
            "Avoid standard azathioprine dosing.",
            "High risk of severe myelosuppression.",
            "Consider non-thiopurine therapy.",
            "Frequent complete blood count monitoring required.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Azathioprine,
        IM,
        RiskLabel::AdjustDosage,
        [
            "Reduce starting dose.",
            "Moderate risk of myelosuppression.",
            "Not routinely required.",
            "Monitor CBC closely.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Azathioprine,
        NM,
        RiskLabel::Safe,
        [
            "Use standard dosing.",
            "Standard azathioprine dosing appropriate.",
            "Not required.",
            "Routine blood monitoring.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Azathioprine,
        Phenotype::Unknown,
        RiskLabel::Unknown,
        [
            "Insufficient genetic data.",
            "Use standard clinical protocol.",
            "Consider alternatives if needed.",
            "Monitor blood counts.",
        ],
        EVIDENCE_LEVEL_B,
    ),
    // Fluorouracil / DPYD
    row(
        Drug::Fluorouracil,
        PM,
        RiskLabel::Toxic,
        [
            "Avoid standard fluorouracil dosing.",
            "High risk of severe toxicity.",
            "Consider alternative chemotherapy regimen.",
            "Close toxicity monitoring required.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Fluorouracil,
        IM,
        RiskLabel::AdjustDosage,
        [
            "Reduce starting dose.",
            "Increased toxicity risk.",
            "Not routinely required.",
            "Monitor for adverse reactions.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Fluorouracil,
        NM,
        RiskLabel::Safe,
        [
            "Use standard dosing.",
            "Standard fluorouracil dosing appropriate.",
            "Not required.",
            "Routine monitoring.",
        ],
        EVIDENCE_LEVEL_A,
    ),
    row(
        Drug::Fluorouracil,
        Phenotype::Unknown,
        RiskLabel::Unknown,
        [
            "Insufficient genetic data.",
            "Proceed with caution.",
            "Consider alternative therapy if clinically indicated.",
            "Monitor patient closely.",
        ],
        EVIDENCE_LEVEL_B,
    ),
];

/// The full decision table, for auditing and reporting.
pub fn guideline_rows() -> &'static [GuidelineRow] {
    GUIDELINE_TABLE
}

/// Recommendation for a supported drug. Falls back to the drug's `Unknown` row when no row
/// matches the phenotype.
pub fn guideline_for(drug: Drug, phenotype: Phenotype) -> GuidelineRecommendation {
    let rows = || GUIDELINE_TABLE.iter().filter(move |row| row.drug == drug);

    rows()
        .find(|row| row.phenotype == phenotype)
        .or_else(|| rows().find(|row| row.phenotype == Phenotype::Unknown))
        .map(GuidelineRow::recommendation)
        .unwrap_or_else(no_recommendation)
}

/// Recommendation for a raw drug identifier; unknown drugs get the generic record.
pub fn recommend(drug: &str, phenotype: Phenotype) -> GuidelineRecommendation {
    match Drug::parse(drug) {
        Some(drug) => guideline_for(drug, phenotype),
        None => no_recommendation(),
    }
}

pub fn no_recommendation() -> GuidelineRecommendation {
    GuidelineRecommendation {
        risk_label: RiskLabel::Unknown,
        action: "No recommendation available".to_string(),
        dosing_guidance: "N/A".to_string(),
        alternative_therapy: "N/A".to_string(),
        monitoring: "N/A".to_string(),
        evidence_level: EVIDENCE_LEVEL_B.to_string(),
    }
}
