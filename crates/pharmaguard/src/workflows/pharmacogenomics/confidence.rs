const FLOOR: f64 = 0.10;
const CEILING: f64 = 0.95;

const SINGLE_VARIANT_POINTS: u32 = 15;
const MULTI_VARIANT_POINTS: u32 = 30;
const PHENOTYPE_POINTS: u32 = 25;
const LEVEL_A_POINTS: u32 = 25;
const LEVEL_B_POINTS: u32 = 15;
const OTHER_EVIDENCE_POINTS: u32 = 5;
const QUALITY_POINTS: u32 = 20;

/// Evidence signals combined into a confidence score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceInputs<'a> {
    pub gene_detected: bool,
    pub detected_variants_count: usize,
    pub phenotype_determined: bool,
    pub evidence_level: &'a str,
    pub malformed_lines: usize,
}

/// Additive score over gene coverage, phenotype resolution, evidence strength and data
/// quality, normalized to `[0.10, 0.95]` and rounded to two decimals.
pub fn confidence_score(inputs: &ConfidenceInputs<'_>) -> f64 {
    let coverage = match (inputs.gene_detected, inputs.detected_variants_count) {
        (false, _) | (true, 0) => 0,
        (true, 1) => SINGLE_VARIANT_POINTS,
        (true, _) => MULTI_VARIANT_POINTS,
    };

    let phenotype = if inputs.phenotype_determined {
        PHENOTYPE_POINTS
    } else {
        0
    };

    let evidence = inputs.evidence_level.to_ascii_uppercase();
    let evidence = if evidence.contains("LEVEL A") {
        LEVEL_A_POINTS
    } else if evidence.contains("LEVEL B") {
        LEVEL_B_POINTS
    } else {
        OTHER_EVIDENCE_POINTS
    };

    let malformed = u32::try_from(inputs.malformed_lines).unwrap_or(u32::MAX);
    let quality = QUALITY_POINTS.saturating_sub(malformed);

    let total = coverage + phenotype + evidence + quality;
    let normalized = (f64::from(total) / 100.0).clamp(FLOOR, CEILING);
    (normalized * 100.0).round() / 100.0
}
