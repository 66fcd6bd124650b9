use super::domain::{RiskLabel, Severity};
use tracing::warn;

pub const fn severity_for(label: RiskLabel) -> Severity {
    match label {
        RiskLabel::Safe | RiskLabel::Unknown => Severity::None,
        RiskLabel::AdjustDosage => Severity::Moderate,
        RiskLabel::Ineffective => Severity::High,
        RiskLabel::Toxic => Severity::Critical,
    }
}

/// Maps a free-form risk label. Unrecognized labels map to `none` and are logged so the
/// gap reaches operators instead of disappearing silently.
pub fn map_severity(label: &str) -> Severity {
    match RiskLabel::parse(label) {
        Some(label) => severity_for(label),
        None => {
            warn!(risk_label = label, "unrecognized risk label mapped to severity none");
            Severity::None
        }
    }
}
