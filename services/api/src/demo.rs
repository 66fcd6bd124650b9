use crate::infra::{explainer_from_config, InMemoryAnalysisRepository};
use clap::Args;
use pharmaguard::config::{AnalysisConfig, AppConfig};
use pharmaguard::error::AppError;
use pharmaguard::workflows::pharmacogenomics::{
    overall_risk, parse_drug_list, AnalysisResult, AnalysisService, Drug, OfflineExplainer,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Synthetic patient covering every catalog gene.
const DEMO_VCF: &str = "##fileformat=VCFv4.2
##source=pharmaguard-demo
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr22\t42130692\trs3892097\tG\tA\t.\tPASS\tGENE=CYP2D6;STAR=*4
chr22\t42126611\trs1065852\tG\tA\t.\tPASS\tGENE=CYP2D6;STAR=*1
chr10\t94781859\trs4244285\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=*2
chr10\t94761900\trs12769205\tA\tG\t.\tPASS\tGENE=CYP2C19;STAR=*2
chr10\t94942290\trs1057910\tA\tC\t.\tPASS\tGENE=CYP2C9;STAR=*3
chr10\t94981296\trs1799853\tC\tT\t.\tPASS\tGENE=CYP2C9;STAR=*1
chr12\t21178615\trs4149056\tT\tC\t.\tPASS\tGENE=SLCO1B1;STAR=*5
chr12\t21176804\trs2306283\tA\tG\t.\tPASS\tGENE=SLCO1B1;STAR=*15
chr6\t18130918\trs1142345\tT\tC\t.\tPASS\tGENE=TPMT;STAR=*1
chr6\t18139228\trs1800460\tC\tT\t.\tPASS\tGENE=TPMT;STAR=*1
chr1\t97450058\trs3918290\tC\tT\t.\tPASS\tGENE=DPYD;STAR=*2A
";

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Path to the variant file
    #[arg(long)]
    pub(crate) vcf: PathBuf,
    /// Comma-separated drug names
    #[arg(long)]
    pub(crate) drugs: String,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Restrict the demo to a comma-separated subset of drugs.
    #[arg(long)]
    pub(crate) drugs: Option<String>,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs { vcf, drugs, pretty } = args;
    let config = AppConfig::load()?;

    let drugs = drug_names(&drugs)?;
    let content = tokio::fs::read(&vcf).await?;

    let service = AnalysisService::new(
        explainer_from_config(&config.explainer),
        Arc::new(InMemoryAnalysisRepository::default()),
        config.analysis,
        config.explainer.timeout,
    );
    let results = service.analyze(&content, &drugs).await;

    let rendered = if pretty {
        serde_json::to_string_pretty(&results)
    } else {
        serde_json::to_string(&results)
    }
    .map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn list_drugs() {
    println!("Supported drugs");
    for drug in Drug::ALL {
        println!("- {:<13} {}", drug.as_str(), drug.primary_gene());
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let drugs = match args.drugs.as_deref() {
        Some(raw) => drug_names(raw)?,
        None => Drug::ALL
            .iter()
            .map(|drug| drug.as_str().to_string())
            .collect(),
    };

    let service = AnalysisService::new(
        Arc::new(OfflineExplainer),
        Arc::new(InMemoryAnalysisRepository::default()),
        AnalysisConfig::default(),
        Duration::from_secs(1),
    );
    let results = service.analyze(DEMO_VCF.as_bytes(), &drugs).await;

    println!("Pharmacogenomic risk demo (offline explanations)");
    render_results(&results);
    Ok(())
}

fn drug_names(raw: &str) -> Result<Vec<String>, AppError> {
    Ok(parse_drug_list(raw)?
        .into_iter()
        .map(|drug| drug.as_str().to_string())
        .collect())
}

fn render_results(results: &[AnalysisResult]) {
    let Some(first) = results.first() else {
        println!("No drugs analyzed.");
        return;
    };
    println!(
        "Patient {} | analyzed {}",
        first.patient_id,
        first.timestamp.to_rfc3339()
    );

    for result in results {
        let profile = &result.pharmacogenomic_profile;
        let risk = &result.risk_assessment;
        println!(
            "\n{} ({} {} -> {})",
            result.drug,
            profile.primary_gene,
            profile.diplotype,
            profile.phenotype.description()
        );
        println!(
            "  Risk: {} | severity {} | confidence {:.2}",
            risk.risk_label, risk.severity, risk.confidence_score
        );
        println!("  Action: {}", result.clinical_recommendation.action);
        println!(
            "  Dosing: {}",
            result.clinical_recommendation.dosing_guidance
        );
        if !profile.detected_variants.is_empty() {
            let rsids: Vec<&str> = profile
                .detected_variants
                .iter()
                .map(|variant| variant.rsid.as_str())
                .collect();
            println!("  Variants: {}", rsids.join(", "));
        }
        if result.quality_metrics.malformed_lines_count > 0 {
            println!(
                "  Skipped {} malformed lines",
                result.quality_metrics.malformed_lines_count
            );
        }
    }

    println!("\nOverall risk: {}", overall_risk(results));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaguard::workflows::pharmacogenomics::{OverallRisk, RiskLabel, Severity};
    use pharmaguard::workflows::vcf::parse_variant_text;

    #[test]
    fn demo_file_covers_every_catalog_gene_cleanly() {
        let parsed = parse_variant_text(DEMO_VCF);
        assert!(parsed.success);
        assert_eq!(parsed.malformed_line_count, 0);
        for drug in Drug::ALL {
            assert!(
                parsed.variants_for(drug.primary_gene().symbol()).is_some(),
                "{drug} has no variants in the demo file"
            );
        }
    }

    #[tokio::test]
    async fn demo_patient_is_high_risk() {
        let service = AnalysisService::new(
            Arc::new(OfflineExplainer),
            Arc::new(InMemoryAnalysisRepository::default()),
            AnalysisConfig::default(),
            Duration::from_secs(1),
        );
        let drugs: Vec<String> = Drug::ALL.iter().map(|drug| drug.to_string()).collect();
        let results = service.analyze(DEMO_VCF.as_bytes(), &drugs).await;

        let simvastatin = &results[3];
        assert_eq!(simvastatin.pharmacogenomic_profile.diplotype.as_str(), "*15/*5");
        assert_eq!(simvastatin.risk_assessment.risk_label, RiskLabel::Toxic);
        assert_eq!(simvastatin.risk_assessment.severity, Severity::Critical);
        assert_eq!(overall_risk(&results), OverallRisk::High);
    }

    #[test]
    fn drug_names_reject_unsupported_entries() {
        assert!(matches!(
            drug_names("codeine,placebo"),
            Err(AppError::Request(_))
        ));
        assert_eq!(
            drug_names("codeine, warfarin").expect("supported"),
            vec!["CODEINE", "WARFARIN"]
        );
    }
}
