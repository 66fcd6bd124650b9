use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::AnalysisConfig;
use crate::workflows::pharmacogenomics::{
    analysis_router, AnalysisRepository, AnalysisResult, AnalysisService, ExplanationError,
    ExplanationGenerator, ExplanationRequest, RepositoryError,
};

/// CYP2C19 *2/*2, CYP2D6 *1/*4, CYP2C9 *1/*1 and a half-resolved SLCO1B1 call.
pub(super) const SAMPLE_VCF: &str = "##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr10\t94781859\trs4244285\tG\tA\t.\tPASS\tGENE=CYP2C19;STAR=*2;RS=rs4244285
chr10\t94761900\trs12769205\tA\tG\t.\tPASS\tGENE=CYP2C19;STAR=*2
chr22\t42130692\trs3892097\tG\tA\t.\tPASS\tGENE=CYP2D6;STAR=*4
chr22\t42126611\trs1065852\tG\tA\t.\tPASS\tGENE=CYP2D6;STAR=*1
chr10\t94942290\trs1057910\tA\tC\t.\tPASS\tGENE=CYP2C9;STAR=*1
chr10\t94981296\trs1799853\tC\tT\t.\tPASS\tGENE=CYP2C9;STAR=*1
chr12\t21178615\trs4149056\tT\tC\t.\tPASS\tGENE=SLCO1B1;STAR=*5
";

pub(super) const DPYD_POOR_VCF: &str =
    "chr1\t97450058\trs3918290\tC\tT\t.\tPASS\tGENE=DPYD;STAR=*2A
chr1\t97450059\trs3918290\tC\tT\t.\tPASS\tGENE=DPYD;STAR=*2A
";

pub(super) fn drugs(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub(super) fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn analysis_config() -> AnalysisConfig {
    AnalysisConfig {
        patient_id: "PATIENT_TEST".to_string(),
        max_upload_bytes: 4 * 1024,
    }
}

pub(super) fn build_service(
    explainer: Arc<dyn ExplanationGenerator>,
) -> (AnalysisService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AnalysisService::new(
        explainer,
        repository.clone(),
        analysis_config(),
        Duration::from_millis(500),
    );
    (service, repository)
}

pub(super) fn router_with_service(service: AnalysisService<MemoryRepository>) -> axum::Router {
    analysis_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<AnalysisResult>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl AnalysisRepository for MemoryRepository {
    fn record(&self, result: &AnalysisResult) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(result.clone());
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<AnalysisResult>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl AnalysisRepository for UnavailableRepository {
    fn record(&self, _result: &AnalysisResult) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<AnalysisResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Cites every detected rsid plus one that was never observed.
#[derive(Default)]
pub(super) struct StubExplainer {
    calls: AtomicUsize,
}

impl StubExplainer {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ExplanationGenerator for StubExplainer {
    async fn generate(&self, request: &ExplanationRequest) -> Result<String, ExplanationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut citations = request.detected_variant_rsids.clone();
        citations.push("rs0000001".to_string());
        let payload = serde_json::json!({
            "summary": format!("{} response is shaped by {}.", request.drug, request.diplotype),
            "variant_citation": citations,
            "biological_mechanism": "Allele function determines enzyme activity.",
            "clinical_rationale": format!("Phenotype {} drives the recommendation.", request.phenotype),
        });
        Ok(format!("```json\n{payload}\n```"))
    }
}

pub(super) struct SlowExplainer(pub(super) Duration);

#[async_trait::async_trait]
impl ExplanationGenerator for SlowExplainer {
    async fn generate(&self, _request: &ExplanationRequest) -> Result<String, ExplanationError> {
        tokio::time::sleep(self.0).await;
        Ok("{}".to_string())
    }
}

/// Waits before answering like [`StubExplainer`].
pub(super) struct DelayedExplainer {
    pub(super) delay: Duration,
    pub(super) inner: Arc<StubExplainer>,
}

#[async_trait::async_trait]
impl ExplanationGenerator for DelayedExplainer {
    async fn generate(&self, request: &ExplanationRequest) -> Result<String, ExplanationError> {
        tokio::time::sleep(self.delay).await;
        self.inner.generate(request).await
    }
}

pub(super) struct FailingExplainer;

#[async_trait::async_trait]
impl ExplanationGenerator for FailingExplainer {
    async fn generate(&self, _request: &ExplanationRequest) -> Result<String, ExplanationError> {
        Err(ExplanationError::Transport("connection reset".to_string()))
    }
}

const BOUNDARY: &str = "pharmaguard-test-boundary";

/// Multipart upload with optional file and drugs parts.
pub(super) fn upload_request(vcf: Option<&[u8]>, drugs: Option<&str>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    if let Some(content) = vcf {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"vcf_file\"; filename=\"sample.vcf\"\r\nContent-Type: text/plain\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(drugs) = drugs {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"drugs\"\r\n\r\n{drugs}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
