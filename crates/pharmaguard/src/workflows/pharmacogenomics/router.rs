use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::AnalysisResult;
use super::repository::AnalysisRepository;
use super::request::{parse_drug_list, AnalysisRequestError, DRUGS_FIELD, VCF_FIELD};
use super::service::AnalysisService;
use crate::error::AppError;

/// Room for multipart boundaries and the drugs field on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
const DEFAULT_RECENT_LIMIT: usize = 20;

/// Router builder exposing the upload endpoint and the form description.
pub fn analysis_router<S>(service: Arc<AnalysisService<S>>) -> Router
where
    S: AnalysisRepository + 'static,
{
    let body_limit = service
        .config()
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/api/analyze", post(analyze_handler::<S>))
        .route("/api/analyze/config", get(config_handler::<S>))
        .route("/api/analyze/recent", get(recent_handler::<S>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service)
}

pub(crate) async fn analyze_handler<S>(
    State(service): State<Arc<AnalysisService<S>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<AnalysisResult>>, AppError>
where
    S: AnalysisRepository + 'static,
{
    let multipart =
        multipart.map_err(|rejection| AnalysisRequestError::Malformed(rejection.body_text()))?;
    let upload = read_upload(multipart, service.config().max_upload_bytes).await?;

    let content = upload
        .variant_file
        .ok_or(AnalysisRequestError::MissingVariantFile)?;
    let raw_drugs = upload
        .drugs
        .filter(|drugs| !drugs.is_empty())
        .ok_or(AnalysisRequestError::MissingDrugs)?;
    let drugs: Vec<String> = parse_drug_list(&raw_drugs)?
        .into_iter()
        .map(|drug| drug.as_str().to_string())
        .collect();

    Ok(Json(service.analyze(&content, &drugs).await))
}

pub(crate) async fn config_handler<S>(State(service): State<Arc<AnalysisService<S>>>) -> Response
where
    S: AnalysisRepository + 'static,
{
    (StatusCode::OK, Json(service.form_config())).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentQuery {
    limit: Option<usize>,
}

pub(crate) async fn recent_handler<S>(
    State(service): State<Arc<AnalysisService<S>>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    S: AnalysisRepository + 'static,
{
    match service.recent(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT)) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

#[derive(Default)]
struct Upload {
    variant_file: Option<Bytes>,
    drugs: Option<String>,
}

async fn read_upload(
    mut multipart: Multipart,
    limit: usize,
) -> Result<Upload, AnalysisRequestError> {
    let mut upload = Upload::default();
    let malformed = |err: MultipartError| {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AnalysisRequestError::FileTooLarge { limit }
        } else {
            AnalysisRequestError::Malformed(err.body_text())
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(VCF_FIELD) => {
                let bytes = field.bytes().await.map_err(malformed)?;
                if bytes.len() > limit {
                    return Err(AnalysisRequestError::FileTooLarge { limit });
                }
                upload.variant_file = Some(bytes);
            }
            Some(DRUGS_FIELD) => {
                upload.drugs = Some(field.text().await.map_err(malformed)?);
            }
            _ => {}
        }
    }

    Ok(upload)
}
