use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;
use log::{info, warn};
use shared::{InferenceResponse, PredictionLabel, StatusResponse};
use std::path::PathBuf;

use crate::error::ApiError;
use crate::export::{REPORT_FILE_NAME, export_csv};
use crate::state::AppState;

const FALLBACK_IMAGE_NAME: &str = "upload";

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/inference", web::post().to(handle_inference))
            .route("/results", web::get().to(get_results))
            .route("/report.csv", web::get().to(download_report))
            .route("/status", web::get().to(get_status)),
    );
}

struct Upload {
    name: String,
    bytes: Vec<u8>,
}

/// Takes the first file field of the form, enforcing `limit`.
async fn read_upload(payload: &mut Multipart, limit: usize) -> Result<Upload, ApiError> {
    while let Some(mut field) = payload.try_next().await? {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);

        let Some(name) = filename else {
            while field.try_next().await?.is_some() {}
            continue;
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > limit {
                return Err(ApiError::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        let name = if name.trim().is_empty() {
            FALLBACK_IMAGE_NAME.to_string()
        } else {
            name
        };
        return Ok(Upload { name, bytes });
    }

    Err(ApiError::MissingImage)
}

async fn handle_inference(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let pipeline = state.pipeline()?;
    let Upload { name, bytes } = read_upload(&mut payload, state.config.server.max_upload_bytes).await?;

    let prediction = web::block(move || pipeline.predict(&bytes))
        .await?
        .inspect_err(|e| warn!("Prediction failed for {}: {}", name, e))?;

    state.session()?.record(name.clone(), prediction.label);
    info!("{} classified as {}", name, prediction.label);

    Ok(HttpResponse::Ok().json(InferenceResponse {
        image: name,
        prediction: prediction.label,
        scores: prediction.scores.as_array(),
        class_labels: PredictionLabel::class_labels(),
        message: prediction.label.verdict_message().to_string(),
    }))
}

async fn get_results(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let report = state.session()?.report();
    Ok(HttpResponse::Ok().json(report))
}

async fn download_report(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let csv = export_csv(state.session()?.snapshot())?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(REPORT_FILE_NAME.to_string())],
        })
        .body(csv))
}

async fn get_status(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = state.session()?.snapshot().len();
    Ok(HttpResponse::Ok().json(StatusResponse {
        model_loaded: state.model_info().is_some(),
        model_error: state.model.error().map(str::to_owned),
        model_sha256: state.model_info().map(|info| info.sha256.clone()),
        records,
    }))
}
