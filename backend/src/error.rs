use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

use crate::export::ExportError;

/// Failures of the model → preprocess → classify pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Model corrupt: {0}")]
    ModelCorrupt(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),
    #[error("Inference error: {0}")]
    InferenceError(String),
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        PipelineError::UnsupportedImageFormat(err.to_string())
    }
}

#[cfg(feature = "torch")]
impl From<tch::TchError> for PipelineError {
    fn from(err: tch::TchError) -> Self {
        PipelineError::InferenceError(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No image file in upload")]
    MissingImage,
    #[error("Upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("Model is not loaded: {0}")]
    ModelNotLoaded(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<actix_multipart::MultipartError> for ApiError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        ApiError::Internal(format!("Malformed upload: {}", err))
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelNotLoaded(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Pipeline(PipelineError::UnsupportedImageFormat(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ApiError::Pipeline(PipelineError::ModelUnavailable(_))
            | ApiError::Pipeline(PipelineError::ModelCorrupt(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Pipeline(PipelineError::InferenceError(_))
            | ApiError::Export(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApiError::MissingImage, StatusCode::BAD_REQUEST)]
    #[case(ApiError::PayloadTooLarge { limit: 10 }, StatusCode::PAYLOAD_TOO_LARGE)]
    #[case(ApiError::ModelNotLoaded("offline".into()), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(
        ApiError::Pipeline(PipelineError::UnsupportedImageFormat("gif".into())),
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    )]
    #[case(
        ApiError::Pipeline(PipelineError::InferenceError("nan".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn status_codes(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn pipeline_messages_pass_through_unchanged() {
        let err = ApiError::from(PipelineError::ModelCorrupt("bad magic".into()));
        assert_eq!(err.to_string(), "Model corrupt: bad magic");
    }
}
