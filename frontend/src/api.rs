use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{ErrorResponse, InferenceResponse, ReportView, StatusResponse};

pub async fn fetch_status() -> Result<StatusResponse, String> {
    get_json("/api/status").await
}

pub async fn fetch_report() -> Result<ReportView, String> {
    get_json("/api/results").await
}

pub async fn post_inference(file: &GlooFile) -> Result<InferenceResponse, String> {
    let form_data = web_sys::FormData::new().map_err(|_| "Failed to build form data".to_string())?;
    form_data
        .append_with_blob_and_filename("image", file.as_ref(), &file.name())
        .map_err(|_| "Failed to attach image".to_string())?;

    let response = Request::post("/api/inference")
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_json(response).await
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if response.ok() {
        return response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e));
    }

    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => Err(body.error),
        Err(_) => Err(format!("Server error: {}", status)),
    }
}
