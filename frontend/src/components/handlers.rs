use super::super::{Model, Msg};
use crate::api;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::InferenceResponse;
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use yew::prelude::*;

const ACCEPTED_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

pub fn is_accepted_type(mime: &str) -> bool {
    ACCEPTED_TYPES.contains(&mime)
}

pub fn refresh_status(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::fetch_status().await {
            Ok(status) => link.send_message(Msg::StatusLoaded(status)),
            Err(e) => link.send_message(Msg::SetError(Some(e))),
        }
    });
}

pub fn refresh_report(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::fetch_report().await {
            Ok(report) => link.send_message(Msg::ReportLoaded(report)),
            Err(e) => link.send_message(Msg::SetError(Some(e))),
        }
    });
}

pub fn handle_file_selected(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    if !model.model_ready() {
        model.error = Some("The model is not loaded; uploads are disabled.".into());
        return true;
    }
    if model.loading {
        return false;
    }

    model.loading = true;
    model.error = None;
    model.last_result = None;
    model.preview_url = Some(ObjectUrl::from(file.clone()));

    let link = ctx.link().clone();
    spawn_local(async move {
        match api::post_inference(&file).await {
            Ok(response) => link.send_message(Msg::InferenceResult(response)),
            Err(e) => link.send_message(Msg::SetError(Some(e))),
        }
    });

    true
}

pub fn handle_inference_result(
    model: &mut Model,
    ctx: &Context<Model>,
    response: InferenceResponse,
) -> bool {
    log::info!("{} classified as {}", response.image, response.prediction);
    model.last_result = Some(response);
    model.loading = false;
    refresh_report(ctx);
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let Some(file) = event
        .data_transfer()
        .and_then(|dt| dt.files())
        .and_then(|files| files.item(0))
    else {
        return true;
    };

    if is_accepted_type(&file.type_()) {
        ctx.link().send_message(Msg::FileSelected(GlooFile::from(file)));
    } else {
        log::warn!("Skipping unsupported file: {}", file.name());
        model.error = Some(format!("Unsupported file type: {}", file.name()));
    }
    true
}

pub fn handle_toggle_theme(model: &mut Model) -> bool {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return false;
    };

    if model.theme == "light" {
        model.theme = "dark".to_string();
        let _ = body.class_list().add_1("dark-mode");
    } else {
        model.theme = "light".to_string();
        let _ = body.class_list().remove_1("dark-mode");
    }

    true
}
