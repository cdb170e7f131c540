use super::super::Model;
use super::super::Msg;
use super::handlers::is_accepted_type;
use super::utils::debounce;
use gloo_file::File as GlooFile;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_preview(model) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let disabled = !model.model_ready() || model.loading;
    let link = ctx.link();

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().and_then(|files| files.item(0));
        input.set_value("");

        match file {
            Some(file) if is_accepted_type(&file.type_()) => Msg::FileSelected(GlooFile::from(file)),
            Some(file) => Msg::SetError(Some(format!("Unsupported file type: {}", file.name()))),
            None => Msg::SetError(Some("No image selected.".into())),
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/png,image/jpeg"
                style="display: none;"
                disabled={disabled}
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"), disabled.then_some("disabled"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    {
                        if model.loading {
                            html! { <><i class="fa-solid fa-spinner fa-spin"></i><p>{"Detecting glaucoma..."}</p></> }
                        } else {
                            html! {
                                <>
                                    <i class="fa-solid fa-cloud-arrow-up"></i>
                                    <p>{"Upload Image: drag & drop a retina image here, or click"}</p>
                                    <p class="file-types">{"Supported formats: PNG, JPG, JPEG (max 200 MB)"}</p>
                                </>
                            }
                        }
                    }
                </div>
            </div>
        </>
    }
}

fn render_preview(model: &Model) -> Html {
    let (Some(url), Some(result)) = (&model.preview_url, &model.last_result) else {
        return html! {};
    };

    html! {
        <figure class="uploaded-image">
            <img src={url.to_string()} alt="Uploaded Image" />
            <figcaption>{ format!("Uploaded Image: {}", result.image) }</figcaption>
        </figure>
    }
}
