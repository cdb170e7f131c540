mod api;
mod components;

use components::charts::{render_bar_chart, render_pie_chart};
use components::handlers;
use components::header::render_header;
use components::results::{render_results_table, render_verdict};
use components::theme_toggle::render_theme_toggle;
use components::upload_section::render_upload_section;
use components::utils::{render_download_link, render_error_message, render_model_error};
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{InferenceResponse, ReportView, SessionState, StatusResponse};
use web_sys::DragEvent;
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Server state
    StatusLoaded(StatusResponse),
    ReportLoaded(ReportView),

    // Upload flow
    FileSelected(GlooFile),
    InferenceResult(InferenceResponse),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),
    ToggleTheme,

    // Input events
    HandleDrop(DragEvent),
}

// Main component
pub struct Model {
    status: Option<StatusResponse>,
    report: Option<ReportView>,
    last_result: Option<InferenceResponse>,
    preview_url: Option<ObjectUrl>,
    loading: bool,
    error: Option<String>,
    is_dragging: bool,
    theme: String,
}

impl Model {
    fn model_ready(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.model_loaded)
    }

    fn session_state(&self) -> SessionState {
        self.report
            .as_ref()
            .map_or(SessionState::Idle, |report| report.state)
    }
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        handlers::refresh_status(ctx);
        handlers::refresh_report(ctx);

        Self {
            status: None,
            report: None,
            last_result: None,
            preview_url: None,
            loading: false,
            error: None,
            is_dragging: false,
            theme: "light".to_string(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::StatusLoaded(status) => {
                self.status = Some(status);
                true
            }
            Msg::ReportLoaded(report) => {
                self.report = Some(report);
                true
            }

            Msg::FileSelected(file) => handlers::handle_file_selected(self, ctx, file),
            Msg::InferenceResult(response) => handlers::handle_inference_result(self, ctx, response),

            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::ToggleTheme => handlers::handle_toggle_theme(self),

            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }
                <div class="top-right">
                    { render_theme_toggle(&self.theme, ctx.link()) }
                </div>

                <main class="main-content">
                    { render_model_error(self) }
                    { render_upload_section(self, ctx) }
                    { render_error_message(self) }
                    { render_verdict(self) }
                    { self.render_session() }
                </main>

                <footer class="app-footer">
                    <p>{"GlaucoGuard | Predictions are not a medical diagnosis"}</p>
                </footer>
            </div>
        }
    }
}

impl Model {
    fn render_session(&self) -> Html {
        match (self.session_state(), &self.report) {
            (SessionState::HasResults, Some(report)) => html! {
                <section class="session-results">
                    <hr />
                    <h2>{format!("Detection Results ({} images)", report.total())}</h2>
                    { render_results_table(report) }
                    <div class="charts">
                        <div class="chart-card">
                            <h3>{"Pie Chart"}</h3>
                            { render_pie_chart(report) }
                        </div>
                        <div class="chart-card">
                            <h3>{"Bar Chart"}</h3>
                            { render_bar_chart(report) }
                        </div>
                    </div>
                    <hr />
                    <h2>{"Download Prediction Report"}</h2>
                    { render_download_link() }
                </section>
            },
            _ => html! {
                <p class="warning-message">{"No images uploaded yet."}</p>
            },
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
