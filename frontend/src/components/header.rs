use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-eye"></i> {" GlaucoGuard"}</h1>
            <p class="subtitle">{"Gaining Clarity in Glaucoma diagnosis through Deep Learning"}</p>
        </header>
    }
}
