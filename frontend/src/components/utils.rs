use super::super::Model;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = &model.error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}

pub fn render_model_error(model: &Model) -> Html {
    match model.status.as_ref().and_then(|s| s.model_error.as_ref()) {
        Some(message) => html! {
            <div class="error-message model-error">
                <i class="fa-solid fa-triangle-exclamation"></i>
                <p>{ format!("Error loading the model: {}", message) }</p>
            </div>
        },
        None => html! {},
    }
}

pub fn render_download_link() -> Html {
    html! {
        <a class="analyze-btn download-btn" href="/api/report.csv" download="prediction_report.csv">
            <i class="fa-solid fa-download"></i>{" Download CSV"}
        </a>
    }
}
