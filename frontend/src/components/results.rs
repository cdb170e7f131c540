use super::super::Model;
use shared::{PredictionLabel, ReportView};
use yew::prelude::*;

pub fn render_verdict(model: &Model) -> Html {
    let Some(result) = &model.last_result else {
        return html! {};
    };

    let glaucoma = result.prediction == PredictionLabel::Glaucoma;
    html! {
        <div class={classes!("results-container", if glaucoma { "glaucoma-detected" } else { "healthy" })}>
            <div class="result-header">
                <h2 title={format!("Prediction for: {}", result.image)}>
                    {
                        if glaucoma {
                            html! { <><i class="fa-solid fa-triangle-exclamation"></i>{" Glaucoma"}</> }
                        } else {
                            html! { <><i class="fa-solid fa-circle-check"></i>{" Normal"}</> }
                        }
                    }
                    <span class="analyzed-filename-display">{format!("({})", result.image)}</span>
                </h2>
                <p class="verdict-message">{ &result.message }</p>
            </div>
            <div class="detailed-results">
                <h3>{"Model output"}</h3>
                <div class="result-bars">
                    { for result.class_labels.iter().zip(result.scores.iter()).map(|(name, &score)| html! {
                        <div class="result-item">
                            <div class="result-label">{ name }</div>
                            <div class="result-value">{ format!("{:.4}", score) }</div>
                        </div>
                    })}
                </div>
            </div>
        </div>
    }
}

/// Newest upload first; predictions coloured by label.
pub fn render_results_table(report: &ReportView) -> Html {
    html! {
        <table class="results-table">
            <thead>
                <tr>
                    <th>{"#"}</th>
                    <th>{"Image"}</th>
                    <th>{"Prediction"}</th>
                </tr>
            </thead>
            <tbody>
                { for report.records.iter().enumerate().map(|(i, record)| html! {
                    <tr key={i.to_string()}>
                        <td>{ i.to_string() }</td>
                        <td>{ &record.image }</td>
                        <td style={format!("color: {}", record.label.color())}>{ record.label.to_string() }</td>
                    </tr>
                })}
            </tbody>
        </table>
    }
}
