use shared::ReportView;
use shared::chart::{bars, pie_slices};
use yew::prelude::*;

const PIE_SIZE: f64 = 240.0;
const BAR_WIDTH: f64 = 320.0;
const BAR_HEIGHT: f64 = 240.0;
const BAR_PLOT_HEIGHT: f64 = 160.0;
const BAR_BASELINE: f64 = 190.0;

pub fn render_pie_chart(report: &ReportView) -> Html {
    let center = PIE_SIZE / 2.0;
    let slices = pie_slices(&report.proportions, center, center, center - 10.0);

    html! {
        <svg class="pie-chart" viewBox={format!("0 0 {} {}", PIE_SIZE, PIE_SIZE)} width="100%" role="img">
            { for slices.iter().map(|slice| html! {
                <g>
                    <path d={slice.path.clone()} fill={slice.color} stroke="white" stroke-width="1" />
                    <text x={format!("{:.1}", slice.text_x)} y={format!("{:.1}", slice.text_y)}
                        text-anchor="middle" dominant-baseline="middle" fill="white">
                        { &slice.display }
                    </text>
                </g>
            })}
            <g class="legend">
                { for slices.iter().enumerate().map(|(i, slice)| html! {
                    <text x="4" y={format!("{}", 14 + i * 16)} fill={slice.color}>{ slice.label.to_string() }</text>
                })}
            </g>
        </svg>
    }
}

pub fn render_bar_chart(report: &ReportView) -> Html {
    let bars = bars(&report.distribution, BAR_PLOT_HEIGHT);
    let slot = BAR_WIDTH / bars.len().max(1) as f64;
    let bar_width = slot * 0.6;

    html! {
        <svg class="bar-chart" viewBox={format!("0 0 {} {}", BAR_WIDTH, BAR_HEIGHT)} width="100%" role="img">
            <line x1="0" y1={BAR_BASELINE.to_string()} x2={BAR_WIDTH.to_string()} y2={BAR_BASELINE.to_string()} stroke="currentColor" />
            { for bars.iter().enumerate().map(|(i, bar)| {
                let x = slot * i as f64 + (slot - bar_width) / 2.0;
                let y = BAR_BASELINE - bar.height;
                html! {
                    <g>
                        <rect x={format!("{:.1}", x)} y={format!("{:.1}", y)}
                            width={format!("{:.1}", bar_width)} height={format!("{:.1}", bar.height)}
                            fill={bar.color} />
                        <text x={format!("{:.1}", x + bar_width / 2.0)} y={format!("{:.1}", y - 6.0)}
                            text-anchor="middle" fill="currentColor">
                            { bar.count.to_string() }
                        </text>
                        <text x={format!("{:.1}", x + bar_width / 2.0)} y={format!("{:.1}", BAR_BASELINE + 18.0)}
                            text-anchor="middle" fill="currentColor">
                            { bar.label.to_string() }
                        </text>
                    </g>
                }
            })}
            <text x="4" y="12" fill="currentColor">{"Count"}</text>
            <text x={format!("{:.1}", BAR_WIDTH / 2.0)} y={format!("{:.1}", BAR_HEIGHT - 6.0)}
                text-anchor="middle" fill="currentColor">
                {"Prediction"}
            </text>
        </svg>
    }
}
