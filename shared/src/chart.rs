//! SVG geometry for the proportion (pie) and count (bar) charts.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::PredictionLabel;
use crate::report::{LabelCount, Proportion};

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: PredictionLabel,
    pub color: &'static str,
    /// SVG path `d` attribute.
    pub path: String,
    pub text_x: f64,
    pub text_y: f64,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: PredictionLabel,
    pub color: &'static str,
    pub count: usize,
    pub height: f64,
}

/// Slices start at twelve o'clock and run counter-clockwise, in the order given.
pub fn pie_slices(proportions: &[Proportion], cx: f64, cy: f64, radius: f64) -> Vec<PieSlice> {
    let mut start = FRAC_PI_2;
    let mut slices = Vec::with_capacity(proportions.len());

    for p in proportions {
        let sweep = p.percent / 100.0 * TAU;
        let mid = start + sweep / 2.0;
        let (text_x, text_y) = point(cx, cy, radius * 0.6, mid);

        let path = if sweep >= TAU - 1e-9 {
            full_circle(cx, cy, radius)
        } else {
            let (x0, y0) = point(cx, cy, radius, start);
            let (x1, y1) = point(cx, cy, radius, start + sweep);
            let large_arc = if sweep > PI { 1 } else { 0 };
            format!(
                "M {cx:.3} {cy:.3} L {x0:.3} {y0:.3} A {radius:.3} {radius:.3} 0 {large_arc} 0 {x1:.3} {y1:.3} Z"
            )
        };

        slices.push(PieSlice {
            label: p.label,
            color: p.label.color(),
            path,
            text_x,
            text_y,
            display: p.display.clone(),
        });
        start += sweep;
    }

    slices
}

/// Heights are scaled so the largest count fills `max_height`.
pub fn bars(distribution: &[LabelCount], max_height: f64) -> Vec<Bar> {
    let max = distribution.iter().map(|c| c.count).max().unwrap_or(0);

    distribution
        .iter()
        .map(|c| Bar {
            label: c.label,
            color: c.label.color(),
            count: c.count,
            height: if max == 0 {
                0.0
            } else {
                c.count as f64 / max as f64 * max_height
            },
        })
        .collect()
}

fn point(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    // SVG y grows downwards.
    (cx + r * angle.cos(), cy - r * angle.sin())
}

fn full_circle(cx: f64, cy: f64, r: f64) -> String {
    let top = cy - r;
    let bottom = cy + r;
    format!("M {cx:.3} {top:.3} A {r:.3} {r:.3} 0 1 0 {cx:.3} {bottom:.3} A {r:.3} {r:.3} 0 1 0 {cx:.3} {top:.3} Z")
}
