use log::Level::Info;
use std::f64::consts::{FRAC_PI_2, TAU};

use super::ChartRenderer;
use crate::decor_log;
use crate::theme::ColorTriad;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSlice {
    pub name: &'static str,
    pub value: u32,
}

/// Share of page visitors per theme, shown in the donut chart.
pub const THEME_USAGE: [UsageSlice; 4] = [
    UsageSlice { name: "Default", value: 45 },
    UsageSlice { name: "Dark", value: 30 },
    UsageSlice { name: "Neon", value: 15 },
    UsageSlice { name: "Custom", value: 10 },
];

const FALLBACK_FILL: &str = "#aaaaaa";
const DEFAULT_HEIGHT: f64 = 300.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub name: &'static str,
    /// Radians clockwise from 12 o'clock.
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub fill: String,
    pub label: String,
    /// Label anchor relative to the chart center.
    pub label_position: (f64, f64),
}

/// Lays out a donut chart: slices in dataset order, fills cycling through
/// primary, secondary, accent and a neutral gray.
pub fn donut_layout(
    dataset: &[UsageSlice],
    colors: &ColorTriad,
    width: f64,
    height: f64,
) -> Vec<ArcSegment> {
    let height = if height > 0.0 { height } else { DEFAULT_HEIGHT };
    let radius = width.min(height) / 2.0;
    let inner_radius = radius * 0.5;
    let outer_radius = radius * 0.8;
    let fills = [
        colors.primary.as_str(),
        colors.secondary.as_str(),
        colors.accent.as_str(),
        FALLBACK_FILL,
    ];

    let total: u32 = dataset.iter().map(|slice| slice.value).sum();
    let mut angle = 0.0;
    dataset
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            let sweep = if total == 0 {
                0.0
            } else {
                TAU * f64::from(slice.value) / f64::from(total)
            };
            let start_angle = angle;
            let end_angle = angle + sweep;
            angle = end_angle;

            let mid = (start_angle + end_angle) / 2.0 - FRAC_PI_2;
            let r = (inner_radius + outer_radius) / 2.0;
            ArcSegment {
                name: slice.name,
                start_angle,
                end_angle,
                inner_radius,
                outer_radius,
                fill: fills[i % fills.len()].to_string(),
                label: format!("{}%", slice.value),
                label_position: (mid.cos() * r, mid.sin() * r),
            }
        })
        .collect()
}

/// Chart surface that keeps the last laid-out segments.
#[derive(Debug, Clone, Default)]
pub struct DonutChart {
    width: f64,
    height: f64,
    segments: Vec<ArcSegment>,
}

impl DonutChart {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[ArcSegment] {
        &self.segments
    }
}

impl ChartRenderer for DonutChart {
    fn render(&mut self, dataset: &[UsageSlice], colors: &ColorTriad) {
        self.segments = donut_layout(dataset, colors, self.width, self.height);
        decor_log!(Info, "Rendered usage chart with {} slices", self.segments.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> ColorTriad {
        ColorTriad {
            primary: "#bb86fc".to_string(),
            secondary: "#03dac6".to_string(),
            accent: "#cf6679".to_string(),
        }
    }

    #[test]
    fn slices_cover_the_full_circle_in_order() {
        let segments = donut_layout(&THEME_USAGE, &colors(), 400.0, 300.0);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].start_angle, 0.0);
        assert!((segments[3].end_angle - TAU).abs() < 1e-9);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
        assert!((segments[0].end_angle - TAU * 0.45).abs() < 1e-9);
    }

    #[test]
    fn radii_follow_the_smaller_dimension() {
        let segments = donut_layout(&THEME_USAGE, &colors(), 400.0, 300.0);
        assert_eq!(segments[0].inner_radius, 75.0);
        assert_eq!(segments[0].outer_radius, 120.0);

        let segments = donut_layout(&THEME_USAGE, &colors(), 500.0, 0.0);
        assert_eq!(segments[0].outer_radius, 120.0);
    }

    #[test]
    fn fills_and_labels() {
        let segments = donut_layout(&THEME_USAGE, &colors(), 400.0, 400.0);
        let fills: Vec<&str> = segments.iter().map(|s| s.fill.as_str()).collect();
        assert_eq!(fills, vec!["#bb86fc", "#03dac6", "#cf6679", "#aaaaaa"]);
        assert_eq!(segments[1].label, "30%");
        // First slice spans 0..0.9π, so its centroid sits right of center.
        assert!(segments[0].label_position.0 > 0.0);
    }

    #[test]
    fn empty_totals_collapse_to_zero_sweep() {
        let dataset = [UsageSlice { name: "None", value: 0 }];
        let segments = donut_layout(&dataset, &colors(), 200.0, 200.0);
        assert_eq!(segments[0].start_angle, segments[0].end_angle);
    }

    #[test]
    fn chart_keeps_its_layout_until_rendered_again() {
        let mut chart = DonutChart::new(400.0, 300.0);
        chart.render(&THEME_USAGE, &colors());
        let first = chart.segments().to_vec();
        assert_eq!(first.len(), 4);
        assert_eq!(chart.segments(), first.as_slice());
    }
}
