use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, MarkerShape, Plot, PlotPoints,
    Points,
};

use crate::data::stats::{FiveNumber, Histogram};

const PLOT_HEIGHT: f32 = 260.0;

/// Non-interactive plot frame shared by all charts (keeps page scrolling usable).
fn base_plot(id: &str) -> Plot<'static> {
    Plot::new(id.to_owned())
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Category bars
// ---------------------------------------------------------------------------

/// One bar per labelled value; labels become x-axis ticks.
pub fn category_bars(ui: &mut Ui, id: &str, bars: &[(String, f64)], colors: &[Color32], y_label: &str) {
    let labels: Vec<String> = bars.iter().map(|(l, _)| l.clone()).collect();
    let chart_bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value)
                .name(label)
                .width(0.7)
                .fill(colors.get(i).copied().unwrap_or(Color32::LIGHT_BLUE))
        })
        .collect();

    base_plot(id)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(chart_bars));
        });
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

pub fn histogram(ui: &mut Ui, id: &str, hist: &Histogram, x_label: &str) {
    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &n)| Bar::new(hist.bin_center(i), n as f64).width(hist.width))
        .collect();

    base_plot(id)
        .x_axis_label(x_label)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(90, 140, 220)));
        });
}

pub fn box_plot(ui: &mut Ui, id: &str, summary: &FiveNumber, label: &str) {
    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(
            summary.lower_whisker,
            summary.q1,
            summary.median,
            summary.q3,
            summary.upper_whisker,
        ),
    )
    .name(label)
    .box_width(0.5);

    base_plot(id)
        .y_axis_label(label)
        .show_x(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).color(Color32::from_rgb(90, 140, 220)));
        });
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// A named, coloured point cloud.
pub struct Series {
    pub name: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

pub fn scatter(ui: &mut Ui, id: &str, series: Vec<Series>, x_label: &str, y_label: &str) {
    Plot::new(id.to_owned())
        .height(PLOT_HEIGHT + 80.0)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for s in series {
                plot_ui.points(
                    Points::new(PlotPoints::from(s.points))
                        .name(s.name)
                        .color(s.color)
                        .radius(1.5),
                );
            }
        });
}

/// Lines with markers over categorical x positions `0..labels.len()`.
pub fn trend(ui: &mut Ui, id: &str, series: Vec<Series>, labels: Vec<String>, y_label: &str) {
    base_plot(id)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for s in series {
                plot_ui.line(
                    Line::new(PlotPoints::from(s.points.clone()))
                        .name(&s.name)
                        .color(s.color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(s.points))
                        .name(&s.name)
                        .color(s.color)
                        .shape(MarkerShape::Circle)
                        .radius(4.0),
                );
            }
        });
}
