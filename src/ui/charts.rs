use eframe::egui::{self, Align2, Color32, FontId, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use crate::color;
use crate::data::stats::{self, BoxStats};

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Vertical bar chart with one bar per labelled category.
pub fn bar_chart(ui: &mut Ui, id: &str, entries: &[(String, f64)], color: Color32, y_label: &str) {
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, value))| Bar::new(i as f64, *value).name(label).width(0.6))
        .collect();
    let labels: Vec<String> = entries.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

/// Horizontal bar chart; categories run down the y axis, the first entry
/// on top.
pub fn horizontal_bar_chart(
    ui: &mut Ui,
    id: &str,
    entries: &[(String, f64)],
    color: Color32,
    x_label: &str,
) {
    let n = entries.len();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, value))| Bar::new((n - 1 - i) as f64, *value).name(label).width(0.6))
        .collect();
    let labels: Vec<String> = entries.iter().rev().map(|(l, _)| l.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(color));
        });
}

fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Fixed-width histogram of `values` (25 bins in the dashboard).
pub fn histogram(ui: &mut Ui, id: &str, values: &[f64], bins: usize, color: Color32, x_label: &str) {
    let (binned, width) = stats::histogram(values, bins);
    let bars: Vec<Bar> = binned
        .iter()
        .map(|&(center, count)| Bar::new(center, count as f64).width(width * 0.95))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

// ---------------------------------------------------------------------------
// Scatter with trend line
// ---------------------------------------------------------------------------

/// Scatter plot of `[x, y]` points per named group, with a least-squares
/// trend line over all points when one exists.
pub fn scatter_with_trend(
    ui: &mut Ui,
    id: &str,
    groups: &[(String, Color32, Vec<[f64; 2]>)],
    x_label: &str,
    y_label: &str,
) {
    let all: Vec<[f64; 2]> = groups.iter().flat_map(|(_, _, pts)| pts.clone()).collect();
    let trend = stats::linear_fit(&all).and_then(|(slope, intercept)| {
        let xs: Vec<f64> = all.iter().map(|p| p[0]).collect();
        let (lo, hi) = (stats::min(&xs)?, stats::max(&xs)?);
        Some(vec![[lo, slope * lo + intercept], [hi, slope * hi + intercept]])
    });

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            for (name, color, pts) in groups {
                let points: PlotPoints = pts.iter().copied().collect();
                plot_ui.points(Points::new(points).name(name).color(*color).radius(2.5));
            }
            if let Some(seg) = trend {
                let line: PlotPoints = seg.into_iter().collect();
                plot_ui.line(Line::new(line).name("trend").color(color::LIGHT).width(1.5));
            }
        });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// One box per labelled group, positioned left to right.
pub fn box_plot(ui: &mut Ui, id: &str, groups: &[(String, BoxStats)], y_label: &str) {
    let elems: Vec<BoxElem> = groups
        .iter()
        .enumerate()
        .map(|(i, (label, b))| {
            BoxElem::new(
                i as f64,
                BoxSpread::new(b.min, b.q1, b.median, b.q3, b.max),
            )
            .name(label)
            .fill(color::ACCENT.gamma_multiply(0.5))
            .stroke(egui::Stroke::new(1.5, color::PRIMARY))
        })
        .collect();
    let labels: Vec<String> = groups.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Painter-drawn n×n correlation grid with the coefficient in each cell.
pub fn correlation_heatmap(ui: &mut Ui, labels: &[&str], matrix: &[Vec<f64>]) {
    let n = labels.len();
    let cell: f32 = 64.0;
    let label_w: f32 = 110.0;
    let label_h: f32 = 22.0;

    let size = Vec2::new(label_w + n as f32 * cell, label_h + n as f32 * cell);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let text_color = ui.visuals().text_color();

    for (j, label) in labels.iter().enumerate() {
        painter.text(
            origin + Vec2::new(label_w + (j as f32 + 0.5) * cell, label_h * 0.5),
            Align2::CENTER_CENTER,
            *label,
            FontId::proportional(12.0),
            text_color,
        );
    }

    for (i, row) in matrix.iter().enumerate() {
        painter.text(
            origin + Vec2::new(label_w - 6.0, label_h + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            labels[i],
            FontId::proportional(12.0),
            text_color,
        );
        for (j, &r) in row.iter().enumerate() {
            let min = origin + Vec2::new(label_w + j as f32 * cell + 1.0, label_h + i as f32 * cell + 1.0);
            let rect = egui::Rect::from_min_size(min, Vec2::splat(cell - 2.0));
            painter.rect_filled(rect, egui::CornerRadius::same(3), color::correlation_color(r));
            let shown = if r.is_nan() {
                "—".to_string()
            } else {
                format!("{r:.2}")
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                shown,
                FontId::proportional(11.0),
                Color32::WHITE,
            );
        }
    }
}
