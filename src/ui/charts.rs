use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use super::{format_usd, CHART_HEIGHT};
use crate::color::{self, ColorMap};
use crate::data::aggregate::{DashboardSnapshot, TOP_ROLES};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(15.0));
}

fn empty_warning(ui: &mut Ui, what: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(format!("No data to show for {what}.")).color(Color32::YELLOW));
}

/// Category label for an integer grid mark, empty between categories.
fn category_label(labels: &[String], mark: &GridMark) -> String {
    let rounded = mark.value.round();
    if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

// ---------------------------------------------------------------------------
// Top roles – horizontal bars
// ---------------------------------------------------------------------------

/// Best-paid roles by mean salary; highest at the top.
pub fn top_roles_chart(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    chart_title(ui, &format!("Top {TOP_ROLES} roles by mean salary"));
    if snapshot.top_roles.is_empty() {
        empty_warning(ui, "the roles chart");
        return;
    }

    let (min, max) = value_range(snapshot.top_roles.iter().map(|r| r.mean_salary));
    let bars: Vec<Bar> = snapshot
        .top_roles
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.mean_salary)
                .width(0.7)
                .name(format!("{} ({})", r.role, format_usd(r.mean_salary)))
                .fill(color::sequential_in(r.mean_salary, min, max))
        })
        .collect();
    let labels: Vec<String> = snapshot.top_roles.iter().map(|r| r.role.clone()).collect();

    Plot::new("top_roles_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Mean annual salary (USD)")
        .y_axis_formatter(move |mark, _range| category_label(&labels, &mark))
        .include_x(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Salary histogram
// ---------------------------------------------------------------------------

pub fn salary_histogram_chart(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    chart_title(ui, "Annual salary distribution");
    if snapshot.histogram.is_empty() {
        empty_warning(ui, "the salary distribution");
        return;
    }

    let bars: Vec<Bar> = snapshot
        .histogram
        .iter()
        .map(|bin| {
            // A single zero-width bin still needs a visible bar.
            let width = if bin.width() > 0.0 {
                bin.width()
            } else {
                (bin.start.abs() * 0.05).max(1.0)
            };
            Bar::new(bin.center(), bin.count as f64)
                .width(width)
                .name(format!("{} – {}", format_usd(bin.start), format_usd(bin.end)))
                .fill(Color32::from_rgb(99, 110, 250))
        })
        .collect();

    Plot::new("salary_histogram_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Salary range (USD)")
        .y_axis_label("Records")
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Remote mode – donut
// ---------------------------------------------------------------------------

const DONUT_OUTER: f64 = 1.0;
const DONUT_INNER: f64 = 0.5;

/// Point on the circle of `radius` at `angle`, clockwise from twelve o'clock.
fn polar(radius: f64, angle: f64) -> [f64; 2] {
    [radius * angle.sin(), radius * angle.cos()]
}

/// Convex quads approximating one ring sector (a sector itself is not convex
/// and egui only fills convex polygons).
fn ring_sector(start: f64, end: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = (((end - start) / TAU) * 180.0).ceil().max(1.0) as usize;
    let step = (end - start) / steps as f64;
    (0..steps)
        .map(|i| {
            let a0 = start + step * i as f64;
            let a1 = a0 + step;
            vec![
                polar(DONUT_OUTER, a0),
                polar(DONUT_OUTER, a1),
                polar(DONUT_INNER, a1),
                polar(DONUT_INNER, a0),
            ]
        })
        .collect()
}

/// Share of each remote mode in the filtered records.
pub fn remote_mode_donut(ui: &mut Ui, snapshot: &DashboardSnapshot, colors: Option<&ColorMap>) {
    chart_title(ui, "Share of remote modes");
    let total: usize = snapshot.remote_modes.values().sum();
    if total == 0 {
        empty_warning(ui, "the remote modes chart");
        return;
    }

    let fallback = ColorMap::new(snapshot.remote_modes.keys().map(String::as_str));
    let colors = colors.unwrap_or(&fallback);

    Plot::new("remote_mode_plot")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (mode, &count) in &snapshot.remote_modes {
                let share = count as f64 / total as f64;
                let end = start + share * TAU;
                let fill = colors.color_for(mode);

                for quad in ring_sector(start, end) {
                    plot_ui.polygon(
                        Polygon::new(quad.into_iter().collect::<PlotPoints>())
                            .name(mode)
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, fill)),
                    );
                }

                let [x, y] = polar((DONUT_OUTER + DONUT_INNER) / 2.0, (start + end) / 2.0);
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(format!("{:.1}%\n{mode}", share * 100.0)).color(Color32::WHITE),
                ));
                start = end;
            }
        });
}

// ---------------------------------------------------------------------------
// Mean salary per country for the featured role
// ---------------------------------------------------------------------------

/// Per-country mean salary of the featured role, coloured on a sequential
/// ramp and sorted highest first.
pub fn country_chart(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    let role = &snapshot.featured_role;
    chart_title(ui, &format!("Mean salary of {role} by country"));
    if snapshot.country_means.is_empty() {
        empty_warning(ui, &format!("{role} by country"));
        return;
    }

    let mut countries: Vec<(&String, f64)> = snapshot
        .country_means
        .iter()
        .map(|(c, &m)| (c, m))
        .collect();
    countries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let (min, max) = value_range(countries.iter().map(|(_, m)| *m));
    let bars: Vec<Bar> = countries
        .iter()
        .enumerate()
        .map(|(i, (country, mean))| {
            Bar::new(i as f64, *mean)
                .width(0.8)
                .name(format!("{country} ({})", format_usd(*mean)))
                .fill(color::sequential_in(*mean, min, max))
        })
        .collect();
    let labels: Vec<String> = countries.iter().map(|(c, _)| (*c).clone()).collect();

    Plot::new("country_plot")
        .height(CHART_HEIGHT)
        .y_axis_label("Mean salary (USD)")
        .x_axis_formatter(move |mark, _range| category_label(&labels, &mark))
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label() {
        let labels = vec!["USA".to_string(), "BRA".to_string()];
        let mark = |value| GridMark { value, step_size: 1.0 };
        assert_eq!(category_label(&labels, &mark(0.0)), "USA");
        assert_eq!(category_label(&labels, &mark(1.0)), "BRA");
        assert_eq!(category_label(&labels, &mark(0.5)), "");
        assert_eq!(category_label(&labels, &mark(2.0)), "");
        assert_eq!(category_label(&labels, &mark(-1.0)), "");
    }

    #[test]
    fn test_ring_sector_stays_in_ring() {
        let quads = ring_sector(0.0, TAU / 4.0);
        assert!(!quads.is_empty());
        for quad in &quads {
            assert_eq!(quad.len(), 4);
            for [x, y] in quad {
                let r = (x * x + y * y).sqrt();
                assert!(r >= DONUT_INNER - 1e-9 && r <= DONUT_OUTER + 1e-9);
                assert!(*x >= -1e-9 && *y >= -1e-9);
            }
        }
    }
}
