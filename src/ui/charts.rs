use std::collections::BTreeMap;

use eframe::egui::{self, Color32, Sense, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{generate_palette, risk_color, CategoryColors};
use crate::state::{AppState, DashboardView};

// ---------------------------------------------------------------------------
// Central panel – the dashboard page
// ---------------------------------------------------------------------------

/// Render the full dashboard for the selected state: title, trend line,
/// risk bars, cluster scatter, age pie, high-risk table. Every section
/// tolerates empty input and renders an empty chart instead of failing.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let (view, selected) = match (&state.view, &state.selected_state) {
        (Some(view), Some(selected)) => (view, selected.as_str()),
        _ => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a data folder to view enrolment analytics  (File → Open…)");
            });
            return;
        }
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Aadhaar Enrolment Intelligence Dashboard");
            ui.label(
                "Advanced analytics-driven insights for coverage, stability, and risk prioritization.",
            );
            ui.add_space(12.0);

            ui.strong(format!("Monthly Enrolment Trend ({selected})"));
            trend_chart(ui, view);
            ui.add_space(12.0);

            ui.strong("District Risk Distribution");
            risk_chart(ui, view);
            ui.add_space(12.0);

            ui.strong("District Behaviour Clusters");
            cluster_chart(ui, view, &state.cluster_colors);
            ui.add_space(12.0);

            ui.strong("Age-wise Enrolment Composition");
            age_pie(ui, view);
            ui.add_space(12.0);

            ui.heading("High-Risk Districts");
            ui.add_space(4.0);
            high_risk_table(ui, view);
            ui.add_space(12.0);
        });
}

// ---------------------------------------------------------------------------
// Monthly trend line
// ---------------------------------------------------------------------------

/// Trend points sit at their ordinal position with `year-month` tick labels
/// so a state spanning a year boundary still draws one continuous line.
fn trend_chart(ui: &mut Ui, view: &DashboardView) {
    let labels: Vec<String> = view
        .trend
        .iter()
        .map(|p| format!("{}-{:02}", p.year, p.month))
        .collect();

    let points: PlotPoints = view
        .trend
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.total_enrolments as f64])
        .collect();

    Plot::new("monthly_trend")
        .height(260.0)
        .x_axis_label("Month")
        .y_axis_label("Enrolments")
        .x_axis_formatter(move |mark, _range| ordinal_label(&labels, mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("enrolments")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
        });
}

// ---------------------------------------------------------------------------
// Risk distribution bars
// ---------------------------------------------------------------------------

fn risk_chart(ui: &mut Ui, view: &DashboardView) {
    let labels: Vec<String> = view.risk.iter().map(|c| c.level.to_string()).collect();

    let bars: Vec<Bar> = view
        .risk
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.count as f64)
                .name(c.level.label())
                .fill(risk_color(c.level))
                .width(0.6)
        })
        .collect();

    Plot::new("risk_distribution")
        .height(260.0)
        .x_axis_label("Risk Level")
        .y_axis_label("District Count")
        .x_axis_formatter(move |mark, _range| ordinal_label(&labels, mark.value))
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Cluster scatter
// ---------------------------------------------------------------------------

fn cluster_chart(ui: &mut Ui, view: &DashboardView, colors: &CategoryColors) {
    // One series per cluster so the legend lists clusters, not districts.
    let mut by_cluster: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for r in &view.clusters {
        by_cluster
            .entry(r.cluster.as_str())
            .or_default()
            .push([r.mean_enrolments, r.volatility]);
    }

    // Lookup table for hover labels: nearest point names its district.
    let districts: Vec<(f64, f64, String)> = view
        .clusters
        .iter()
        .map(|r| (r.mean_enrolments, r.volatility, r.district.clone()))
        .collect();
    let x_span = axis_span(districts.iter().map(|d| d.0));
    let y_span = axis_span(districts.iter().map(|d| d.1));

    Plot::new("district_clusters")
        .height(300.0)
        .legend(Legend::default())
        .x_axis_label("Mean Enrolments")
        .y_axis_label("Volatility")
        .label_formatter(move |name, value| {
            let nearest = districts
                .iter()
                .map(|(x, y, district)| {
                    let dx = (x - value.x) / x_span;
                    let dy = (y - value.y) / y_span;
                    (dx * dx + dy * dy, district)
                })
                .min_by(|a, b| a.0.total_cmp(&b.0));
            match nearest {
                // Within ~3% of the axis span counts as pointing at the marker.
                Some((d2, district)) if d2 < 0.001 => {
                    format!("{district}\n{:.1}, {:.3}", value.x, value.y)
                }
                _ if !name.is_empty() => format!("{name}\n{:.1}, {:.3}", value.x, value.y),
                _ => format!("{:.1}, {:.3}", value.x, value.y),
            }
        })
        .show(ui, |plot_ui| {
            for (cluster, pts) in by_cluster {
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .name(format!("cluster {cluster}"))
                        .color(colors.color_for(cluster))
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Age composition pie
// ---------------------------------------------------------------------------

/// `egui_plot` has no pie primitive, so the slices are tessellated into a
/// mesh and drawn with the painter directly.
fn age_pie(ui: &mut Ui, view: &DashboardView) {
    let total: i64 = view.ages.iter().map(|s| s.enrolments).sum();
    if view.ages.is_empty() || total <= 0 {
        ui.label("No age composition data for this state.");
        return;
    }

    let palette = generate_palette(view.ages.len());

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(220.0), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.5 - 4.0;

        let mut mesh = egui::epaint::Mesh::default();
        let mut angle = -std::f32::consts::FRAC_PI_2; // start at 12 o'clock
        for (slice, color) in view.ages.iter().zip(&palette) {
            let sweep = (slice.enrolments as f32 / total as f32) * std::f32::consts::TAU;
            // Subdivide the arc so wide slices stay round.
            let steps = (sweep / 0.05).ceil().max(1.0) as usize;
            for step in 0..steps {
                let a0 = angle + sweep * step as f32 / steps as f32;
                let a1 = angle + sweep * (step + 1) as f32 / steps as f32;
                let base = mesh.vertices.len() as u32;
                mesh.colored_vertex(center, *color);
                mesh.colored_vertex(center + radius * Vec2::angled(a0), *color);
                mesh.colored_vertex(center + radius * Vec2::angled(a1), *color);
                mesh.add_triangle(base, base + 1, base + 2);
            }
            angle += sweep;
        }
        painter.add(egui::Shape::mesh(mesh));

        ui.add_space(12.0);
        ui.vertical(|ui: &mut Ui| {
            for (slice, color) in view.ages.iter().zip(&palette) {
                let pct = 100.0 * slice.enrolments as f64 / total as f64;
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, swatch_painter) =
                        ui.allocate_painter(Vec2::splat(12.0), Sense::hover());
                    swatch_painter.rect_filled(swatch.rect, 2.0, *color);
                    ui.label(format!(
                        "{}: {} ({pct:.1}%)",
                        slice.group.label(),
                        slice.enrolments
                    ));
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// High-risk detail table
// ---------------------------------------------------------------------------

fn high_risk_table(ui: &mut Ui, view: &DashboardView) {
    if view.high_risk.is_empty() {
        ui.label("No high-risk districts for this state.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(130.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("District");
            });
            header.col(|ui| {
                ui.strong("Mean Enrolments");
            });
            header.col(|ui| {
                ui.strong("Volatility");
            });
            header.col(|ui| {
                ui.strong("Risk Score");
            });
        })
        .body(|mut body| {
            for row in &view.high_risk {
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(&row.district);
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.1}", row.mean_enrolments));
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.3}", row.volatility));
                    });
                    table_row.col(|ui| {
                        ui.label(format!("{:.3}", row.risk_score));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Tick label for a categorical axis: the label at the integer position,
/// nothing for fractional grid marks.
fn ordinal_label(labels: &[String], value: f64) -> String {
    let i = value.round();
    if (value - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

/// Non-zero span of an axis, for scale-independent hover distances.
fn axis_span(values: impl Iterator<Item = f64>) -> f64 {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || max - min <= f64::EPSILON {
        1.0
    } else {
        max - min
    }
}
