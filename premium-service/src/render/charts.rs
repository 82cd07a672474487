//! Inline SVG charts.
//!
//! Both charts are rendered server-side as standalone `<svg>` elements so the
//! pages need no scripts or external assets.

use std::fmt::Write;

use super::format::{group_thousands, html_escape};
use crate::factors::{FactorImpact, ImpactLevel};

const FONT: &str = "font-family=\"Helvetica, Arial, sans-serif\"";
const AXIS_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#b0b0b0";

/// Series colours for line charts, in plotting order
pub const SERIES_COLORS: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];

struct Frame {
    width: f64,
    height: f64,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn plot_width(&self) -> f64 {
        self.width - self.left - self.right
    }

    fn plot_height(&self) -> f64 {
        self.height - self.top - self.bottom
    }

    fn open(&self, out: &mut String, title: &str) {
        let _ = write!(
            out,
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" role="img" aria-label="{t}">"##,
            w = self.width,
            h = self.height,
            t = html_escape(title),
        );
        let _ = write!(
            out,
            r##"<rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>"##,
            w = self.width,
            h = self.height,
        );
        let _ = write!(
            out,
            r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="20" {FONT}>{t}</text>"##,
            x = self.left + self.plot_width() / 2.0,
            y = self.top / 2.0 + 7.0,
            t = html_escape(title),
        );
    }

    fn axes(&self, out: &mut String) {
        let _ = write!(
            out,
            r##"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="none" stroke="{AXIS_COLOR}" stroke-width="1"/>"##,
            x = self.left,
            y = self.top,
            w = self.plot_width(),
            h = self.plot_height(),
        );
    }
}

/// Horizontal bar chart of factor impacts.
///
/// The x axis runs from 0 to 4 with ticks at the three impact scores; the
/// first factor is drawn at the bottom.
pub fn factor_impact_chart(factors: &[FactorImpact]) -> String {
    let frame = Frame {
        width: 1000.0,
        height: 400.0,
        left: 160.0,
        right: 30.0,
        top: 50.0,
        bottom: 50.0,
    };
    let x_max = 4.0;
    let scale_x = |v: f64| frame.left + v / x_max * frame.plot_width();

    let mut out = String::with_capacity(4 * 1024);
    frame.open(&mut out, "Impact of Factors on Your Premium");

    let band = frame.plot_height() / factors.len().max(1) as f64;
    let bar_height = band * 0.8;

    for (i, factor) in factors.iter().enumerate() {
        let band_top = frame.top + frame.plot_height() - band * (i as f64 + 1.0);
        let y = band_top + (band - bar_height) / 2.0;
        let width = scale_x(f64::from(factor.impact.score())) - frame.left;
        let _ = write!(
            out,
            r##"<rect class="bar" x="{x:.1}" y="{y:.1}" width="{width:.1}" height="{bar_height:.1}" fill="{color}"><title>{label}: {impact}</title></rect>"##,
            x = frame.left,
            color = factor.impact.color(),
            label = html_escape(factor.factor.label()),
            impact = factor.impact,
        );
        let _ = write!(
            out,
            r##"<text x="{x:.1}" y="{ty:.1}" text-anchor="end" font-size="14" {FONT}>{label}</text>"##,
            x = frame.left - 8.0,
            ty = band_top + band / 2.0 + 5.0,
            label = html_escape(factor.factor.label()),
        );
    }

    frame.axes(&mut out);

    for level in ImpactLevel::ALL {
        let x = scale_x(f64::from(level.score()));
        let axis_y = frame.top + frame.plot_height();
        let _ = write!(
            out,
            r##"<line x1="{x:.1}" y1="{axis_y:.1}" x2="{x:.1}" y2="{tick:.1}" stroke="{AXIS_COLOR}"/><text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="14" {FONT}>{label}</text>"##,
            tick = axis_y + 5.0,
            ty = axis_y + 22.0,
            label = level.label(),
        );
    }

    out.push_str("</svg>");
    out
}

/// One line on a [`LineChart`]
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_values: Vec<f64>,
    pub series: Vec<LineSeries>,
}

impl LineChart {
    /// Render with circle markers, a dashed grid and a legend in the top-left corner.
    pub fn to_svg(&self) -> String {
        let frame = Frame {
            width: 1000.0,
            height: 600.0,
            left: 100.0,
            right: 30.0,
            top: 50.0,
            bottom: 70.0,
        };

        let (x_min, x_max) = bounds(&self.x_values);
        let x_pad = (x_max - x_min) * 0.05;
        let (x_lo, x_hi) = (x_min - x_pad, x_max + x_pad);

        let y_max_data = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0_f64, f64::max);
        let y_step = nice_step(y_max_data);
        let y_hi = ((y_max_data * 1.05) / y_step).ceil().max(1.0) * y_step;

        let scale_x = |v: f64| frame.left + (v - x_lo) / (x_hi - x_lo) * frame.plot_width();
        let scale_y = |v: f64| frame.top + frame.plot_height() * (1.0 - v / y_hi);

        let mut out = String::with_capacity(8 * 1024);
        frame.open(&mut out, &self.title);

        // Grid and y ticks
        let mut tick = 0.0;
        while tick <= y_hi + f64::EPSILON {
            let y = scale_y(tick);
            let _ = write!(
                out,
                r##"<line class="grid" x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{GRID_COLOR}" stroke-dasharray="6 4" stroke-opacity="0.7"/><text x="{tx:.1}" y="{ty:.1}" text-anchor="end" font-size="13" {FONT}>{label}</text>"##,
                x1 = frame.left,
                x2 = frame.left + frame.plot_width(),
                tx = frame.left - 8.0,
                ty = y + 4.0,
                label = group_thousands(&format!("{tick:.0}")),
            );
            tick += y_step;
        }

        // Grid and x ticks
        for &x_value in &self.x_values {
            let x = scale_x(x_value);
            let axis_y = frame.top + frame.plot_height();
            let _ = write!(
                out,
                r##"<line class="grid" x1="{x:.1}" y1="{y1:.1}" x2="{x:.1}" y2="{axis_y:.1}" stroke="{GRID_COLOR}" stroke-dasharray="6 4" stroke-opacity="0.7"/><text x="{x:.1}" y="{ty:.1}" text-anchor="middle" font-size="13" {FONT}>{label}</text>"##,
                y1 = frame.top,
                ty = axis_y + 20.0,
                label = x_value,
            );
        }

        frame.axes(&mut out);

        for (i, series) in self.series.iter().enumerate() {
            let color = SERIES_COLORS[i % SERIES_COLORS.len()];
            let points: Vec<String> = self
                .x_values
                .iter()
                .zip(&series.values)
                .map(|(&x, &y)| format!("{:.1},{:.1}", scale_x(x), scale_y(y)))
                .collect();
            let _ = write!(
                out,
                r##"<polyline class="series" points="{points}" fill="none" stroke="{color}" stroke-width="2"/>"##,
                points = points.join(" "),
            );
            for (&x, &y) in self.x_values.iter().zip(&series.values) {
                let _ = write!(
                    out,
                    r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="5" fill="{color}"><title>{label}: {x}, {value}</title></circle>"##,
                    cx = scale_x(x),
                    cy = scale_y(y),
                    label = html_escape(&series.label),
                    value = group_thousands(&format!("{y:.0}")),
                );
            }
        }

        // Legend
        let legend_x = frame.left + 15.0;
        let legend_y = frame.top + 15.0;
        let _ = write!(
            out,
            r##"<rect x="{legend_x:.1}" y="{legend_y:.1}" width="150" height="{h:.1}" fill="#ffffff" fill-opacity="0.8" stroke="#cccccc"/>"##,
            h = 10.0 + 24.0 * self.series.len() as f64,
        );
        for (i, series) in self.series.iter().enumerate() {
            let color = SERIES_COLORS[i % SERIES_COLORS.len()];
            let y = legend_y + 22.0 + 24.0 * i as f64;
            let _ = write!(
                out,
                r##"<line x1="{x1:.1}" y1="{ly:.1}" x2="{x2:.1}" y2="{ly:.1}" stroke="{color}" stroke-width="2"/><circle cx="{cx:.1}" cy="{ly:.1}" r="4" fill="{color}"/><text x="{tx:.1}" y="{ty:.1}" font-size="13" {FONT}>{label}</text>"##,
                x1 = legend_x + 10.0,
                x2 = legend_x + 40.0,
                cx = legend_x + 25.0,
                ly = y - 4.0,
                tx = legend_x + 50.0,
                ty = y,
                label = html_escape(&series.label),
            );
        }

        // Axis labels
        let _ = write!(
            out,
            r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="15" {FONT}>{label}</text>"##,
            x = frame.left + frame.plot_width() / 2.0,
            y = frame.height - 20.0,
            label = html_escape(&self.x_label),
        );
        let _ = write!(
            out,
            r##"<text x="0" y="0" transform="translate(25 {cy:.1}) rotate(-90)" text-anchor="middle" font-size="15" {FONT}>{label}</text>"##,
            cy = frame.top + frame.plot_height() / 2.0,
            label = html_escape(&self.y_label),
        );

        out.push_str("</svg>");
        out
    }
}

fn bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() && max.is_finite() && max > min {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}

/// A 1/2/5 × 10ⁿ step giving roughly five to ten ticks up to `max`
fn nice_step(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let raw = max / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::Factor;

    #[test]
    fn factor_chart_draws_one_bar_per_factor() {
        let factors = vec![
            FactorImpact {
                factor: Factor::Age,
                impact: ImpactLevel::High,
            },
            FactorImpact {
                factor: Factor::InsurancePlan,
                impact: ImpactLevel::Low,
            },
        ];

        let svg = factor_impact_chart(&factors);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(r##"class="bar""##).count(), 2);
        assert!(svg.contains("Impact of Factors on Your Premium"));
        assert!(svg.contains("#F44336"));
        assert!(svg.contains("#4CAF50"));
        for tick in ["Low", "Medium", "High"] {
            assert!(svg.contains(&format!(">{tick}</text>")));
        }
    }

    #[test]
    fn bar_width_follows_score() {
        let high = factor_impact_chart(&[FactorImpact {
            factor: Factor::Age,
            impact: ImpactLevel::High,
        }]);
        // 3/4 of the 810px plot width
        assert!(high.contains(r##"width="607.5""##));
    }

    #[test]
    fn line_chart_has_series_and_legend() {
        let chart = LineChart {
            title: "Premiums".to_string(),
            x_label: "Age".to_string(),
            y_label: "Premium".to_string(),
            x_values: vec![20.0, 30.0, 40.0],
            series: vec![
                LineSeries {
                    label: "A".to_string(),
                    values: vec![1000.0, 2000.0, 3000.0],
                },
                LineSeries {
                    label: "B & C".to_string(),
                    values: vec![1500.0, 2500.0, 3500.0],
                },
            ],
        };

        let svg = chart.to_svg();
        assert_eq!(svg.matches(r##"class="series""##).count(), 2);
        assert_eq!(svg.matches("<circle").count(), 6 + 2);
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("B &amp; C"));
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(55_000.0), 10_000.0);
        assert_eq!(nice_step(6.0), 1.0);
        assert_eq!(nice_step(0.0), 1.0);
    }
}
