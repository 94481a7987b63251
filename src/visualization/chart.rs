//! SVG line chart

use std::fmt::Write;

/// Pixel margins around the plot area
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TICKS: usize = 5;

/// A single-series line chart
#[derive(Debug, Clone)]
pub struct LineChart<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub legend: &'a str,
    pub width: u32,
    pub height: u32,
}

impl<'a> LineChart<'a> {
    /// Render `points` as an SVG document
    pub fn to_svg(&self, points: &[(f64, f64)]) -> String {
        let width = self.width as f64;
        let height = self.height as f64;
        let plot_w = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_h = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);

        let (x_min, x_max) = padded_bounds(points.iter().map(|p| p.0), 0.0);
        let (y_min, y_max) = padded_bounds(points.iter().map(|p| p.1), 0.05);

        let sx = |x: f64| MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
        let sy = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / (y_max - y_min) * plot_h;

        let mut svg = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="24" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
            width / 2.0,
            escape(self.title)
        );

        // Axes
        let _ = writeln!(
            svg,
            r#"<line x1="{x0}" y1="{y1}" x2="{x1}" y2="{y1}" stroke="black"/>"#,
            x0 = MARGIN_LEFT,
            x1 = MARGIN_LEFT + plot_w,
            y1 = MARGIN_TOP + plot_h
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{x0}" y1="{y0}" x2="{x0}" y2="{y1}" stroke="black"/>"#,
            x0 = MARGIN_LEFT,
            y0 = MARGIN_TOP,
            y1 = MARGIN_TOP + plot_h
        );

        // Ticks
        for i in 0..=TICKS {
            let t = i as f64 / TICKS as f64;
            let xv = x_min + t * (x_max - x_min);
            let yv = y_min + t * (y_max - y_min);
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="11">{}</text>"#,
                sx(xv),
                MARGIN_TOP + plot_h + 16.0,
                format_tick(xv)
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="11">{}</text>"#,
                MARGIN_LEFT - 6.0,
                sy(yv) + 4.0,
                format_tick(yv)
            );
        }

        // Axis labels
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="13">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            height - 10.0,
            escape(self.x_label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{y:.1}" text-anchor="middle" font-family="sans-serif" font-size="13" transform="rotate(-90 16 {y:.1})">{label}</text>"#,
            y = MARGIN_TOP + plot_h / 2.0,
            label = escape(self.y_label)
        );

        // Series
        let coords: Vec<String> = points
            .iter()
            .map(|&(x, y)| format!("{:.2},{:.2}", sx(x), sy(y)))
            .collect();
        let _ = writeln!(
            svg,
            r##"<polyline fill="none" stroke="#1f77b4" stroke-width="1.5" points="{}"/>"##,
            coords.join(" ")
        );

        // Legend
        let lx = MARGIN_LEFT + plot_w - 180.0;
        let ly = MARGIN_TOP + 12.0;
        let _ = writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#1f77b4" stroke-width="2"/>"##,
            lx,
            ly,
            lx + 20.0,
            ly
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11">{}</text>"#,
            lx + 26.0,
            ly + 4.0,
            escape(self.legend)
        );

        svg.push_str("</svg>\n");
        svg
    }
}

/// Min/max of `values`, widened by `pad` of the span. A zero span is widened
/// so the scale stays finite.
fn padded_bounds(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        let half = (min.abs() * 0.05).max(0.5);
        return (min - half, max + half);
    }
    (min - span * pad, max + span * pad)
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 100.0 || v.fract().abs() < 1e-9 {
        format!("{:.0}", v)
    } else if v.abs() >= 1.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.3}", v)
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> LineChart<'static> {
        LineChart {
            title: "NAS Stability",
            x_label: "Iteration",
            y_label: "Stability Variance",
            legend: "Stability (Variance)",
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn test_svg_contains_labels() {
        let svg = chart().to_svg(&[(0.0, 0.03), (1.0, 0.04), (2.0, 0.025)]);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("NAS Stability"));
        assert!(svg.contains("Iteration"));
        assert!(svg.contains("Stability Variance"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn test_single_point_is_finite() {
        let svg = chart().to_svg(&[(0.0, 91.9)]);
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_padded_bounds() {
        let (lo, hi) = padded_bounds([1.0, 3.0].into_iter(), 0.0);
        assert_eq!((lo, hi), (1.0, 3.0));

        let (lo, hi) = padded_bounds([5.0].into_iter(), 0.0);
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
