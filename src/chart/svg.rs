use std::fmt::Write;

use crate::format::escape_xml;

use super::surface::{Mark, Point, Surface};
use super::tooltip::tooltip_text;

/// Writes marks out as SVG elements.
pub struct SvgSurface {
    width: f64,
    height: f64,
    stylesheet: Option<String>,
    body: String,
    depth: usize,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            stylesheet: None,
            body: String::new(),
            depth: 1,
        }
    }

    /// Embed a `<style>` block, for SVG files viewed outside the report page.
    pub fn with_stylesheet(mut self, css: String) -> Self {
        self.stylesheet = Some(css);
        self
    }

    pub fn finish(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" font-family="sans-serif" font-size="11">
"#,
            num(self.width),
            num(self.height)
        );
        if let Some(css) = &self.stylesheet {
            let _ = writeln!(svg, "  <style>\n{css}  </style>");
        }
        svg.push_str(&self.body);
        // Close groups a caller left open.
        for _ in 1..self.depth {
            svg.push_str("</g>\n");
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.body.push_str("  ");
        }
    }
}

impl Surface for SvgSurface {
    fn draw(&mut self, mark: Mark) {
        match mark {
            Mark::GroupEnd => {
                if self.depth > 1 {
                    self.depth -= 1;
                    self.indent();
                    self.body.push_str("</g>\n");
                }
                return;
            }
            _ => self.indent(),
        }

        let out = &mut self.body;
        match mark {
            Mark::GroupStart { class, offset } => {
                let _ = write!(out, r#"<g class="{}""#, escape_xml(&class));
                if let Some(p) = offset {
                    let _ = write!(out, r#" transform="translate({},{})""#, num(p.x), num(p.y));
                }
                out.push_str(">\n");
                self.depth += 1;
            }
            Mark::Line { from, to, class } => {
                let _ = writeln!(
                    out,
                    r#"<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                    escape_xml(&class),
                    num(from.x),
                    num(from.y),
                    num(to.x),
                    num(to.y)
                );
            }
            Mark::Path {
                points,
                class,
                stroke,
                title,
            } => {
                let _ = write!(
                    out,
                    r#"<path class="{}" d="{}""#,
                    escape_xml(&class),
                    path_data(&points)
                );
                if let Some(color) = stroke {
                    let _ = write!(out, r#" stroke="{}""#, escape_xml(&color));
                }
                match title {
                    Some(t) => {
                        let _ = writeln!(out, "><title>{}</title></path>", escape_xml(&t));
                    }
                    None => out.push_str("/>\n"),
                }
            }
            Mark::Circle {
                center,
                radius,
                class,
                tooltip,
            } => {
                let _ = write!(
                    out,
                    r#"<circle class="{}" cx="{}" cy="{}" r="{}""#,
                    escape_xml(&class),
                    num(center.x),
                    num(center.y),
                    num(radius)
                );
                if tooltip.is_empty() {
                    out.push_str("/>\n");
                } else {
                    let _ = writeln!(
                        out,
                        "><title>{}</title></circle>",
                        escape_xml(&tooltip_text(&tooltip))
                    );
                }
            }
            Mark::Rect {
                origin,
                width,
                height,
                class,
                id,
                hidden,
            } => {
                let _ = write!(out, r#"<rect class="{}""#, escape_xml(&class));
                if let Some(id) = id {
                    let _ = write!(out, r#" id="{}""#, escape_xml(&id));
                }
                let _ = write!(
                    out,
                    r#" x="{}" y="{}" width="{}" height="{}""#,
                    num(origin.x),
                    num(origin.y),
                    num(width),
                    num(height)
                );
                if hidden {
                    out.push_str(r#" style="display:none""#);
                }
                out.push_str("/>\n");
            }
            Mark::Text {
                at,
                text,
                class,
                anchor,
                rotated,
            } => {
                let _ = write!(
                    out,
                    r#"<text class="{}" x="{}" y="{}" text-anchor="{}" dy=".35em""#,
                    escape_xml(&class),
                    num(at.x),
                    num(at.y),
                    anchor.as_svg()
                );
                if rotated {
                    out.push_str(r#" transform="rotate(-90)""#);
                }
                let _ = writeln!(out, ">{}</text>", escape_xml(&text));
            }
            Mark::GroupEnd => {}
        }
    }
}

/// `M x,y L x,y ...`; empty for no points.
pub fn path_data(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            d.push(' ');
        }
        let _ = write!(d, "{cmd}{},{}", num(p.x), num(p.y));
    }
    d
}

/// Coordinates with at most two decimals and no trailing zeros.
pub fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}
