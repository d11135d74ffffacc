//! SVG adapter for layout rendering
//! Builds a standalone SVG document string:
//! - Grid as a single path
//! - One rotated `<rect>` plus label per element
//! - Corner and rotate handles for the selection

use std::fmt::Write as _;

use crate::interaction::HandleSet;
use crate::model::Element;
use crate::renderer::{ElementStyle, RenderAdapter, BACKGROUND, GRID_LINE, HANDLE_FILL, SELECTION};

const MAX_GRID_LINES: usize = 2000;

#[derive(Debug, Default)]
pub struct SvgRenderer {
    header: String,
    body: String,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Grid lines as SVG path commands
pub fn render_grid(width: f64, height: f64, step: f64) -> String {
    let mut path = String::new();
    if !(step.is_finite() && step > 0.0) {
        return path;
    }

    let mut lines = 0;
    let mut x = step;
    while x < width && lines < MAX_GRID_LINES {
        let _ = write!(path, "M {} 0 L {} {} ", x, x, height);
        x += step;
        lines += 1;
    }
    let mut y = step;
    while y < height && lines < MAX_GRID_LINES {
        let _ = write!(path, "M 0 {} L {} {} ", y, width, y);
        y += step;
        lines += 1;
    }
    path.trim_end().to_string()
}

/// Escape text for use in SVG content and attributes
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl RenderAdapter for SvgRenderer {
    type Output = String;

    fn begin_frame(&mut self, width: f64, height: f64, grid_px: Option<f64>) {
        self.header = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        self.body.clear();
        let _ = write!(
            self.body,
            r#"<rect class="background" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            width,
            height,
            BACKGROUND.to_hex()
        );
        if let Some(step) = grid_px {
            let grid = render_grid(width, height, step);
            if !grid.is_empty() {
                let _ = write!(
                    self.body,
                    r#"<path class="grid" d="{}" stroke="{}" stroke-width="1" fill="none"/>"#,
                    grid,
                    GRID_LINE.to_hex()
                );
            }
        }
    }

    fn draw_element(&mut self, element: &Element, style: &ElementStyle) {
        let center = element.center();
        let _ = write!(
            self.body,
            r#"<g class="element" data-id="{id}" transform="rotate({r} {cx} {cy})">"#,
            id = escape_xml(&element.id),
            r = element.rotation_degrees,
            cx = center.x,
            cy = center.y
        );
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{:.2}" stroke="{}" stroke-width="{}"/>"#,
            element.x,
            element.y,
            element.width,
            element.height,
            style.fill.to_hex(),
            style.fill.opacity(),
            style.stroke.to_hex(),
            style.stroke_width
        );
        if !element.label.is_empty() {
            let _ = write!(
                self.body,
                r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="12">{}</text>"#,
                center.x,
                center.y,
                escape_xml(&element.label)
            );
        }
        self.body.push_str("</g>");
    }

    fn draw_handles(&mut self, handles: &HandleSet, handle_size: f64) {
        let half = handle_size / 2.0;
        let stroke = SELECTION.to_hex();
        let fill = HANDLE_FILL.to_hex();
        let _ = write!(
            self.body,
            r#"<line class="rotate-stem" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}"/>"#,
            handles.rotate_anchor.x, handles.rotate_anchor.y, handles.rotate.x, handles.rotate.y, stroke
        );
        for (handle, p) in &handles.corners {
            let _ = write!(
                self.body,
                r#"<rect class="handle" data-handle="{:?}" x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}"/>"#,
                handle,
                p.x - half,
                p.y - half,
                handle_size,
                handle_size,
                fill,
                stroke
            );
        }
        let _ = write!(
            self.body,
            r#"<circle class="rotate-handle" cx="{}" cy="{}" r="{}" fill="{}" stroke="{}"/>"#,
            handles.rotate.x, handles.rotate.y, half, fill, stroke
        );
    }

    fn finish(self) -> String {
        format!("{}{}</svg>", self.header, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_grid() {
        let path = render_grid(50.0, 30.0, 20.0);
        assert_eq!(path, "M 20 0 L 20 30 M 40 0 L 40 30 M 0 20 L 50 20");
        assert!(render_grid(50.0, 30.0, 0.0).is_empty());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("A&B <1>"), "A&amp;B &lt;1&gt;");
    }
}
