//! Rendering of the active layout.
//!
//! Geometry and history live in one place; renderers only draw. A
//! [`RenderAdapter`] receives one frame at a time from [`render_layout`]:
//! - `begin_frame` with the layout boundary and optional grid
//! - `draw_element` for every element (live gesture preview substituted)
//! - `draw_handles` for the selected element
//! - `finish` to produce the output
//!
//! [`RasterRenderer`] draws into a `tiny_skia::Pixmap`; the SVG adapter
//! lives in [`crate::svg_renderer`].

use floorkit_settings::GridSettings;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::interaction::{HandleSet, InteractionController};
use crate::layout_store::LayoutStore;
use crate::model::{Element, ElementStatus};

/// RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, alpha dropped
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }

    fn to_skia(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

pub const BACKGROUND: Rgba = Rgba::new(250, 250, 250, 255);
pub const GRID_LINE: Rgba = Rgba::new(224, 224, 224, 255);
pub const OUTLINE: Rgba = Rgba::new(44, 62, 80, 255);
pub const SELECTION: Rgba = Rgba::new(255, 193, 7, 255);
pub const HANDLE_FILL: Rgba = Rgba::new(255, 255, 255, 255);

/// Fill colour for a leasing status
pub fn status_color(status: ElementStatus) -> Rgba {
    match status {
        ElementStatus::Available => Rgba::new(46, 204, 113, 200),
        ElementStatus::Reserved => Rgba::new(243, 156, 18, 200),
        ElementStatus::Occupied => Rgba::new(52, 152, 219, 200),
        ElementStatus::ExpiringSoon => Rgba::new(231, 76, 60, 200),
        ElementStatus::Inactive => Rgba::new(149, 165, 166, 200),
    }
}

/// How one element is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub fill: Rgba,
    pub stroke: Rgba,
    pub stroke_width: f64,
    pub selected: bool,
}

impl ElementStyle {
    pub fn for_element(element: &Element, selected: bool) -> Self {
        Self {
            fill: status_color(element.status),
            stroke: if selected { SELECTION } else { OUTLINE },
            stroke_width: if selected { 2.0 } else { 1.0 },
            selected,
        }
    }
}

/// Drawing backend for a layout frame
pub trait RenderAdapter {
    type Output;

    fn begin_frame(&mut self, width: f64, height: f64, grid_px: Option<f64>);

    fn draw_element(&mut self, element: &Element, style: &ElementStyle);

    fn draw_handles(&mut self, handles: &HandleSet, handle_size: f64);

    fn finish(self) -> Self::Output;
}

/// Draw the store's active layout through `adapter`
pub fn render_layout<R: RenderAdapter>(
    store: &LayoutStore,
    controller: &InteractionController,
    mut adapter: R,
) -> R::Output {
    let layout = store.layout();
    let grid: &GridSettings = controller.grid();
    adapter.begin_frame(
        layout.boundary_width,
        layout.boundary_height,
        grid.visible.then_some(grid.size_px),
    );

    let preview = controller.preview();
    for element in &layout.elements {
        let shown = preview.filter(|p| p.id == element.id).unwrap_or(element);
        let style = ElementStyle::for_element(shown, store.is_selected(&element.id));
        adapter.draw_element(shown, &style);
    }

    if let Some(handles) = controller.handles(store) {
        adapter.draw_handles(&handles, controller.settings().handle_size);
    }

    adapter.finish()
}

/// Raster rendering failures
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Cannot allocate a {width}x{height} canvas")]
    InvalidCanvasSize { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Canvas-style raster adapter over `tiny_skia`
pub struct RasterRenderer {
    zoom: f32,
    pixmap: Option<Pixmap>,
    requested: (u32, u32),
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::with_zoom(1.0)
    }

    /// Render at `zoom` output pixels per layout pixel
    pub fn with_zoom(zoom: f32) -> Self {
        Self {
            zoom: if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 },
            pixmap: None,
            requested: (0, 0),
        }
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.zoom, self.zoom)
    }
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderAdapter for RasterRenderer {
    type Output = Result<Pixmap, RenderError>;

    fn begin_frame(&mut self, width: f64, height: f64, grid_px: Option<f64>) {
        let w = (width * self.zoom as f64).ceil().max(1.0) as u32;
        let h = (height * self.zoom as f64).ceil().max(1.0) as u32;
        self.requested = (w, h);
        self.pixmap = Pixmap::new(w, h);

        let transform = self.transform();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        pixmap.fill(BACKGROUND.to_skia());

        let Some(step) = grid_px.filter(|g| g.is_finite() && *g > 0.0) else {
            return;
        };
        let mut pb = PathBuilder::new();
        let mut x = step;
        while x < width {
            pb.move_to(x as f32, 0.0);
            pb.line_to(x as f32, height as f32);
            x += step;
        }
        let mut y = step;
        while y < height {
            pb.move_to(0.0, y as f32);
            pb.line_to(width as f32, y as f32);
            y += step;
        }
        if let Some(path) = pb.finish() {
            let mut paint = Paint::default();
            paint.set_color(GRID_LINE.to_skia());
            paint.anti_alias = false;
            let stroke = Stroke {
                width: 1.0 / self.zoom,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }

    fn draw_element(&mut self, element: &Element, style: &ElementStyle) {
        let base = self.transform();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(rect) = Rect::from_xywh(
            element.x as f32,
            element.y as f32,
            element.width as f32,
            element.height as f32,
        ) else {
            return;
        };
        let center = element.center();
        let transform = base.pre_concat(Transform::from_rotate_at(
            element.rotation_degrees as f32,
            center.x as f32,
            center.y as f32,
        ));
        let path = PathBuilder::from_rect(rect);

        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color(style.fill.to_skia());
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);

        paint.set_color(style.stroke.to_skia());
        let stroke = Stroke {
            width: style.stroke_width as f32,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    fn draw_handles(&mut self, handles: &HandleSet, handle_size: f64) {
        let transform = self.transform();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let half = (handle_size / 2.0) as f32;
        let mut fill = Paint::default();
        fill.set_color(HANDLE_FILL.to_skia());
        let mut outline = Paint::default();
        outline.set_color(SELECTION.to_skia());
        let stroke = Stroke::default();

        let mut stem = PathBuilder::new();
        stem.move_to(handles.rotate_anchor.x as f32, handles.rotate_anchor.y as f32);
        stem.line_to(handles.rotate.x as f32, handles.rotate.y as f32);
        if let Some(path) = stem.finish() {
            pixmap.stroke_path(&path, &outline, &stroke, transform, None);
        }

        for (_, p) in &handles.corners {
            if let Some(rect) =
                Rect::from_xywh(p.x as f32 - half, p.y as f32 - half, half * 2.0, half * 2.0)
            {
                let path = PathBuilder::from_rect(rect);
                pixmap.fill_path(&path, &fill, FillRule::Winding, transform, None);
                pixmap.stroke_path(&path, &outline, &stroke, transform, None);
            }
        }

        if let Some(path) =
            PathBuilder::from_circle(handles.rotate.x as f32, handles.rotate.y as f32, half)
        {
            pixmap.fill_path(&path, &fill, FillRule::Winding, transform, None);
            pixmap.stroke_path(&path, &outline, &stroke, transform, None);
        }
    }

    fn finish(self) -> Self::Output {
        let (width, height) = self.requested;
        self.pixmap
            .ok_or(RenderError::InvalidCanvasSize { width, height })
    }
}

/// Encode a rendered frame as PNG bytes
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors_are_distinct() {
        let statuses = [
            ElementStatus::Available,
            ElementStatus::Reserved,
            ElementStatus::Occupied,
            ElementStatus::ExpiringSoon,
            ElementStatus::Inactive,
        ];
        for (i, a) in statuses.iter().enumerate() {
            for b in &statuses[i + 1..] {
                assert_ne!(status_color(*a), status_color(*b));
            }
        }
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgba::new(255, 16, 0, 10).to_hex(), "#ff1000");
    }

    #[test]
    fn test_finish_without_frame_fails() {
        assert!(matches!(
            RasterRenderer::new().finish(),
            Err(RenderError::InvalidCanvasSize { .. })
        ));
    }
}
