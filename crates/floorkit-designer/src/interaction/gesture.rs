//! Gesture state machine: `Idle -> Dragging | Resizing | Rotating -> Idle`.
//!
//! Each active gesture keeps the element as it was at pointer-down
//! (`origin`) and the live `preview`. Moves only touch the preview; the
//! store is written once, when the gesture finishes.

use floorkit_core::units::snap;
use floorkit_settings::{GridSettings, InteractionSettings, RotationLimit};

use super::hit_test::ResizeHandle;
use crate::model::{Element, Point};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        origin: Element,
        start: Point,
        preview: Element,
    },
    Resizing {
        origin: Element,
        handle: ResizeHandle,
        start: Point,
        preview: Element,
    },
    Rotating {
        origin: Element,
        preview: Element,
    },
}

impl Gesture {
    pub fn drag(element: &Element, start: Point) -> Self {
        Gesture::Dragging {
            origin: element.clone(),
            start,
            preview: element.clone(),
        }
    }

    pub fn resize(element: &Element, handle: ResizeHandle, start: Point) -> Self {
        Gesture::Resizing {
            origin: element.clone(),
            handle,
            start,
            preview: element.clone(),
        }
    }

    pub fn rotate(element: &Element) -> Self {
        Gesture::Rotating {
            origin: element.clone(),
            preview: element.clone(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging { .. } => "drag",
            Gesture::Resizing { .. } => "resize",
            Gesture::Rotating { .. } => "rotate",
        }
    }

    /// Live element for the active gesture
    pub fn preview(&self) -> Option<&Element> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging { preview, .. }
            | Gesture::Resizing { preview, .. }
            | Gesture::Rotating { preview, .. } => Some(preview),
        }
    }

    /// Recompute the preview for a pointer position
    pub fn update(&mut self, point: Point, settings: &InteractionSettings) {
        match self {
            Gesture::Idle => {}
            Gesture::Dragging {
                origin,
                start,
                preview,
            } => {
                preview.x = origin.x + (point.x - start.x);
                preview.y = origin.y + (point.y - start.y);
            }
            Gesture::Resizing {
                origin,
                handle,
                start,
                preview,
            } => {
                // Pointer delta expressed along the element's own axes
                let (sin, cos) = origin.rotation_degrees.to_radians().sin_cos();
                let dx = point.x - start.x;
                let dy = point.y - start.y;
                let local_dx = dx * cos + dy * sin;
                let local_dy = -dx * sin + dy * cos;
                let (x, y, w, h) = resize_geometry(
                    origin,
                    *handle,
                    local_dx,
                    local_dy,
                    settings.min_width,
                    settings.min_height,
                );
                *preview = origin.with_geometry(x, y, w, h);
            }
            Gesture::Rotating { origin, preview } => {
                preview.rotation_degrees =
                    rotation_towards(origin.center(), point, settings.rotation_limit);
            }
        }
    }

    /// End the gesture, returning the element to commit.
    ///
    /// Drags are grid-snapped when snapping is on. Returns `None` when the
    /// pointer never moved the element or the committed geometry equals
    /// the origin.
    pub fn finish(self, grid: &GridSettings) -> Option<Element> {
        let (origin, committed) = match self {
            Gesture::Idle => return None,
            Gesture::Dragging {
                origin, preview, ..
            } => {
                if preview.same_geometry(&origin) {
                    return None;
                }
                let mut committed = preview;
                if grid.snap_enabled {
                    committed.x = snap(committed.x, grid.size_px);
                    committed.y = snap(committed.y, grid.size_px);
                }
                (origin, committed)
            }
            Gesture::Resizing {
                origin, preview, ..
            }
            | Gesture::Rotating { origin, preview } => (origin, preview),
        };

        if committed.same_geometry(&origin) {
            return None;
        }
        Some(committed)
    }
}

/// New `(x, y, width, height)` for a corner drag of `(dx, dy)` in the
/// element's frame.
///
/// The corner opposite `handle` stays fixed in layout space, also for
/// rotated elements, and the size never drops below the minimum, however
/// far the handle crosses the opposite edge.
pub fn resize_geometry(
    origin: &Element,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    min_width: f64,
    min_height: f64,
) -> (f64, f64, f64, f64) {
    let left = handle.moves_left_edge();
    let top = handle.moves_top_edge();

    let raw_w = if left { origin.width - dx } else { origin.width + dx };
    let raw_h = if top { origin.height - dy } else { origin.height + dy };
    let width = raw_w.max(min_width);
    let height = raw_h.max(min_height);

    if origin.rotation_degrees % 360.0 == 0.0 {
        let x = if left { origin.x + origin.width - width } else { origin.x };
        let y = if top { origin.y + origin.height - height } else { origin.y };
        return (x, y, width, height);
    }

    // Rotation is about the centre, which shifts with the size: place the
    // new centre relative to the anchored corner along the rotated axes.
    let anchor = origin.to_world(Point::new(
        if left { origin.width } else { 0.0 },
        if top { origin.height } else { 0.0 },
    ));
    let half_x = if left { -width / 2.0 } else { width / 2.0 };
    let half_y = if top { -height / 2.0 } else { height / 2.0 };
    let (sin, cos) = origin.rotation_degrees.to_radians().sin_cos();
    let cx = anchor.x + half_x * cos - half_y * sin;
    let cy = anchor.y + half_x * sin + half_y * cos;

    (cx - width / 2.0, cy - height / 2.0, width, height)
}

/// Rotation that points the element's top edge at `pointer`.
///
/// A pointer straight above the centre gives 0 degrees, to the right 90.
pub fn rotation_towards(center: Point, pointer: Point, limit: RotationLimit) -> f64 {
    let angle = (pointer.y - center.y)
        .atan2(pointer.x - center.x)
        .to_degrees()
        + 90.0;
    limit.apply(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;

    fn element() -> Element {
        Element::with_id("E", ElementKind::Stand, "E", 100.0, 100.0, 80.0, 60.0)
    }

    #[test]
    fn test_resize_keeps_opposite_corner() {
        let e = element();
        let (x, y, w, h) = resize_geometry(&e, ResizeHandle::NorthWest, 10.0, 20.0, 20.0, 20.0);
        assert_eq!((x, y, w, h), (110.0, 120.0, 70.0, 40.0));
        assert_eq!(x + w, e.x + e.width);
        assert_eq!(y + h, e.y + e.height);

        let (x, y, w, h) = resize_geometry(&e, ResizeHandle::SouthEast, 15.0, -5.0, 20.0, 20.0);
        assert_eq!((x, y, w, h), (100.0, 100.0, 95.0, 55.0));
    }

    #[test]
    fn test_resize_floor() {
        let e = element();
        let (x, y, w, h) =
            resize_geometry(&e, ResizeHandle::NorthEast, -500.0, 500.0, 20.0, 20.0);
        assert_eq!((w, h), (20.0, 20.0));
        assert_eq!(x, 100.0);
        assert_eq!(y + h, 160.0);
    }

    #[test]
    fn test_rotated_resize_anchors_opposite_corner() {
        let e = element().with_rotation(30.0);
        let anchor = e.corners()[0];
        let (x, y, w, h) = resize_geometry(&e, ResizeHandle::SouthEast, 25.0, -10.0, 20.0, 20.0);
        assert_eq!((w, h), (105.0, 50.0));

        let resized = e.with_geometry(x, y, w, h);
        let moved = resized.corners()[0];
        assert!((moved.x - anchor.x).abs() < 1e-9);
        assert!((moved.y - anchor.y).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_towards() {
        let c = Point::new(0.0, 0.0);
        let up = rotation_towards(c, Point::new(0.0, -10.0), RotationLimit::Unlimited);
        assert!(up.abs() < 1e-9);
        let right = rotation_towards(c, Point::new(10.0, 0.0), RotationLimit::Unlimited);
        assert!((right - 90.0).abs() < 1e-9);
        let left = rotation_towards(c, Point::new(-10.0, 0.0), RotationLimit::Unlimited);
        assert!((left + 90.0).abs() < 1e-9);
        let clamped = rotation_towards(
            c,
            Point::new(10.0, 0.0),
            RotationLimit::Clamped { max_degrees: 45.0 },
        );
        assert_eq!(clamped, 45.0);
    }

    #[test]
    fn test_unmoved_drag_commits_nothing() {
        let e = element();
        let gesture = Gesture::drag(&e, Point::new(120.0, 120.0));
        assert_eq!(gesture.finish(&GridSettings::default()), None);
    }
}
