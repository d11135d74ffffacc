//! Element model for placed fixtures.
//!
//! An [`Element`] is a rectangle in layout pixel space with a kind, a
//! leasing status and optional annotations. Elements may overlap and may
//! extend past the layout boundary; only `width > 0` and `height > 0` hold.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest width or height an element can carry.
pub const MIN_DIMENSION: f64 = 1.0;

/// A point in layout pixel space (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Fixture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    #[default]
    Gondola,
    Promo,
    Stand,
    CashRegister,
    Entrance,
    DisplayCase,
    Shelf,
    Door,
    Window,
    Wall,
    Counter,
}

impl ElementKind {
    pub const ALL: [ElementKind; 11] = [
        ElementKind::Gondola,
        ElementKind::Promo,
        ElementKind::Stand,
        ElementKind::CashRegister,
        ElementKind::Entrance,
        ElementKind::DisplayCase,
        ElementKind::Shelf,
        ElementKind::Door,
        ElementKind::Window,
        ElementKind::Wall,
        ElementKind::Counter,
    ];

    /// Name used in persisted layout documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Gondola => "gondola",
            ElementKind::Promo => "promo",
            ElementKind::Stand => "stand",
            ElementKind::CashRegister => "cashRegister",
            ElementKind::Entrance => "entrance",
            ElementKind::DisplayCase => "displayCase",
            ElementKind::Shelf => "shelf",
            ElementKind::Door => "door",
            ElementKind::Window => "window",
            ElementKind::Wall => "wall",
            ElementKind::Counter => "counter",
        }
    }

    /// Parse a kind, accepting any casing and separators.
    ///
    /// Unrecognized input falls back to [`ElementKind::Gondola`].
    pub fn parse_lenient(input: &str) -> Self {
        match normalize_token(input).as_str() {
            "gondola" => ElementKind::Gondola,
            "promo" | "promotion" => ElementKind::Promo,
            "stand" => ElementKind::Stand,
            "cashregister" | "register" | "checkout" => ElementKind::CashRegister,
            "entrance" => ElementKind::Entrance,
            "displaycase" | "vitrine" => ElementKind::DisplayCase,
            "shelf" => ElementKind::Shelf,
            "door" => ElementKind::Door,
            "window" => ElementKind::Window,
            "wall" => ElementKind::Wall,
            "counter" => ElementKind::Counter,
            _ => {
                tracing::warn!("Unknown element kind '{}', using {}", input, Self::default());
                Self::default()
            }
        }
    }

    /// Structural elements are part of the building, not leasable fixtures.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ElementKind::Entrance | ElementKind::Door | ElementKind::Window | ElementKind::Wall
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ElementKind {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<&str> for ElementKind {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Leasing status mirrored onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementStatus {
    #[default]
    Available,
    Reserved,
    Occupied,
    ExpiringSoon,
    Inactive,
}

impl ElementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementStatus::Available => "available",
            ElementStatus::Reserved => "reserved",
            ElementStatus::Occupied => "occupied",
            ElementStatus::ExpiringSoon => "expiringSoon",
            ElementStatus::Inactive => "inactive",
        }
    }

    /// Parse a status; unknown input falls back to `Available`.
    pub fn parse_lenient(input: &str) -> Self {
        match normalize_token(input).as_str() {
            "available" | "free" | "vacant" => ElementStatus::Available,
            "reserved" => ElementStatus::Reserved,
            "occupied" | "leased" | "rented" => ElementStatus::Occupied,
            "expiringsoon" | "expiring" => ElementStatus::ExpiringSoon,
            "inactive" | "disabled" => ElementStatus::Inactive,
            _ => {
                tracing::warn!("Unknown element status '{}', using available", input);
                ElementStatus::Available
            }
        }
    }

    /// Whether the position currently carries a lease
    pub fn is_leased(&self) -> bool {
        matches!(
            self,
            ElementStatus::Reserved | ElementStatus::Occupied | ElementStatus::ExpiringSoon
        )
    }
}

impl fmt::Display for ElementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ElementStatus {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<&str> for ElementStatus {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

impl From<ElementStatus> for String {
    fn from(status: ElementStatus) -> Self {
        status.as_str().to_string()
    }
}

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Leasing-side attributes edited through the details dialog.
///
/// Kept beside the element (keyed by element id) rather than on it, since
/// the canvas never reads these fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeasingMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

impl LeasingMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A placed fixture on a layout
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Stable identifier, also the join key to position records
    pub id: String,
    /// Display text, by convention the position number
    pub label: String,
    pub kind: ElementKind,
    pub status: ElementStatus,
    /// Top-left corner of the unrotated rectangle
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation about the centre, in degrees
    pub rotation_degrees: f64,
    /// Brand or supplier occupying the position
    pub tenant: Option<String>,
    pub note: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Element {
    /// Create an element with a fresh id
    pub fn new(
        kind: ElementKind,
        label: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), kind, label, x, y, width, height)
    }

    /// Create an element with a caller-supplied id
    pub fn with_id(
        id: impl Into<String>,
        kind: ElementKind,
        label: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            status: ElementStatus::default(),
            x,
            y,
            width: positive_dimension(width),
            height: positive_dimension(height),
            rotation_degrees: 0.0,
            tenant: None,
            note: None,
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: ElementStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Copy of this element with new position and size
    pub fn with_geometry(&self, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: positive_dimension(width),
            height: positive_dimension(height),
            ..self.clone()
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Map a layout point into the element's unrotated frame, relative to
    /// its top-left corner.
    pub fn to_local(&self, point: Point) -> Point {
        let c = self.center();
        let (sin, cos) = self.rotation_degrees.to_radians().sin_cos();
        let dx = point.x - c.x;
        let dy = point.y - c.y;
        Point::new(
            dx * cos + dy * sin + self.width / 2.0,
            -dx * sin + dy * cos + self.height / 2.0,
        )
    }

    /// Inverse of [`Element::to_local`]
    pub fn to_world(&self, local: Point) -> Point {
        let c = self.center();
        let (sin, cos) = self.rotation_degrees.to_radians().sin_cos();
        let dx = local.x - self.width / 2.0;
        let dy = local.y - self.height / 2.0;
        Point::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos)
    }

    /// Rotation-aware containment test
    pub fn contains_point(&self, point: Point) -> bool {
        let local = self.to_local(point);
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }

    /// Corners in layout space, ordered NW, NE, SW, SE
    pub fn corners(&self) -> [Point; 4] {
        [
            self.to_world(Point::new(0.0, 0.0)),
            self.to_world(Point::new(self.width, 0.0)),
            self.to_world(Point::new(0.0, self.height)),
            self.to_world(Point::new(self.width, self.height)),
        ]
    }

    /// Same position, size and rotation
    pub fn same_geometry(&self, other: &Element) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
            && self.rotation_degrees == other.rotation_degrees
    }

    /// Label, or the id when no label was entered
    pub fn position_number(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

pub(crate) fn positive_dimension(value: f64) -> f64 {
    if value.is_finite() && value >= MIN_DIMENSION {
        value
    } else {
        MIN_DIMENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing_is_lenient() {
        assert_eq!(ElementKind::from("Cash Register"), ElementKind::CashRegister);
        assert_eq!(ElementKind::from("cash_register"), ElementKind::CashRegister);
        assert_eq!(ElementKind::from("cashRegister"), ElementKind::CashRegister);
        assert_eq!(ElementKind::from("DISPLAY-CASE"), ElementKind::DisplayCase);
        assert_eq!(ElementKind::from("spaceship"), ElementKind::Gondola);
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_status_parsing_is_lenient() {
        assert_eq!(ElementStatus::from("Expiring Soon"), ElementStatus::ExpiringSoon);
        assert_eq!(ElementStatus::from("OCCUPIED"), ElementStatus::Occupied);
        assert_eq!(ElementStatus::from("???"), ElementStatus::Available);
    }

    #[test]
    fn test_dimensions_stay_positive() {
        let e = Element::new(ElementKind::Shelf, "S1", 0.0, 0.0, -5.0, 0.0);
        assert!(e.width > 0.0);
        assert!(e.height > 0.0);
        let e = e.with_geometry(1.0, 2.0, f64::NAN, 30.0);
        assert_eq!(e.width, MIN_DIMENSION);
        assert_eq!(e.height, 30.0);
    }

    #[test]
    fn test_contains_point_respects_rotation() {
        let e = Element::new(ElementKind::Gondola, "G", 0.0, 0.0, 100.0, 20.0);
        assert!(e.contains_point(Point::new(90.0, 10.0)));
        assert!(!e.contains_point(Point::new(50.0, 45.0)));

        let rotated = e.with_rotation(90.0);
        // Centre stays at (50, 10); the long axis is now vertical.
        assert!(!rotated.contains_point(Point::new(90.0, 10.0)));
        assert!(rotated.contains_point(Point::new(50.0, 45.0)));
    }

    #[test]
    fn test_local_world_round_trip() {
        let e = Element::new(ElementKind::Stand, "S", 10.0, 20.0, 40.0, 30.0).with_rotation(33.0);
        let p = Point::new(17.0, -4.0);
        let back = e.to_world(e.to_local(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_position_number_falls_back_to_id() {
        let e = Element::with_id("P9", ElementKind::Promo, "  ", 0.0, 0.0, 10.0, 10.0);
        assert_eq!(e.position_number(), "P9");
    }
}
