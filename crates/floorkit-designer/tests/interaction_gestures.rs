//! Pointer gesture integration tests

use floorkit_designer::interaction::resize_geometry;
use floorkit_designer::{
    EditorMode, Element, ElementDetails, ElementKind, Gesture, InteractionController,
    InteractionEvent, LayoutStore, Point, ResizeHandle,
};
use floorkit_settings::{GridSettings, InteractionSettings, RotationLimit};
use proptest::prelude::*;

fn setup() -> (LayoutStore, InteractionController) {
    let mut store = LayoutStore::new();
    store.add_element(Element::with_id(
        "E1",
        ElementKind::Gondola,
        "1",
        100.0,
        100.0,
        80.0,
        60.0,
    ));
    store.select_element(None);
    let controller =
        InteractionController::new(InteractionSettings::default(), GridSettings::default());
    (store, controller)
}

#[test]
fn test_click_selects_without_history() {
    let (mut store, mut controller) = setup();
    let depth = store.history_depth();

    let events = controller.pointer_down(&mut store, Point::new(120.0, 120.0));
    assert_eq!(events, vec![InteractionEvent::Selected { id: "E1".into() }]);
    assert!(matches!(controller.gesture(), Gesture::Dragging { .. }));

    let events = controller.pointer_up(&mut store);
    assert!(events.is_empty());
    assert!(controller.gesture().is_idle());
    assert_eq!(store.history_depth(), depth);
    assert_eq!(store.selection(), ["E1".to_string()]);
}

#[test]
fn test_drag_previews_then_commits_snapped() {
    let (mut store, mut controller) = setup();
    let depth = store.history_depth();

    controller.pointer_down(&mut store, Point::new(120.0, 120.0));
    controller.pointer_move(Point::new(133.0, 151.0));
    controller.pointer_move(Point::new(147.0, 128.0));

    // Only the preview moves during the gesture.
    assert_eq!(store.element("E1").map(|e| (e.x, e.y)), Some((100.0, 100.0)));
    assert_eq!(controller.preview().map(|e| (e.x, e.y)), Some((127.0, 108.0)));

    let events = controller.pointer_up(&mut store);
    assert_eq!(events, vec![InteractionEvent::Committed { id: "E1".into() }]);
    assert_eq!(store.element("E1").map(|e| (e.x, e.y)), Some((120.0, 100.0)));
    assert_eq!(store.history_depth(), depth + 1);
    assert!(controller.preview().is_none());
}

#[test]
fn test_drag_without_snapping() {
    let (mut store, mut controller) = setup();
    controller.set_snap_enabled(false);

    controller.pointer_down(&mut store, Point::new(120.0, 120.0));
    controller.pointer_move(Point::new(133.0, 151.0));
    controller.pointer_up(&mut store);

    assert_eq!(store.element("E1").map(|e| (e.x, e.y)), Some((113.0, 131.0)));
}

#[test]
fn test_pointer_leave_commits_like_pointer_up() {
    let (mut store, mut controller) = setup();

    controller.pointer_down(&mut store, Point::new(120.0, 120.0));
    controller.pointer_move(Point::new(160.0, 120.0));
    let events = controller.pointer_leave(&mut store);

    assert_eq!(events, vec![InteractionEvent::Committed { id: "E1".into() }]);
    assert_eq!(store.element("E1").map(|e| e.x), Some(140.0));
    assert!(controller.gesture().is_idle());
}

#[test]
fn test_resize_from_north_west_keeps_south_east_corner() {
    let (mut store, mut controller) = setup();
    store.select_element(Some("E1"));

    controller.pointer_down(&mut store, Point::new(100.0, 100.0));
    assert!(matches!(
        controller.gesture(),
        Gesture::Resizing {
            handle: ResizeHandle::NorthWest,
            ..
        }
    ));
    controller.pointer_move(Point::new(130.0, 90.0));
    controller.pointer_up(&mut store);

    let e = store.element("E1").cloned().unwrap();
    assert_eq!((e.x, e.y, e.width, e.height), (130.0, 90.0, 50.0, 70.0));
    assert_eq!((e.x + e.width, e.y + e.height), (180.0, 160.0));
}

#[test]
fn test_resize_floor_past_opposite_edge() {
    let (mut store, mut controller) = setup();
    store.select_element(Some("E1"));

    controller.pointer_down(&mut store, Point::new(180.0, 160.0));
    controller.pointer_move(Point::new(-400.0, -400.0));
    controller.pointer_up(&mut store);

    let e = store.element("E1").cloned().unwrap();
    assert_eq!((e.x, e.y, e.width, e.height), (100.0, 100.0, 20.0, 20.0));
}

#[test]
fn test_resize_rotated_element_keeps_opposite_corner() {
    let mut store = LayoutStore::new();
    store.add_element(
        Element::with_id("R1", ElementKind::Shelf, "R1", 100.0, 100.0, 200.0, 100.0)
            .with_rotation(90.0),
    );
    let mut controller =
        InteractionController::new(InteractionSettings::default(), GridSettings::default());

    let [nw, _, _, se] = store.element("R1").unwrap().corners();
    assert!((se.x - 150.0).abs() < 1e-9 && (se.y - 250.0).abs() < 1e-9);

    controller.pointer_down(&mut store, se);
    assert!(matches!(
        controller.gesture(),
        Gesture::Resizing {
            handle: ResizeHandle::SouthEast,
            ..
        }
    ));
    controller.pointer_move(Point::new(se.x, se.y + 40.0));
    controller.pointer_up(&mut store);

    let e = store.element("R1").cloned().unwrap();
    assert!((e.width - 240.0).abs() < 1e-9);
    assert!((e.height - 100.0).abs() < 1e-9);

    let [new_nw, _, _, new_se] = e.corners();
    assert!((new_nw.x - nw.x).abs() < 1e-9 && (new_nw.y - nw.y).abs() < 1e-9);
    // The dragged corner follows the pointer.
    assert!((new_se.x - 150.0).abs() < 1e-9 && (new_se.y - 290.0).abs() < 1e-9);
}

#[test]
fn test_rotate_unlimited_and_clamped() {
    let (mut store, mut controller) = setup();
    store.select_element(Some("E1"));
    let settings = InteractionSettings::default();
    let handle = Point::new(140.0, 100.0 - settings.rotate_handle_offset);

    controller.pointer_down(&mut store, handle);
    assert!(matches!(controller.gesture(), Gesture::Rotating { .. }));
    // Straight right of the centre (140, 130)
    controller.pointer_move(Point::new(240.0, 130.0));
    controller.pointer_up(&mut store);
    let rotation = store.element("E1").map(|e| e.rotation_degrees).unwrap();
    assert!((rotation - 90.0).abs() < 1e-9);

    let mut store = setup().0;
    store.select_element(Some("E1"));
    let mut clamped = InteractionController::new(
        InteractionSettings {
            rotation_limit: RotationLimit::Clamped { max_degrees: 45.0 },
            ..InteractionSettings::default()
        },
        GridSettings::default(),
    );
    clamped.pointer_down(&mut store, handle);
    clamped.pointer_move(Point::new(240.0, 130.0));
    clamped.pointer_up(&mut store);
    assert_eq!(store.element("E1").map(|e| e.rotation_degrees), Some(45.0));
}

#[test]
fn test_pointer_down_ignored_during_gesture() {
    let (mut store, mut controller) = setup();
    store.add_element(Element::with_id(
        "E2",
        ElementKind::Promo,
        "2",
        400.0,
        400.0,
        50.0,
        50.0,
    ));

    controller.pointer_down(&mut store, Point::new(120.0, 120.0));
    let events = controller.pointer_down(&mut store, Point::new(420.0, 420.0));
    assert!(events.is_empty());
    assert_eq!(store.selection(), ["E1".to_string()]);
    match controller.gesture() {
        Gesture::Dragging { origin, .. } => assert_eq!(origin.id, "E1"),
        other => panic!("unexpected gesture {:?}", other),
    }
}

#[test]
fn test_create_mode_requests_creation_on_empty_canvas() {
    let (mut store, mut controller) = setup();
    let before = store.elements().len();

    let events = controller.pointer_down(&mut store, Point::new(600.0, 500.0));
    assert!(events.is_empty());

    controller.set_mode(EditorMode::Create);
    let events = controller.pointer_down(&mut store, Point::new(600.0, 500.0));
    assert_eq!(
        events,
        vec![InteractionEvent::CreateRequested { x: 600.0, y: 500.0 }]
    );
    assert_eq!(store.elements().len(), before);
    assert!(controller.gesture().is_idle());
}

#[test]
fn test_empty_click_clears_selection() {
    let (mut store, mut controller) = setup();
    store.select_element(Some("E1"));
    let events = controller.pointer_down(&mut store, Point::new(900.0, 700.0));
    assert_eq!(events, vec![InteractionEvent::SelectionCleared]);
    assert!(store.selection().is_empty());
}

#[test]
fn test_double_click_requests_details() {
    let (store, controller) = setup();
    let events = controller.double_click(&store, Point::new(150.0, 150.0));
    assert_eq!(
        events,
        vec![InteractionEvent::EditDetailsRequested { id: "E1".into() }]
    );
    assert!(controller
        .double_click(&store, Point::new(5.0, 5.0))
        .is_empty());

    let details = ElementDetails::from_store(&store, "E1").unwrap();
    assert_eq!(details.element.id, "E1");
    assert!(details.leasing.is_empty());
}

proptest! {
    #[test]
    fn prop_resize_never_below_minimum(
        dx in -2000.0..2000.0f64,
        dy in -2000.0..2000.0f64,
        handle in prop::sample::select(ResizeHandle::ALL.to_vec()),
        w in 1.0..500.0f64,
        h in 1.0..500.0f64,
    ) {
        let e = Element::with_id("E", ElementKind::Shelf, "E", 10.0, 10.0, w, h);
        let (_, _, width, height) = resize_geometry(&e, handle, dx, dy, 20.0, 20.0);
        prop_assert!(width >= 20.0);
        prop_assert!(height >= 20.0);
    }

    #[test]
    fn prop_committed_resize_respects_floor(
        px in -1000.0..1000.0f64,
        py in -1000.0..1000.0f64,
        corner in 0usize..4,
    ) {
        let (mut store, mut controller) = setup();
        store.select_element(Some("E1"));
        let corners = [
            Point::new(100.0, 100.0),
            Point::new(180.0, 100.0),
            Point::new(100.0, 160.0),
            Point::new(180.0, 160.0),
        ];
        controller.pointer_down(&mut store, corners[corner]);
        controller.pointer_move(Point::new(px, py));
        controller.pointer_up(&mut store);

        let e = store.element("E1").cloned().unwrap();
        prop_assert!(e.width >= 20.0);
        prop_assert!(e.height >= 20.0);
    }
}
