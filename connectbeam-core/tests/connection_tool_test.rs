//! Integration tests for the connection tool
//!
//! Drives the tool with pointer and key events the way a canvas host does
//! and checks the resulting document, undo stack and status text.

use connectbeam_core::actions::AddConnectionPointAction;
use connectbeam_core::canvas::{Canvas, CursorShape};
use connectbeam_core::connection_tool::ConnectionTool;
use connectbeam_core::connector::{Binding, Connector};
use connectbeam_core::document::Document;
use connectbeam_core::input::{Key, KeyEvent, PointerEvent};
use connectbeam_core::registry::{ShapeRegistry, RECTANGLE_SHAPE_ID};
use connectbeam_core::resources::{ToolResources, CONNECTOR_SHAPE_ID};
use connectbeam_core::shape::{Shape, ShapeColor};
use connectbeam_core::tool::{
    EditMode, HINT_ADD_CONNECTION_POINT, HINT_EDIT_CONNECTION, HINT_EDIT_CONNECTION_POINT,
};
use connectbeam_core::view::ViewConverter;
use kurbo::{Point, Rect, Shape as KurboShape, Vec2};
use uuid::Uuid;

fn square(x: f64, y: f64) -> Shape {
    Shape::new(Rect::new(0.0, 0.0, 20.0, 20.0).to_path(0.1)).with_position(x, y)
}

/// Canvas with grab sensitivity 5 holding the given shapes
fn setup(shapes: Vec<Shape>) -> (Canvas, ConnectionTool) {
    let mut document = Document::new("Test");
    for shape in shapes {
        document.add_shape(shape);
    }
    let mut canvas = Canvas::new(document)
        .with_resources(ToolResources::default().with_grab_sensitivity(5.0));
    let mut tool = ConnectionTool::new();
    tool.activate(&mut canvas);
    (canvas, tool)
}

fn move_to(tool: &mut ConnectionTool, canvas: &mut Canvas, x: f64, y: f64) {
    tool.mouse_move_event(canvas, &PointerEvent::new(x, y));
}

/// Hover, press, drag and release
fn drag(tool: &mut ConnectionTool, canvas: &mut Canvas, from: (f64, f64), to: (f64, f64)) {
    move_to(tool, canvas, from.0, from.1);
    tool.mouse_press_event(canvas, &PointerEvent::new(from.0, from.1));
    move_to(tool, canvas, to.0, to.1);
    tool.mouse_release_event(canvas, &PointerEvent::new(to.0, to.1));
}

fn connectors(canvas: &Canvas) -> Vec<&Shape> {
    canvas
        .document()
        .shapes()
        .iter()
        .filter(|s| s.is_connector())
        .collect()
}

#[test]
fn test_activate_sets_cursor_and_idle() {
    let (canvas, tool) = setup(vec![]);
    assert_eq!(canvas.cursor(), CursorShape::PointingHand);
    assert_eq!(tool.mode(), EditMode::Idle { hover: None });
    assert!(!tool.has_strategy());
}

#[test]
fn test_hover_status_hints() {
    let target = square(0.0, 0.0);
    let target_id = target.id;
    let connector = Shape::new_connector(Connector::new(
        Point::new(100.0, 100.0),
        Point::new(200.0, 100.0),
    ));
    let connector_id = connector.id;
    let (mut canvas, mut tool) = setup(vec![target, connector]);

    move_to(&mut tool, &mut canvas, 10.0, 10.0);
    assert_eq!(tool.mode(), EditMode::Idle { hover: Some(target_id) });
    assert_eq!(canvas.status_text(), HINT_ADD_CONNECTION_POINT);

    move_to(&mut tool, &mut canvas, 20.0, 11.0);
    assert_eq!(
        tool.mode(),
        EditMode::EditConnectionPoint {
            shape: target_id,
            point: 1
        }
    );
    assert_eq!(canvas.status_text(), HINT_EDIT_CONNECTION_POINT);

    move_to(&mut tool, &mut canvas, 199.0, 101.0);
    assert_eq!(
        tool.mode(),
        EditMode::EditConnection {
            connector: connector_id,
            handle: 1
        }
    );
    assert_eq!(canvas.status_text(), HINT_EDIT_CONNECTION);

    // middle of the connector: hovering it but no handle in reach
    move_to(&mut tool, &mut canvas, 150.0, 100.0);
    assert_eq!(tool.mode(), EditMode::Idle { hover: Some(connector_id) });
    assert_eq!(canvas.status_text(), "");

    move_to(&mut tool, &mut canvas, 500.0, 500.0);
    assert_eq!(tool.mode(), EditMode::Idle { hover: None });
    assert_eq!(canvas.status_text(), "");
}

#[test]
fn test_connector_handle_beats_connection_point_regardless_of_order() {
    let target = square(0.0, 0.0).with_z_index(10);
    let connector = Shape::new_connector(Connector::new(
        Point::new(20.0, 10.0),
        Point::new(80.0, 10.0),
    ))
    .with_z_index(0);
    let connector_id = connector.id;
    let (mut canvas, mut tool) = setup(vec![target, connector]);

    move_to(&mut tool, &mut canvas, 20.0, 10.0);
    assert_eq!(
        tool.mode(),
        EditMode::EditConnection {
            connector: connector_id,
            handle: 0
        }
    );
}

#[test]
fn test_too_short_connection_is_discarded() {
    let target = square(0.0, 0.0).with_connection_points([(0, Point::new(10.0, 10.0))]);
    let target_id = target.id;
    let (mut canvas, mut tool) = setup(vec![target]);

    move_to(&mut tool, &mut canvas, 10.0, 10.0);
    tool.mouse_press_event(&mut canvas, &PointerEvent::new(10.0, 10.0));
    assert!(tool.has_strategy());
    assert_eq!(connectors(&canvas).len(), 1);
    assert!(matches!(tool.mode(), EditMode::CreateConnection { .. }));

    move_to(&mut tool, &mut canvas, 10.0, 10.5);
    tool.mouse_release_event(&mut canvas, &PointerEvent::new(10.0, 10.5));

    assert!(!tool.has_strategy());
    assert!(connectors(&canvas).is_empty());
    assert_eq!(canvas.document().shape_count(), 1);
    assert!(!canvas.executor().can_undo());
    assert_eq!(
        tool.mode(),
        EditMode::EditConnectionPoint {
            shape: target_id,
            point: 0
        }
    );
}

#[test]
fn test_long_enough_connection_is_committed() {
    let target = square(0.0, 0.0).with_connection_points([(0, Point::new(10.0, 10.0))]);
    let target_id = target.id;
    let (mut canvas, mut tool) = setup(vec![target]);

    drag(&mut tool, &mut canvas, (10.0, 10.0), (50.0, 50.0));

    assert!(!tool.has_strategy());
    assert_eq!(tool.mode(), EditMode::Idle { hover: None });

    let created = connectors(&canvas);
    assert_eq!(created.len(), 1);
    let connector = created[0].as_connector().unwrap();
    assert_eq!(connector.first, Some(Binding::new(target_id, 0)));
    assert_eq!(connector.second, None);
    assert_eq!(created[0].handle_in_document(0), Some(Point::new(10.0, 10.0)));
    assert_eq!(created[0].handle_in_document(1), Some(Point::new(50.0, 50.0)));

    let history = canvas.executor().undo_descriptions();
    assert_eq!(
        history.iter().filter(|d| d.as_str() == "Add connection").count(),
        1
    );
    assert_eq!(history, vec!["Add connection", "Change connection"]);
}

#[test]
fn test_new_connection_paints_above_existing_shapes() {
    let target = square(0.0, 0.0).with_z_index(7);
    let (mut canvas, mut tool) = setup(vec![target]);

    drag(&mut tool, &mut canvas, (20.0, 10.0), (100.0, 10.0));

    assert_eq!(connectors(&canvas)[0].z_index, 8);
}

#[test]
fn test_new_connection_binds_far_end_on_release_over_point() {
    let source = square(0.0, 0.0);
    let source_id = source.id;
    let target = square(100.0, 0.0);
    let target_id = target.id;
    let (mut canvas, mut tool) = setup(vec![source, target]);

    // right point of the source to left point of the target
    drag(&mut tool, &mut canvas, (20.0, 10.0), (101.0, 11.0));

    let created = connectors(&canvas);
    let connector = created[0].as_connector().unwrap();
    assert_eq!(connector.first, Some(Binding::new(source_id, 1)));
    assert_eq!(connector.second, Some(Binding::new(target_id, 3)));
    assert_eq!(created[0].handle_in_document(1), Some(Point::new(100.0, 10.0)));
}

#[test]
fn test_deactivate_is_idempotent_and_drops_uncommitted_connector() {
    let (mut canvas, mut tool) = setup(vec![square(0.0, 0.0)]);

    move_to(&mut tool, &mut canvas, 20.0, 10.0);
    tool.mouse_press_event(&mut canvas, &PointerEvent::new(20.0, 10.0));
    move_to(&mut tool, &mut canvas, 80.0, 80.0);
    assert_eq!(connectors(&canvas).len(), 1);

    tool.deactivate(&mut canvas);
    assert!(!tool.has_strategy());
    assert_eq!(tool.mode(), EditMode::Idle { hover: None });
    assert!(connectors(&canvas).is_empty());

    tool.deactivate(&mut canvas);
    assert!(!tool.has_strategy());
    assert_eq!(tool.mode(), EditMode::Idle { hover: None });
    assert_eq!(canvas.document().shape_count(), 1);
    assert!(!canvas.executor().can_undo());
    assert_eq!(canvas.status_text(), "");
}

#[test]
fn test_escape_cancels_handle_drag() {
    let connector = Shape::new_connector(Connector::new(Point::ORIGIN, Point::new(100.0, 0.0)));
    let connector_id = connector.id;
    let (mut canvas, mut tool) = setup(vec![connector]);

    move_to(&mut tool, &mut canvas, 100.0, 0.0);
    tool.mouse_press_event(&mut canvas, &PointerEvent::new(100.0, 0.0));
    move_to(&mut tool, &mut canvas, 150.0, 60.0);
    tool.key_press_event(&mut canvas, &KeyEvent::new(Key::Escape));

    let shape = canvas.document().get_shape(&connector_id).unwrap();
    assert_eq!(shape.handle_in_document(1), Some(Point::new(100.0, 0.0)));
    assert!(!tool.has_strategy());
    assert!(!canvas.executor().can_undo());
}

#[test]
fn test_drag_existing_endpoint_onto_point() {
    let target = square(100.0, 100.0);
    let target_id = target.id;
    let connector = Shape::new_connector(Connector::new(Point::ORIGIN, Point::new(50.0, 0.0)));
    let connector_id = connector.id;
    let (mut canvas, mut tool) = setup(vec![target, connector]);

    // top point of the target is (110, 100)
    drag(&mut tool, &mut canvas, (50.0, 0.0), (111.0, 98.0));

    let shape = canvas.document().get_shape(&connector_id).unwrap();
    assert_eq!(
        shape.as_connector().unwrap().second,
        Some(Binding::new(target_id, 0))
    );
    assert_eq!(shape.handle_in_document(1), Some(Point::new(110.0, 100.0)));
    assert_eq!(
        canvas.executor().undo_description().as_deref(),
        Some("Change connection")
    );

    assert!(canvas.executor_mut().undo());
    let shape = canvas.document().get_shape(&connector_id).unwrap();
    assert_eq!(shape.as_connector().unwrap().second, None);
    assert_eq!(shape.handle_in_document(1), Some(Point::new(50.0, 0.0)));
}

#[test]
fn test_double_click_removes_exactly_the_hit_point() {
    let target = square(0.0, 0.0);
    let target_id = target.id;
    let (mut canvas, mut tool) = setup(vec![target]);

    move_to(&mut tool, &mut canvas, 20.0, 10.0);
    tool.mouse_double_click_event(&mut canvas, &PointerEvent::new(20.0, 10.0));

    let shape = canvas.document().get_shape(&target_id).unwrap();
    let ids: Vec<u32> = shape.connection_points().keys().copied().collect();
    assert_eq!(ids, vec![0, 2, 3]);
    assert_eq!(tool.mode(), EditMode::Idle { hover: None });
    assert_eq!(
        canvas.executor().undo_description().as_deref(),
        Some("Remove connection point")
    );

    assert!(canvas.executor_mut().undo());
    let shape = canvas.document().get_shape(&target_id).unwrap();
    assert_eq!(shape.connection_point(1), Some(Point::new(20.0, 10.0)));
}

#[test]
fn test_press_release_then_double_click_removes_point() {
    let target = square(0.0, 0.0);
    let target_id = target.id;
    let (mut canvas, mut tool) = setup(vec![target]);

    // the first click of a double click creates and discards a connector
    move_to(&mut tool, &mut canvas, 10.0, 0.0);
    tool.mouse_press_event(&mut canvas, &PointerEvent::new(10.0, 0.0));
    tool.mouse_release_event(&mut canvas, &PointerEvent::new(10.0, 0.0));
    tool.mouse_double_click_event(&mut canvas, &PointerEvent::new(10.0, 0.0));

    assert!(connectors(&canvas).is_empty());
    let shape = canvas.document().get_shape(&target_id).unwrap();
    assert!(!shape.has_connection_point(0));
    assert_eq!(canvas.executor().undo_depth(), 1);
}

#[test]
fn test_double_click_adds_point_in_shape_space() {
    let target = square(100.0, 100.0);
    let target_id = target.id;
    let (mut canvas, mut tool) = setup(vec![target]);

    move_to(&mut tool, &mut canvas, 105.0, 105.0);
    assert_eq!(tool.mode(), EditMode::Idle { hover: Some(target_id) });
    tool.mouse_double_click_event(&mut canvas, &PointerEvent::new(105.0, 105.0));

    let shape = canvas.document().get_shape(&target_id).unwrap();
    assert_eq!(shape.connection_point(4), Some(Point::new(5.0, 5.0)));
    assert_eq!(
        canvas.executor().undo_description().as_deref(),
        Some("Add connection point")
    );

    // the new point is immediately hoverable
    move_to(&mut tool, &mut canvas, 105.0, 105.0);
    assert_eq!(
        tool.mode(),
        EditMode::EditConnectionPoint {
            shape: target_id,
            point: 4
        }
    );
}

#[test]
fn test_double_click_on_connector_body_does_nothing() {
    let connector = Shape::new_connector(Connector::new(Point::ORIGIN, Point::new(100.0, 0.0)));
    let (mut canvas, mut tool) = setup(vec![connector]);

    move_to(&mut tool, &mut canvas, 50.0, 0.0);
    tool.mouse_double_click_event(&mut canvas, &PointerEvent::new(50.0, 0.0));

    assert!(!canvas.executor().can_undo());
    assert!(canvas.document().shapes()[0].connection_points().is_empty());
}

#[test]
fn test_unknown_connector_type_aborts_creation() {
    let mut resources = ToolResources::default().with_grab_sensitivity(5.0);
    resources.connector_type = "MissingShape".to_string();
    let mut document = Document::new("Test");
    document.add_shape(square(0.0, 0.0));
    let mut canvas = Canvas::new(document).with_resources(resources);
    let mut tool = ConnectionTool::new();

    move_to(&mut tool, &mut canvas, 20.0, 10.0);
    let before = tool.mode();
    tool.mouse_press_event(&mut canvas, &PointerEvent::new(20.0, 10.0));

    assert!(!tool.has_strategy());
    assert_eq!(tool.mode(), before);
    assert_eq!(canvas.document().shape_count(), 1);
}

#[test]
fn test_non_connector_factory_aborts_creation() {
    let mut registry = ShapeRegistry::new();
    registry.register(CONNECTOR_SHAPE_ID, |_resources: &ToolResources| {
        Shape::new(Rect::new(0.0, 0.0, 5.0, 5.0).to_path(0.1))
    });
    let mut document = Document::new("Test");
    document.add_shape(square(0.0, 0.0));
    let mut canvas = Canvas::new(document).with_registry(registry);
    let mut tool = ConnectionTool::new();

    move_to(&mut tool, &mut canvas, 20.0, 10.0);
    tool.mouse_press_event(&mut canvas, &PointerEvent::new(20.0, 10.0));

    assert!(!tool.has_strategy());
    assert_eq!(canvas.document().shape_count(), 1);
    assert!(canvas.registry.contains(RECTANGLE_SHAPE_ID));
}

#[test]
fn test_decorations_follow_mode() {
    let connector = Shape::new_connector(Connector::new(
        Point::new(100.0, 0.0),
        Point::new(200.0, 0.0),
    ));
    let (mut canvas, mut tool) = setup(vec![square(0.0, 0.0), connector]);

    assert!(tool.decorations(&canvas).is_empty());

    move_to(&mut tool, &mut canvas, 10.0, 10.0);
    let decorations = tool.decorations(&canvas);
    assert_eq!(decorations.len(), 4);
    assert!(decorations.iter().all(|d| d.fill == ShapeColor::DARK_GREEN));

    move_to(&mut tool, &mut canvas, 10.0, 1.0);
    let decorations = tool.decorations(&canvas);
    assert_eq!(
        decorations.iter().filter(|d| d.fill == ShapeColor::RED).count(),
        1
    );

    move_to(&mut tool, &mut canvas, 200.0, 1.0);
    let decorations = tool.decorations(&canvas);
    assert_eq!(decorations.len(), 2);
    assert_eq!(decorations[0].fill, ShapeColor::WHITE);
    assert_eq!(decorations[1].fill, ShapeColor::RED);
    assert!(decorations.iter().all(|d| d.stroke == ShapeColor::BLUE));
}

#[test]
fn test_hover_marks_dirty_regions() {
    let (mut canvas, mut tool) = setup(vec![square(0.0, 0.0)]);
    canvas.take_dirty_regions();

    move_to(&mut tool, &mut canvas, 10.0, 10.0);
    let regions = canvas.take_dirty_regions();
    // shape bounds plus the union of the connection point grab rects
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[1], Rect::new(-5.0, -5.0, 25.0, 25.0));

    move_to(&mut tool, &mut canvas, 500.0, 500.0);
    assert_eq!(canvas.take_dirty_regions().len(), 2);
}

#[test]
fn test_undo_redo_created_connection() {
    let target = square(0.0, 0.0);
    let target_id = target.id;
    let (mut canvas, mut tool) = setup(vec![target]);
    drag(&mut tool, &mut canvas, (20.0, 10.0), (80.0, 10.0));
    let connector_id = connectors(&canvas)[0].id;

    assert!(canvas.executor_mut().undo());
    assert!(canvas.executor_mut().undo());
    assert!(canvas.document().get_shape(&connector_id).is_none());
    assert!(canvas.document().contains_shape(&target_id));

    assert!(canvas.executor_mut().redo());
    assert!(canvas.executor_mut().redo());
    let shape = canvas.document().get_shape(&connector_id).unwrap();
    assert_eq!(shape.handle_in_document(0), Some(Point::new(20.0, 10.0)));
    assert_eq!(shape.handle_in_document(1), Some(Point::new(80.0, 10.0)));
}

#[test]
fn test_new_ids_are_unique() {
    let (mut canvas, mut tool) = setup(vec![square(0.0, 0.0)]);
    drag(&mut tool, &mut canvas, (20.0, 10.0), (80.0, 10.0));
    drag(&mut tool, &mut canvas, (10.0, 20.0), (10.0, 80.0));

    let ids: Vec<Uuid> = connectors(&canvas).iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_press_on_vanished_point_does_not_start_connection() {
    let target = square(0.0, 0.0);
    let target_id = target.id;
    let (mut canvas, mut tool) = setup(vec![target]);
    canvas.add_command(Box::new(AddConnectionPointAction::new(
        target_id,
        Point::new(5.0, 5.0),
    )));

    move_to(&mut tool, &mut canvas, 5.0, 5.0);
    let hovered = EditMode::EditConnectionPoint {
        shape: target_id,
        point: 4,
    };
    assert_eq!(tool.mode(), hovered);

    // the point goes away without the pointer moving
    assert!(canvas.executor_mut().undo());
    tool.mouse_press_event(&mut canvas, &PointerEvent::new(5.0, 5.0));

    assert!(!tool.has_strategy());
    assert_eq!(tool.mode(), hovered);
    assert_eq!(canvas.document().shape_count(), 1);
    assert!(!canvas.executor().can_undo());
}

#[test]
fn test_zoomed_view_uses_document_grab_distance() {
    let target = square(0.0, 0.0).with_connection_points([(0, Point::new(10.0, 10.0))]);
    let target_id = target.id;
    let (canvas, mut tool) = setup(vec![target]);
    let mut canvas = canvas.with_view(ViewConverter::new(2.0, Vec2::ZERO));

    // 3 units away: inside the grab distance of 5 although the view is zoomed
    move_to(&mut tool, &mut canvas, 10.0, 13.0);
    assert_eq!(
        tool.mode(),
        EditMode::EditConnectionPoint {
            shape: target_id,
            point: 0
        }
    );
    let decorations = tool.decorations(&canvas);
    assert_eq!(decorations.len(), 1);
    assert_eq!(decorations[0].rect, Rect::new(17.0, 17.0, 23.0, 23.0));

    move_to(&mut tool, &mut canvas, 10.0, 16.0);
    assert_eq!(tool.mode(), EditMode::Idle { hover: Some(target_id) });

    drag(&mut tool, &mut canvas, (10.0, 10.0), (10.0, 13.0));
    assert!(connectors(&canvas).is_empty());
    assert!(!canvas.executor().can_undo());
    assert_eq!(
        tool.mode(),
        EditMode::EditConnectionPoint {
            shape: target_id,
            point: 0
        }
    );

    tool.mouse_press_event(&mut canvas, &PointerEvent::new(10.0, 10.0));
    move_to(&mut tool, &mut canvas, 10.0, 40.0);
    tool.mouse_release_event(&mut canvas, &PointerEvent::new(10.0, 40.0));
    assert_eq!(connectors(&canvas).len(), 1);
    assert_eq!(
        canvas.executor().undo_descriptions(),
        vec!["Add connection", "Change connection"]
    );
}
