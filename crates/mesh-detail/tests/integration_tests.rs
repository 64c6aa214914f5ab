//! End-to-end tests for the detail controller.
//!
//! These drive the controller through the same command sequences a host
//! application issues and check the displayed geometry after each step.

use std::sync::{Arc, Mutex};

use mesh_detail::{
    DetailController, DetailError, DetailEvent, DetailParams, GeometryModel, MidpointSubdivider,
    Subdivider,
};
use nalgebra::Point3;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mesh_detail=debug")
        .with_test_writer()
        .try_init();
}

/// Create a closed cube with 12 triangles, CCW winding from outside.
fn create_test_cube(size: f64) -> GeometryModel {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),    // 0
        Point3::new(size, 0.0, 0.0),   // 1
        Point3::new(size, size, 0.0),  // 2
        Point3::new(0.0, size, 0.0),   // 3
        Point3::new(0.0, 0.0, size),   // 4
        Point3::new(size, 0.0, size),  // 5
        Point3::new(size, size, size), // 6
        Point3::new(0.0, size, size),  // 7
    ];

    let triangles = vec![
        0, 2, 1, 0, 3, 2, // bottom
        4, 5, 6, 4, 6, 7, // top
        0, 1, 5, 0, 5, 4, // front
        3, 7, 6, 3, 6, 2, // back
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];

    GeometryModel::from_parts(vertices, triangles).expect("valid cube")
}

fn single_triangle() -> GeometryModel {
    GeometryModel::from_parts(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![0, 1, 2],
    )
    .expect("valid triangle")
}

/// Collects every event the controller emits.
fn recording_controller() -> (DetailController, Arc<Mutex<Vec<DetailEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut controller = DetailController::new();
    controller.set_event_callback(Box::new(move |event| {
        sink.lock().unwrap().push(event.clone());
    }));

    (controller, events)
}

#[test]
fn test_single_triangle_level_two() {
    init_tracing();
    let mut controller = DetailController::new();
    controller
        .set_source_geometry(single_triangle())
        .expect("valid source");

    controller.request_subdivision_level(2);
    let mesh = controller.current_geometry().expect("displayed");

    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.vertices[3], Point3::new(0.5, 0.0, 0.0));
    assert_eq!(mesh.vertices[4], Point3::new(0.5, 0.5, 0.0));
    assert_eq!(mesh.vertices[5], Point3::new(0.0, 0.5, 0.0));
}

#[test]
fn test_sub_millimetre_source_keeps_unit_normals() {
    let source = GeometryModel::from_parts(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1e-4, 0.0, 0.0),
            Point3::new(0.0, 1e-4, 0.0),
        ],
        vec![0, 1, 2],
    )
    .expect("valid triangle");

    let mut controller = DetailController::new();
    controller.set_source_geometry(source).expect("valid source");

    for level in 1..=4 {
        controller.request_subdivision_level(level);
        let mesh = controller.current_geometry().expect("displayed");
        for n in mesh.normals() {
            assert!((n.norm() - 1.0).abs() < 1e-9, "level {level}: {n:?}");
            assert!((n.z - 1.0).abs() < 1e-9, "level {level}: {n:?}");
        }
    }
}

#[test]
fn test_full_level_ladder_on_cube() {
    init_tracing();
    let cube = create_test_cube(2.0);
    let mut controller = DetailController::new();
    controller.set_source_geometry(cube.clone()).expect("valid");

    let mut expected = 12;
    for level in 2..=4 {
        controller.request_subdivision_level(level);
        expected *= 4;
        let mesh = controller.current_geometry().expect("displayed");
        assert_eq!(mesh.triangle_count(), expected, "level {level}");

        // Subdivision keeps the shape
        let bounds = mesh.bounds().expect("bounds");
        assert_eq!(bounds, cube.bounds().expect("bounds"));
        assert!((mesh.surface_area() - 24.0).abs() < 1e-9);
    }

    for level in (1..=3).rev() {
        controller.request_subdivision_level(level);
        expected /= 4;
        assert_eq!(
            controller
                .current_geometry()
                .expect("displayed")
                .triangle_count(),
            expected
        );
    }

    assert_eq!(controller.cached_levels(), vec![2, 3, 4]);
    assert_eq!(*controller.current_geometry().expect("displayed"), cube);
}

#[test]
fn test_source_never_mutated() {
    let cube = create_test_cube(1.0);
    let mut controller = DetailController::new();
    controller.set_source_geometry(cube.clone()).expect("valid");
    let original = controller.original_geometry().expect("original");

    controller.request_subdivision_level(4);
    controller.request_simplification_ratio(0.3);
    controller.simplify();
    controller.request_subdivision_level(2);
    controller.restore_original();

    assert_eq!(*original, cube);
    assert_eq!(*controller.original_geometry().expect("original"), cube);
}

#[test]
fn test_restore_reproduces_original_exactly() {
    let cube = create_test_cube(1.0);
    let mut controller = DetailController::with_params(DetailParams::new().with_ratio(0.25));
    controller.set_source_geometry(cube.clone()).expect("valid");

    controller.simplify();
    let simplified = controller.current_geometry().expect("displayed");
    // floor(36 * 0.25) = 9 indices
    assert_eq!(simplified.triangle_count(), 3);
    assert_eq!(simplified.vertices, cube.vertices);

    controller.restore_original();
    let restored = controller.current_geometry().expect("displayed");
    assert_eq!(restored.vertices, cube.vertices);
    assert_eq!(restored.triangles, cube.triangles);

    let second = controller.restore_original();
    assert_eq!(second.warning(), Some(&DetailError::InvalidRestoreRequest));
    assert_eq!(*controller.current_geometry().expect("displayed"), cube);
}

#[test]
fn test_every_command_emits_an_event() {
    let (mut controller, events) = recording_controller();

    controller
        .set_source_geometry(create_test_cube(1.0))
        .expect("valid");
    controller.request_subdivision_level(3);
    controller.request_subdivision_level(2);
    controller.simplify();
    controller.restore_original();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 5);
    assert!(matches!(events[0], DetailEvent::SourceSet { triangles: 12, .. }));
    assert!(matches!(
        events[1],
        DetailEvent::LevelChanged {
            from: 1,
            to: 3,
            triangles: 192,
            ..
        }
    ));
    assert!(matches!(
        events[2],
        DetailEvent::LevelChanged {
            from: 3,
            to: 2,
            triangles: 48,
            ..
        }
    ));
    assert!(matches!(
        events[3],
        DetailEvent::Simplified {
            level: 2,
            triangles: 24,
            ..
        }
    ));
    assert_eq!(events[4], DetailEvent::Restored { triangles: 12 });

    for event in events.iter() {
        assert!(!event.to_string().is_empty());
    }
}

#[test]
fn test_commands_may_emit_more_than_they_return() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let mut controller = DetailController::with_params(DetailParams::new().with_level(2));
    controller.set_event_callback(Box::new(move |event| {
        sink.lock().unwrap().push(event.clone());
    }));

    // Configured level is rebuilt after the source is shown
    let returned = controller
        .set_source_geometry(create_test_cube(1.0))
        .expect("valid");
    assert!(matches!(returned, DetailEvent::SourceSet { .. }));

    // Clamp warning precedes the change
    let returned = controller.request_subdivision_level(7);
    assert!(matches!(returned, DetailEvent::LevelChanged { to: 4, .. }));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], DetailEvent::SourceSet { .. }));
    assert!(matches!(
        events[1],
        DetailEvent::LevelChanged { from: 1, to: 2, .. }
    ));
    assert!(matches!(
        events[2].warning(),
        Some(DetailError::LevelOutOfRange { requested: 7, .. })
    ));
    assert_eq!(events[3], returned);
}

#[test]
fn test_missing_source_reported_not_fatal() {
    let (mut controller, events) = recording_controller();

    controller.simplify();
    controller.restore_original();
    controller.request_subdivision_level(3);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    for event in events.iter() {
        assert!(matches!(
            event.warning(),
            Some(DetailError::MissingSource { .. })
        ));
    }
    assert!(controller.current_geometry().is_none());
}

#[test]
fn test_reset_then_new_source() {
    let mut controller = DetailController::new();
    controller
        .set_source_geometry(create_test_cube(1.0))
        .expect("valid");
    controller.request_subdivision_level(3);

    controller.reset();
    assert!(controller.current_geometry().is_none());
    assert!(controller.request_subdivision_level(2).is_warning());

    controller
        .set_source_geometry(single_triangle())
        .expect("valid");
    controller.request_subdivision_level(2);
    assert_eq!(
        controller
            .current_geometry()
            .expect("displayed")
            .triangle_count(),
        4
    );
}

#[test]
fn test_stale_level_after_ratio_change() {
    let mut controller = DetailController::with_params(DetailParams::new().with_ratio(0.5));
    controller
        .set_source_geometry(create_test_cube(1.0))
        .expect("valid");

    controller.request_subdivision_level(2);
    controller.simplify();
    // 6 triangles kept, one pass
    assert_eq!(
        controller
            .current_geometry()
            .expect("displayed")
            .triangle_count(),
        24
    );

    controller.request_simplification_ratio(0.25);
    // Ratio change alone does not rebuild
    assert_eq!(
        controller
            .current_geometry()
            .expect("displayed")
            .triangle_count(),
        24
    );

    // Cached level 3 does not exist yet; it is built from the displayed mesh
    controller.request_subdivision_level(3);
    assert_eq!(
        controller
            .current_geometry()
            .expect("displayed")
            .triangle_count(),
        96
    );

    // Cached level 2 predates simplification and is shown unchanged
    controller.request_subdivision_level(2);
    assert_eq!(
        controller
            .current_geometry()
            .expect("displayed")
            .triangle_count(),
        48
    );

    // A fresh simplify picks up the new ratio
    controller.simplify();
    // floor(36 * 0.25) = 9 -> 3 triangles, one pass
    assert_eq!(
        controller
            .current_geometry()
            .expect("displayed")
            .triangle_count(),
        12
    );
}

/// Subdivider that records the triangle count it was handed.
#[derive(Debug, Default)]
struct RecordingSubdivider {
    inputs: Vec<usize>,
}

impl Subdivider for RecordingSubdivider {
    fn subdivide_pass(&mut self, mesh: &mut GeometryModel) {
        self.inputs.push(mesh.triangle_count());
        MidpointSubdivider.subdivide_pass(mesh);
    }
}

#[test]
fn test_each_pass_refines_previous_output() {
    let mut controller =
        DetailController::with_subdivider(RecordingSubdivider::default(), DetailParams::default());
    controller
        .set_source_geometry(create_test_cube(1.0))
        .expect("valid");

    controller.request_subdivision_level(4);
    assert_eq!(controller.subdivider().inputs, vec![12, 48, 192]);

    controller.request_subdivision_level(1);
    controller.request_subdivision_level(4);
    assert_eq!(controller.subdivider().inputs.len(), 3);
}

#[test]
fn test_shared_controller_behind_mutex() {
    let controller = Arc::new(Mutex::new(DetailController::new()));
    controller
        .lock()
        .unwrap()
        .set_source_geometry(create_test_cube(1.0))
        .expect("valid");

    let handles: Vec<_> = (2..=4)
        .map(|level| {
            let controller = Arc::clone(&controller);
            std::thread::spawn(move || {
                controller.lock().unwrap().request_subdivision_level(level);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let controller = controller.lock().unwrap();
    let level = controller.subdivision_level();
    let expected = 12 * 4usize.pow(level - 1);
    assert_eq!(
        controller
            .current_geometry()
            .expect("displayed")
            .triangle_count(),
        expected
    );
}
