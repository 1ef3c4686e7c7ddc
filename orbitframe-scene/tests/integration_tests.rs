//! Integration tests for orbitframe-scene
//!
//! These tests drive a `ModelScene` the way an embedding viewer does: load a
//! model, resize, move the target and run frames.

use approx::assert_relative_eq;
use orbitframe_core::{Error, Hotspot, Point2d, Point3d, Primitive, SceneGraph, Transform3D, Vector3d};
use orbitframe_framing::{default_tan_fov, safe_radius_ratio};
use orbitframe_scene::*;

/// Axis-aligned cube spanning -1..1 on every axis, outward winding
fn create_cube() -> SceneGraph {
    let positions = vec![
        Point3d::new(-1.0, -1.0, -1.0),
        Point3d::new(1.0, -1.0, -1.0),
        Point3d::new(1.0, 1.0, -1.0),
        Point3d::new(-1.0, 1.0, -1.0),
        Point3d::new(-1.0, -1.0, 1.0),
        Point3d::new(1.0, -1.0, 1.0),
        Point3d::new(1.0, 1.0, 1.0),
        Point3d::new(-1.0, 1.0, 1.0),
    ];
    let faces = vec![
        [4, 5, 6], [4, 6, 7], // +z
        [1, 0, 3], [1, 3, 2], // -z
        [5, 1, 2], [5, 2, 6], // +x
        [0, 4, 7], [0, 7, 3], // -x
        [7, 6, 2], [7, 2, 3], // +y
        [0, 1, 5], [0, 5, 4], // -y
    ];
    SceneGraph::from_primitive("cube", Primitive::from_vertices_and_faces(positions, faces))
}

/// The same cube with its center moved to `offset`
fn create_shifted_cube(offset: Vector3d) -> SceneGraph {
    let mut graph = create_cube();
    let root = graph.root();
    graph.get_mut(root).unwrap().transform = Transform3D::translation(offset);
    graph
}

fn animated_cube() -> LoadedModel {
    LoadedModel::new(create_cube()).with_animations(vec![
        AnimationClip::new("idle", 2.0),
        AnimationClip::new("wave", 1.0),
    ])
}

fn loaded_scene() -> ModelScene {
    let mut scene = ModelScene::new(SceneConfig::default());
    scene.set_object(LoadedModel::new(create_cube())).unwrap();
    scene
}

#[test]
fn test_cube_framing() {
    let scene = loaded_scene();

    let ideal = 3.0_f64.sqrt() / safe_radius_ratio();
    assert_relative_eq!(scene.ideal_camera_distance(), ideal, epsilon = 1e-9);
    assert_relative_eq!(
        scene.field_of_view_aspect(),
        2.0_f64.sqrt() / (ideal - 1.0) / default_tan_fov(),
        epsilon = 1e-9
    );
    assert_relative_eq!(scene.model_size(), Vector3d::new(2.0, 2.0, 2.0));
    assert_eq!(scene.bounding_box().center(), Point3d::origin());
}

#[test]
fn test_tight_bounds_match_cube() {
    let config = SceneConfig {
        tight_bounds: true,
        ..SceneConfig::default()
    };
    let mut scene = ModelScene::new(config);
    scene.set_object(LoadedModel::new(create_cube())).unwrap();
    let ideal = 3.0_f64.sqrt() / safe_radius_ratio();
    assert_relative_eq!(scene.ideal_camera_distance(), ideal, epsilon = 1e-9);
}

#[test]
fn test_tight_bounds_frame_off_center_model_about_its_center() {
    let config = SceneConfig {
        tight_bounds: true,
        ..SceneConfig::default()
    };
    let mut scene = ModelScene::new(config);
    let offset = Vector3d::new(10.0, 0.0, 0.0);
    scene.set_object(LoadedModel::new(create_shifted_cube(offset))).unwrap();

    let ideal = 3.0_f64.sqrt() / safe_radius_ratio();
    assert_relative_eq!(scene.ideal_camera_distance(), ideal, epsilon = 1e-9);
    assert_relative_eq!(scene.target(), Point3d::new(10.0, 0.0, 0.0), epsilon = 1e-9);

    // The pivot has already moved the model onto the orbit origin.
    let model_root = scene.model_root().unwrap();
    let position = scene.graph().world_transform(model_root).position();
    assert_relative_eq!(position, Point3d::origin(), epsilon = 1e-9);
}

#[test]
fn test_loose_bounds_center_pivot_on_model() {
    let mut scene = ModelScene::default();
    let offset = Vector3d::new(0.0, 4.0, -3.0);
    scene.set_object(LoadedModel::new(create_shifted_cube(offset))).unwrap();
    assert_relative_eq!(scene.target(), Point3d::from(offset), epsilon = 1e-9);
    assert_relative_eq!(
        scene.ideal_camera_distance(),
        3.0_f64.sqrt() / safe_radius_ratio(),
        epsilon = 1e-9
    );
}

#[test]
fn test_configured_camera_target_wins_over_bounds() {
    let config = SceneConfig {
        camera_target: Some(Point3d::new(0.0, 1.0, 0.0)),
        ..SceneConfig::default()
    };
    let mut scene = ModelScene::new(config);
    scene.set_object(LoadedModel::new(create_cube())).unwrap();
    assert_eq!(scene.target(), Point3d::new(0.0, 1.0, 0.0));

    scene.set_camera_target(None);
    assert_eq!(scene.target(), Point3d::origin());
}

#[test]
fn test_frame_model_is_idempotent() {
    let mut scene = loaded_scene();
    scene.set_size(300.0, 600.0);
    let first = scene.framed_field_of_view();
    scene.frame_model();
    assert_eq!(scene.framed_field_of_view(), first);
    assert!(first >= 45.0);
    assert_relative_eq!(scene.camera().fov_degrees(), first, epsilon = 1e-9);
}

#[test]
fn test_identical_set_size_is_noop() {
    let mut scene = loaded_scene();
    scene.set_size(800.0, 600.0);
    assert!(scene.take_dirty());
    let fov = scene.framed_field_of_view();

    scene.set_size(800.0, 600.0);
    assert!(!scene.is_dirty());
    assert_eq!(scene.framed_field_of_view(), fov);
    assert_relative_eq!(scene.aspect(), 800.0 / 600.0);
}

#[test]
fn test_set_size_clamps_to_one_pixel() {
    let mut scene = ModelScene::default();
    scene.set_size(0.0, -5.0);
    assert_eq!(scene.size(), (1.0, 1.0));
}

#[test]
fn test_jump_to_goal_then_tick_is_clean() {
    let mut scene = loaded_scene();
    scene.take_dirty();

    scene.set_target(0.5, 0.0, 0.0);
    scene.jump_to_goal();
    assert!(scene.take_dirty());
    assert_eq!(scene.target(), Point3d::new(0.5, 0.0, 0.0));

    scene.update_target(16.0);
    assert!(!scene.is_dirty());
}

#[test]
fn test_target_eases_over_frames() {
    let mut scene = loaded_scene();
    scene.take_dirty();
    scene.set_target(0.0, 1.0, 0.0);

    let mut frames = 0;
    while scene.advance_frame(16.0).needs_render {
        frames += 1;
        assert!(frames < 10_000);
    }
    assert!(frames > 1);
    assert_eq!(scene.render_count(), frames);
}

#[test]
fn test_load_supersession() {
    let mut scene = ModelScene::default();
    let first = scene.begin_source(Some("first.glb")).unwrap();
    let second = scene.begin_source(Some("second.glb")).unwrap();
    assert!(first.is_cancelled());
    assert!(second.generation() > first.generation());

    let outcome = scene.finish_source(&first, Ok(LoadedModel::new(create_cube()))).unwrap();
    assert_eq!(outcome, LoadOutcome::Superseded);
    assert_eq!(scene.url(), Some("second.glb"));
    assert!(!scene.has_model());
    assert!(scene.drain_events().is_empty());

    let outcome = scene.finish_source(&second, Ok(LoadedModel::new(create_cube()))).unwrap();
    assert_eq!(outcome, LoadOutcome::Applied);
    assert_eq!(scene.url(), Some("second.glb"));
    assert!(scene.has_model());
    assert_eq!(
        scene.drain_events(),
        vec![SceneEvent::ModelLoad {
            url: Some("second.glb".to_string())
        }]
    );
}

#[test]
fn test_same_or_empty_source_is_unchanged() {
    let mut loader = MemoryLoader::new();
    loader.insert("cube.glb", LoadedModel::new(create_cube()));
    let mut scene = ModelScene::default();

    let outcome = pollster::block_on(scene.set_source(&loader, Some("cube.glb"), &mut |_| {})).unwrap();
    assert_eq!(outcome, LoadOutcome::Applied);
    let nodes = scene.graph().len();

    let mut progress = Vec::new();
    let outcome =
        pollster::block_on(scene.set_source(&loader, Some("cube.glb"), &mut |p| progress.push(p))).unwrap();
    assert_eq!(outcome, LoadOutcome::Unchanged);
    assert_eq!(progress, vec![1.0]);
    assert_eq!(scene.graph().len(), nodes);

    assert!(scene.begin_source(Some("")).is_none());
    assert!(scene.begin_source(None).is_none());
    assert_eq!(scene.url(), Some("cube.glb"));
}

#[test]
fn test_repeated_swaps_reuse_graph_slots() {
    let mut loader = MemoryLoader::new();
    loader.insert("a.glb", LoadedModel::new(create_cube()));
    loader.insert("b.glb", LoadedModel::new(create_cube()));
    let mut scene = ModelScene::default();

    pollster::block_on(scene.set_source(&loader, Some("a.glb"), &mut |_| {})).unwrap();
    let slots = scene.graph().slot_count();
    for i in 0..1000 {
        let url = if i % 2 == 0 { "b.glb" } else { "a.glb" };
        let outcome = pollster::block_on(scene.set_source(&loader, Some(url), &mut |_| {})).unwrap();
        assert_eq!(outcome, LoadOutcome::Applied);
    }
    assert_eq!(scene.graph().slot_count(), slots);
    assert_eq!(scene.graph().len(), slots);
}

#[test]
fn test_load_failure_propagates() {
    let loader = MemoryLoader::new();
    let mut scene = ModelScene::default();
    let result = pollster::block_on(scene.set_source(&loader, Some("missing.glb"), &mut |_| {}));
    match result {
        Err(Error::LoadFailed { url, source }) => {
            assert_eq!(url, "missing.glb");
            assert!(matches!(*source, Error::Io(_)));
        }
        other => panic!("expected LoadFailed, got {other:?}"),
    }
}

#[test]
fn test_cancelled_loader_result_is_silent() {
    let mut scene = ModelScene::default();
    let token = scene.begin_source(Some("cube.glb")).unwrap();
    let outcome = scene.finish_source(&token, Err(Error::LoadCancelled)).unwrap();
    assert_eq!(outcome, LoadOutcome::Superseded);
    assert!(!scene.has_model());
}

#[test]
fn test_reset_clears_model() {
    let mut scene = ModelScene::default();
    scene.set_object(animated_cube()).unwrap();
    scene.play_animation(None, 0.0);
    scene.take_dirty();

    scene.reset();
    assert!(scene.is_dirty());
    assert!(!scene.has_model());
    assert!(scene.url().is_none());
    assert!(!scene.has_active_animation());
    assert!(scene.animation_names().is_empty());
}

#[test]
fn test_hotspot_flips_when_camera_orbits() {
    let mut scene = loaded_scene();
    let id = scene
        .add_hotspot(Hotspot::new("front", Vector3d::z()), Point3d::new(0.0, 0.0, 1.0))
        .unwrap();

    scene.camera_mut().position = Point3d::new(0.0, 0.0, -5.0);
    scene.advance_frame(16.0);
    assert!(!scene.hotspot(id).unwrap().shown);

    scene.camera_mut().orbit(std::f64::consts::PI, 0.0);
    scene.advance_frame(16.0);
    assert!(scene.hotspot(id).unwrap().shown);
}

#[test]
fn test_animation_fallback_and_crossfade() {
    let mut scene = ModelScene::default();
    scene.set_object(animated_cube()).unwrap();
    assert_eq!(scene.animation_names(), ["idle", "wave"]);

    scene.play_animation(Some("wave"), 0.0);
    assert!(scene.has_active_animation());
    assert_relative_eq!(scene.duration(), 1.0);

    scene.play_animation(Some("unknown"), 500.0);
    assert_relative_eq!(scene.duration(), 2.0);

    scene.update_animation(0.25);
    assert_relative_eq!(scene.animation_time(), 0.25);
}

#[test]
fn test_animation_without_clips_is_noop() {
    let mut scene = loaded_scene();
    scene.play_animation(Some("idle"), 0.0);
    assert!(!scene.has_active_animation());
    assert_eq!(scene.duration(), 0.0);
}

#[test]
fn test_paused_scene_switches_without_playing() {
    let mut scene = ModelScene::default();
    scene.set_object(animated_cube()).unwrap();
    scene.set_paused(true);
    scene.play_animation(Some("wave"), 0.0);
    assert!(scene.has_active_animation());
    assert!(!scene.mixer().is_playing());

    scene.set_paused(false);
    assert!(scene.mixer().is_playing());
}

#[test]
fn test_shadow_created_lazily() {
    let mut scene = ModelScene::default();
    scene.set_shadow_intensity(0.5);
    assert!(scene.shadow().is_none());

    scene.set_object(LoadedModel::new(create_cube())).unwrap();
    let shadow = scene.shadow().unwrap();
    assert_eq!(shadow.intensity(), 0.5);
    assert_relative_eq!(shadow.plane_position(), -1.0);
    assert!(scene.is_shadow_dirty());
    assert!(!scene.is_shadow_dirty());

    scene.set_yaw(1.0);
    assert_eq!(scene.shadow().unwrap().rotation(), 1.0);
    assert!(scene.is_shadow_dirty());
}

#[test]
fn test_wall_placement_moves_shadow() {
    let mut scene = loaded_scene();
    scene.set_shadow_intensity(1.0);
    scene.set_placement(Placement::Wall);
    assert_eq!(scene.shadow().unwrap().side(), ShadowSide::Back);
}

#[test]
fn test_point_towards() {
    let mut scene = loaded_scene();
    scene.point_towards(1.0, 0.0);
    assert_relative_eq!(scene.yaw(), std::f64::consts::FRAC_PI_2);
}

#[test]
fn test_pick_front_face() {
    let scene = loaded_scene();
    let hit = scene.position_and_normal_from_point(&Point2d::new(0.1, 0.0)).unwrap();
    assert_relative_eq!(hit.position.z, 1.0, epsilon = 1e-9);
    assert_relative_eq!(hit.position.y, 0.0, epsilon = 1e-9);
    assert!(hit.position.x > 0.0);
    assert_relative_eq!(hit.normal, Vector3d::z(), epsilon = 1e-9);

    assert!(scene
        .position_and_normal_from_point(&Point2d::new(0.99, 0.99))
        .is_none());
}

#[test]
fn test_external_framing_info() {
    let mut scene = loaded_scene();
    scene.apply_framing_info(2.0, 1.5);
    assert_relative_eq!(scene.ideal_camera_distance(), 2.0 / safe_radius_ratio());
    assert_relative_eq!(scene.field_of_view_aspect(), 1.5);
}
