//! The model scene: owns the loaded model, its framing, the damped pivot,
//! shadow and animation state, and the dirty flag the render loop consumes.
//!
//! The transform hierarchy is
//!
//! ```text
//! Scene (yaw about +Y)
//! └── Target (pivot translation)
//!     ├── ModelContainer
//!     │   └── loaded model
//!     └── hotspots
//! ```

use crate::animation::{ActionId, AnimationMixer};
use crate::camera::Camera;
use crate::config::{Placement, SceneConfig};
use crate::loader::{LoadOutcome, LoadToken, LoadedModel, ModelLoader};
use crate::shadow::Shadow;
use orbitframe_core::{
    BoundingBox, Error, NodeId, Point2d, Point3d, Result, SceneGraph, Transform3D, Vector3d,
};
use orbitframe_framing::{
    compute_framing, framed_field_of_view, loose_bounding_box, tight_bounding_box, Framing,
    TargetTracker, DEFAULT_FOV_DEG, SETTLING_TIME_MS,
};
use std::collections::HashMap;

/// Notifications for the embedding layer
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// A model finished loading and is framed
    ModelLoad { url: Option<String> },
}

/// What the render loop has to do after [`ModelScene::advance_frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    pub needs_render: bool,
    pub shadow_needs_render: bool,
}

/// A world-space surface point found by picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub position: Point3d,
    pub normal: Vector3d,
}

#[derive(Debug, Clone)]
struct CurrentModel {
    root: NodeId,
}

pub struct ModelScene {
    pub(crate) graph: SceneGraph,
    pub(crate) target_node: NodeId,
    container: NodeId,

    camera: Camera,
    xr_camera: Option<Camera>,
    width: f64,
    height: f64,
    aspect: f64,
    dirty: bool,
    render_count: u64,

    url: Option<String>,
    current_model: Option<CurrentModel>,
    bounding_box: BoundingBox,
    size: Vector3d,
    framing: Framing,
    framed_field_of_view: f64,
    tight_bounds: bool,

    tracker: TargetTracker,
    camera_target: Option<Point3d>,
    yaw: f64,

    shadow: Option<Shadow>,
    shadow_intensity: f64,
    shadow_softness: f64,
    placement: Placement,

    mixer: AnimationMixer,
    animation_names: Vec<String>,
    animations_by_name: HashMap<String, usize>,
    current_action: Option<ActionId>,
    paused: bool,

    generation: u64,
    pending_load: Option<LoadToken>,
    events: Vec<SceneEvent>,
}

impl ModelScene {
    pub fn new(config: SceneConfig) -> Self {
        let mut graph = SceneGraph::new("ModelScene");
        let root = graph.root();
        let target_node = graph.add_group(root, "Target").unwrap_or(root);
        let container = graph.add_group(target_node, "ModelContainer").unwrap_or(target_node);

        let mut tracker = TargetTracker::new();
        tracker.set_decay_time(config.target_decay_ms);

        let mut scene = Self {
            graph,
            target_node,
            container,
            // Replaced by the framed values once a model loads.
            camera: Camera::default(),
            xr_camera: None,
            width: 1.0,
            height: 1.0,
            aspect: 1.0,
            dirty: false,
            render_count: 0,
            url: None,
            current_model: None,
            bounding_box: BoundingBox::empty(),
            size: Vector3d::zeros(),
            framing: Framing::default(),
            framed_field_of_view: DEFAULT_FOV_DEG,
            tight_bounds: config.tight_bounds,
            tracker,
            camera_target: config.camera_target,
            yaw: 0.0,
            shadow: None,
            shadow_intensity: config.shadow_intensity,
            shadow_softness: config.shadow_softness,
            placement: config.placement,
            mixer: AnimationMixer::new(),
            animation_names: Vec::new(),
            animations_by_name: HashMap::new(),
            current_action: None,
            paused: config.paused,
            generation: 0,
            pending_load: None,
            events: Vec::new(),
        };
        scene.set_size(config.width, config.height);
        scene
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_xr_camera(&mut self, camera: Option<Camera>) {
        self.xr_camera = camera;
        self.dirty = true;
    }

    /// The camera to render with: the XR camera while a session runs
    pub fn get_camera(&self) -> &Camera {
        self.xr_camera.as_ref().unwrap_or(&self.camera)
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn has_model(&self) -> bool {
        self.current_model.is_some()
    }

    /// Root node of the installed model, if any
    pub fn model_root(&self) -> Option<NodeId> {
        self.current_model.as_ref().map(|m| m.root)
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    // Dirty tracking

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return the dirty flag and clear it
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // Source loading

    /// Start a source change. Returns `None` without touching anything when
    /// `url` is empty or already current; otherwise cancels any load still in
    /// flight, clears the scene and returns the token for the new load.
    pub fn begin_source(&mut self, url: Option<&str>) -> Option<LoadToken> {
        let url = url.filter(|u| !u.is_empty())?;
        if self.url.as_deref() == Some(url) {
            return None;
        }
        self.reset();
        self.url = Some(url.to_string());

        if let Some(previous) = self.pending_load.take() {
            log::debug!("cancelling load #{} in favour of {url}", previous.generation());
            previous.cancel();
        }
        self.generation += 1;
        let token = LoadToken::new(self.generation);
        self.pending_load = Some(token.clone());
        log::debug!("loading {url} as #{}", token.generation());
        Some(token)
    }

    /// Apply the result of the load identified by `token`. Results of
    /// superseded loads are dropped and reported as [`LoadOutcome::Superseded`].
    pub fn finish_source(&mut self, token: &LoadToken, result: Result<LoadedModel>) -> Result<LoadOutcome> {
        let is_current = self
            .pending_load
            .as_ref()
            .is_some_and(|pending| pending.generation() == token.generation());
        if !is_current || token.is_cancelled() {
            log::debug!("discarding result of superseded load #{}", token.generation());
            if let Ok(model) = result {
                model.dispose();
            }
            return Ok(LoadOutcome::Superseded);
        }
        self.pending_load = None;

        let url = self.url.clone();
        let model = match result {
            Ok(model) => model,
            Err(err) if err.is_cancellation() => return Ok(LoadOutcome::Superseded),
            Err(err) => {
                let url = url.unwrap_or_default();
                log::debug!("load of {url} failed: {err}");
                return Err(Error::load_failed(url, err));
            }
        };

        self.reset();
        self.url = url;
        self.install_model(model)?;
        self.setup_scene();
        Ok(LoadOutcome::Applied)
    }

    /// Load `url` through `loader` and frame the result. A url that is empty
    /// or already current reports full progress and changes nothing.
    pub async fn set_source<L: ModelLoader>(
        &mut self,
        loader: &L,
        url: Option<&str>,
        progress: &mut dyn FnMut(f32),
    ) -> Result<LoadOutcome> {
        let Some(token) = self.begin_source(url) else {
            progress(1.0);
            return Ok(LoadOutcome::Unchanged);
        };
        let url = self.url.clone().unwrap_or_default();
        let result = loader.load(&url, &token, progress).await;
        self.finish_source(&token, result)
    }

    /// Install an already decoded model directly
    pub fn set_object(&mut self, model: LoadedModel) -> Result<()> {
        self.reset();
        self.install_model(model)?;
        self.setup_scene();
        Ok(())
    }

    fn install_model(&mut self, model: LoadedModel) -> Result<()> {
        let root = self.graph.graft(self.container, &model.graph)?;
        self.animation_names = model.animations.iter().map(|clip| clip.name.clone()).collect();
        self.animations_by_name = model
            .animations
            .iter()
            .enumerate()
            .map(|(index, clip)| (clip.name.clone(), index))
            .collect();
        self.mixer.set_clips(model.animations.clone());
        self.current_model = Some(CurrentModel { root });
        model.dispose();
        Ok(())
    }

    fn setup_scene(&mut self) {
        self.update_bounding_box();
        let target = self.resolve_camera_target();
        self.set_target(target.x, target.y, target.z);
        self.update_framing(self.tight_bounds.then_some(target));
        self.jump_to_goal();
        self.frame_model();
        self.update_shadow();
        self.set_shadow_intensity(self.shadow_intensity);
        self.events.push(SceneEvent::ModelLoad {
            url: self.url.clone(),
        });
    }

    /// Remove the current model and stop its animations
    pub fn reset(&mut self) {
        self.url = None;
        self.dirty = true;
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.set_intensity(0.0);
        }
        if self.current_model.take().is_some() {
            if let Err(err) = self.graph.clear_children(self.container) {
                log::error!("failed to remove model: {err}");
            }
        }
        if let Some(action) = self.current_action.take() {
            self.mixer.stop(action);
        }
        self.mixer.stop_all();
        self.mixer.uncache();
        self.animation_names.clear();
        self.animations_by_name.clear();
    }

    // Size and framing

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Resize the viewport. Framing is viewport independent, so only the
    /// field of view is re-derived.
    pub fn set_size(&mut self, width: f64, height: f64) {
        let (width, height) = (width.max(1.0), height.max(1.0));
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.aspect = width / height;
        self.frame_model();
        self.dirty = true;
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Extent of the model's bounding box
    pub fn model_size(&self) -> Vector3d {
        self.size
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn ideal_camera_distance(&self) -> f64 {
        self.framing.ideal_camera_distance
    }

    pub fn field_of_view_aspect(&self) -> f64 {
        self.framing.field_of_view_aspect
    }

    /// Vertical field of view for the current aspect, in degrees
    pub fn framed_field_of_view(&self) -> f64 {
        self.framed_field_of_view
    }

    pub fn set_tight_bounds(&mut self, tight_bounds: bool) {
        self.tight_bounds = tight_bounds;
    }

    /// Recompute the model bounds in pivot space
    pub fn update_bounding_box(&mut self) {
        self.bounding_box = if self.tight_bounds {
            tight_bounding_box(&self.graph, self.container)
        } else {
            loose_bounding_box(&self.graph, self.container)
        };
        self.size = self.bounding_box.size();
    }

    /// Recompute the viewport-independent framing about `center`, or about
    /// the bounding box center when none is given.
    pub fn update_framing(&mut self, center: Option<Point3d>) {
        let center = center.unwrap_or_else(|| self.bounding_box.center());
        self.framing = compute_framing(&self.graph, self.container, Some(center));
    }

    /// Take framing measured elsewhere, such as by an external renderer
    pub fn apply_framing_info(&mut self, framed_radius: f64, field_of_view_aspect: f64) {
        self.framing = Framing::from_framed_radius(framed_radius, field_of_view_aspect);
        self.frame_model();
        self.dirty = true;
    }

    /// Derive the vertical field of view for the current aspect
    pub fn frame_model(&mut self) {
        self.framed_field_of_view = framed_field_of_view(self.framing.field_of_view_aspect, self.aspect);
        self.camera.set_fov_degrees(self.framed_field_of_view);
        self.camera.aspect_ratio = self.aspect;
    }

    // Target

    /// The configured pivot, or `None` when it follows the model's bounds
    pub fn camera_target(&self) -> Option<Point3d> {
        self.camera_target
    }

    /// Choose the pivot applied when a model is set up. `None` centers it on
    /// the bounding box. Takes effect immediately when a model is loaded.
    pub fn set_camera_target(&mut self, target: Option<Point3d>) {
        self.camera_target = target;
        if self.current_model.is_some() {
            let target = self.resolve_camera_target();
            self.set_target(target.x, target.y, target.z);
        }
    }

    fn resolve_camera_target(&self) -> Point3d {
        self.camera_target.unwrap_or_else(|| self.bounding_box.center())
    }

    /// Set the point, in model coordinates, the model pivots around
    pub fn set_target(&mut self, model_x: f64, model_y: f64, model_z: f64) {
        self.tracker.set_goal(Point3d::new(model_x, model_y, model_z));
    }

    /// The pivot goal in model coordinates
    pub fn target(&self) -> Point3d {
        self.tracker.target()
    }

    /// Decay time of target transitions
    pub fn set_target_damper_decay_time(&mut self, decay_milliseconds: f64) {
        self.tracker.set_decay_time(decay_milliseconds);
    }

    /// Move the pivot to its goal immediately instead of easing in
    pub fn jump_to_goal(&mut self) {
        self.update_target(SETTLING_TIME_MS);
    }

    /// Ease the pivot toward its goal; call every frame with the frame delta
    pub fn update_target(&mut self, delta_ms: f64) {
        if self.tracker.tick(delta_ms, self.framing.ideal_camera_distance) {
            let translation = Transform3D::translation(self.tracker.pivot_translation());
            if let Some(node) = self.graph.get_mut(self.target_node) {
                node.transform = translation;
            }
            self.set_shadow_rotation(self.yaw);
            self.dirty = true;
        }
    }

    // Yaw

    /// Orientation of the scene about +Y, around the pivot
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn set_yaw(&mut self, radians_y: f64) {
        self.yaw = radians_y;
        let root = self.graph.root();
        if let Some(node) = self.graph.get_mut(root) {
            node.transform = Transform3D::rotation_y(radians_y);
        }
        self.set_shadow_rotation(radians_y);
        self.dirty = true;
    }

    /// Yaw the model's front (+Z) toward a world position
    pub fn point_towards(&mut self, world_x: f64, world_z: f64) {
        let position = self.graph.world_transform(self.graph.root()).position();
        self.set_yaw((world_x - position.x).atan2(world_z - position.z));
    }

    // Animation

    pub fn animation_names(&self) -> &[String] {
        &self.animation_names
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume playback of the current animation
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if !paused {
            if let Some(action) = self.current_action {
                if let Err(err) = self.mixer.play(action) {
                    log::error!("cannot resume animation: {err}");
                }
            }
        }
    }

    /// Play the clip called `name`, falling back to the first clip when the
    /// name is missing or unknown, crossfading from the previous clip over
    /// `crossfade_ms`. Problems are logged and leave playback unchanged.
    pub fn play_animation(&mut self, name: Option<&str>, crossfade_ms: f64) {
        if self.current_model.is_none() {
            return;
        }
        if self.mixer.clips().is_empty() {
            log::warn!("Cannot play animation: {}", Error::AnimationUnavailable);
            return;
        }
        let clip_index = name
            .and_then(|name| self.animations_by_name.get(name).copied())
            .unwrap_or(0);

        if let Err(err) = self.start_action(clip_index, crossfade_ms) {
            log::error!("Cannot play animation: {err}");
        }
    }

    fn start_action(&mut self, clip_index: usize, crossfade_ms: f64) -> Result<()> {
        let last_action = self.current_action;
        let action = self.mixer.clip_action(clip_index)?;

        if self.paused {
            self.mixer.stop_all();
            self.current_action = Some(action);
            return Ok(());
        }
        if let Some(last_action) = last_action.filter(|last| *last != action) {
            self.mixer.cross_fade(action, last_action, crossfade_ms / 1000.0)?;
        }
        self.mixer.play(action)?;
        self.current_action = Some(action);
        self.dirty = true;
        Ok(())
    }

    pub fn stop_animation(&mut self) {
        self.current_action = None;
        self.mixer.stop_all();
    }

    /// Advance animations by `delta_seconds`
    pub fn update_animation(&mut self, delta_seconds: f64) {
        if self.paused || !self.mixer.is_playing() {
            return;
        }
        self.mixer.update(delta_seconds);
        self.dirty = true;
    }

    pub fn animation_time(&self) -> f64 {
        self.current_action
            .and_then(|action| self.mixer.action(action))
            .map_or(0.0, |action| action.time)
    }

    pub fn set_animation_time(&mut self, time: f64) {
        self.mixer.set_time(time);
        self.dirty = true;
    }

    /// Length of the current clip in seconds
    pub fn duration(&self) -> f64 {
        self.current_action
            .and_then(|action| self.mixer.clip(action))
            .map_or(0.0, |clip| clip.duration)
    }

    pub fn has_active_animation(&self) -> bool {
        self.current_action.is_some()
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    // Shadow

    pub fn shadow(&self) -> Option<&Shadow> {
        self.shadow.as_ref()
    }

    /// Refit the shadow after the model's shape changed (not for yaw)
    pub fn update_shadow(&mut self) {
        let side = self.placement.shadow_side();
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.set_scene(&self.bounding_box, self.shadow_softness, side);
            shadow.set_rotation(self.yaw);
        }
    }

    /// Set the shadow intensity, creating the shadow on first use
    pub fn set_shadow_intensity(&mut self, shadow_intensity: f64) {
        self.shadow_intensity = shadow_intensity;
        if self.current_model.is_none() {
            return;
        }
        if shadow_intensity <= 0.0 && self.shadow.is_none() {
            return;
        }
        let (bounds, softness, side, yaw) = (
            self.bounding_box,
            self.shadow_softness,
            self.placement.shadow_side(),
            self.yaw,
        );
        let shadow = self.shadow.get_or_insert_with(|| {
            let mut shadow = Shadow::new(&bounds, softness, side);
            shadow.set_rotation(yaw);
            shadow
        });
        shadow.set_intensity(shadow_intensity);
    }

    /// Set the shadow softness in [0, 1]. Reallocates the shadow map, so it
    /// should not change often.
    pub fn set_shadow_softness(&mut self, softness: f64) {
        self.shadow_softness = softness;
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.set_softness(softness);
        }
    }

    /// Match the shadow to a global rotation about +Y
    pub fn set_shadow_rotation(&mut self, radians_y: f64) {
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.set_rotation(radians_y);
        }
    }

    pub fn set_shadow_scale_and_offset(&mut self, scale: f64, offset: f64) {
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.set_scale_and_offset(scale, offset);
        }
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
        self.update_shadow();
    }

    /// Whether the shadow needs a re-render; clears the request
    pub fn is_shadow_dirty(&mut self) -> bool {
        self.shadow.as_mut().is_some_and(|shadow| shadow.take_needs_update())
    }

    // Frame driver

    /// Run one frame of updates: pivot easing, animation, hotspot facing.
    /// Consumes the dirty flags and counts the frame when it needs a render.
    pub fn advance_frame(&mut self, delta_ms: f64) -> FrameOutcome {
        self.update_target(delta_ms);
        self.update_animation(delta_ms / 1000.0);
        let viewer = self.get_camera().position;
        self.update_hotspots(&viewer);

        let shadow_needs_render = self.is_shadow_dirty();
        let needs_render = self.take_dirty() || shadow_needs_render;
        if needs_render {
            self.render_count += 1;
        }
        FrameOutcome {
            needs_render,
            shadow_needs_render,
        }
    }

    // Picking

    /// World position and world normal of the model surface under a point
    /// in normalized device coordinates, if any.
    pub fn position_and_normal_from_point(&self, ndc: &Point2d) -> Option<SurfaceHit> {
        let model = self.current_model.as_ref()?;
        let ray = self.get_camera().ray_from_ndc(ndc);
        let mut closest: Option<(f64, SurfaceHit)> = None;

        for id in self.graph.descendants(model.root) {
            let Some(primitive) = self.graph.get(id).and_then(|node| node.primitive()) else {
                continue;
            };
            let world = self.graph.world_transform(id);
            for instance in primitive.instance_transforms() {
                let to_world = world * instance;
                let Some(to_local) = to_world.inverse() else {
                    continue;
                };
                let Some(hit) = primitive.raycast(&ray.transformed(&to_local)) else {
                    continue;
                };
                let position = to_world.transform_point(&hit.point);
                let distance = (position - ray.origin).norm();
                if closest.as_ref().is_some_and(|(best, _)| *best <= distance) {
                    continue;
                }
                let normal_matrix = to_local.matrix.fixed_view::<3, 3>(0, 0).transpose();
                let normal = (normal_matrix * hit.normal)
                    .try_normalize(f64::EPSILON)
                    .unwrap_or(hit.normal);
                closest = Some((distance, SurfaceHit { position, normal }));
            }
        }
        closest.map(|(_, hit)| hit)
    }
}

impl Default for ModelScene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
