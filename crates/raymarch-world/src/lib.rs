pub mod error;
pub mod input;
pub mod placement;
pub mod shapes;

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use glam::{IVec3, UVec3, Vec3, Vec4};
use raymarch_core::types::WorldCoord;
use raymarch_core::{RenderParams, Settings, Volume};

pub use error::ShapeError;
pub use input::{Command, CommandState};
pub use placement::{Placement, SceneMap};

/// Primary public struct for the raymarch-world crate.
/// Owns the map of placements, the scrolling window into it, the camera and
/// the orbiting light, and re-derives the composed scene volume every tick.
pub struct SceneState {
    map: SceneMap,
    scene: Volume,
    /// Integer window origin, `round(position)`.
    scene_offset: WorldCoord,
    position: Vec3,
    velocity: Vec3,
    light_position: Vec3,
    camera_position: Vec3,
    camera_target: Vec3,
    near_clip: f32,
    field_of_view: f32,
    fog_distance: f32,
    fog_color: Vec4,
    move_speed: f32,
    light_period: f32,
    max_steps: u32,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl SceneState {
    /// Start with an empty map, the window centred over the map origin on X
    /// and Z, and the camera at the near XY face of the window looking down
    /// towards its floor centre.
    pub fn new(settings: &Settings) -> Self {
        let size = UVec3::from_array(settings.scene_size);
        let half = size.as_vec3() / 2.0;
        let position = Vec3::new(half.x, 0.0, half.z);

        log::info!(
            "Scene state: window {}x{}x{}, fog distance {}",
            size.x,
            size.y,
            size.z,
            settings.fog_distance
        );

        Self {
            map: SceneMap::new(),
            scene: Volume::with_size(size),
            scene_offset: position.round().as_ivec3(),
            position,
            velocity: Vec3::ZERO,
            light_position: Vec3::from_array(settings.light_position),
            camera_position: Vec3::new(half.x, half.y, 0.0),
            camera_target: Vec3::new(half.x, 0.0, half.z),
            near_clip: settings.near_clip,
            field_of_view: settings.field_of_view,
            fog_distance: settings.fog_distance,
            fog_color: Vec4::new(settings.fog_grey, settings.fog_grey, settings.fog_grey, 1.0),
            move_speed: settings.move_speed,
            light_period: settings.light_period,
            max_steps: settings.max_steps,
        }
    }

    /// Advance the scene by `dt` time units and recomposite the window.
    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.scene_offset = self.position.round().as_ivec3();

        self.light_position = orbit_light(self.light_position, dt, self.light_period);
        let grey = fog_grey(self.light_position);
        self.fog_color = Vec4::new(grey, grey, grey, 1.0);

        self.map.composite_into(&mut self.scene, self.scene_offset);
    }

    /// Apply a directional command to the velocity.
    pub fn input(&mut self, command: Command, state: CommandState) {
        let (axis, value) = command.velocity(state, self.move_speed);
        self.velocity[axis] = value;
        log::debug!("{command:?} {state:?}: velocity {}", self.velocity);
    }

    /// Append a placement. Takes effect on the next `update`.
    pub fn add_to_map(&mut self, offset: IVec3, volume: impl Into<Arc<Volume>>) {
        self.map.push(Placement::new(offset, volume));
        log::debug!("Map placement added at {offset}, {} total", self.map.len());
    }

    /// Replace the whole map.
    pub fn set_map(&mut self, map: impl Into<SceneMap>) {
        self.map = map.into();
        log::debug!("Map replaced, {} placements", self.map.len());
    }

    pub fn clear_map(&mut self) {
        self.map.clear();
        log::debug!("Map cleared");
    }

    pub fn map(&self) -> &SceneMap {
        &self.map
    }

    /// Composed window volume as of the last `update`.
    pub fn scene(&self) -> &Volume {
        &self.scene
    }

    /// Per-frame inputs for the shading kernel.
    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            scene_offset: self.scene_offset,
            light_position: self.light_position,
            camera_position: self.camera_position,
            camera_target: self.camera_target,
            near_clip: self.near_clip,
            field_of_view: self.field_of_view,
            fog_distance: self.fog_distance,
            fog_color: self.fog_color,
            max_steps: self.max_steps,
        }
    }

    pub fn scene_offset(&self) -> WorldCoord {
        self.scene_offset
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn light_position(&self) -> Vec3 {
        self.light_position
    }

    pub fn fog_color(&self) -> Vec4 {
        self.fog_color
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub fn set_camera(&mut self, position: Vec3, target: Vec3) {
        self.camera_position = position;
        self.camera_target = target;
    }
}

/// Rotate the light's X/Y pair about the origin by `TAU * dt / period`,
/// keeping its radius, then copy the new X into Z.
pub fn orbit_light(light: Vec3, dt: f32, period: f32) -> Vec3 {
    let radius = light.x.hypot(light.y);
    let angle = light.y.atan2(light.x) + TAU * (dt / period);
    let x = angle.cos() * radius;
    let y = angle.sin() * radius;
    Vec3::new(x, y, x)
}

/// Achromatic fog level for a light position.
pub fn fog_grey(light: Vec3) -> f32 {
    0.8 - 0.7 * (light.x.atan2(light.y) / PI).abs()
}
