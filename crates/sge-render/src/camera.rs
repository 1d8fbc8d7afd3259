//! Yaw/pitch fly camera and screen-space picking.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Initial yaw in degrees; looks down -Z.
pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
/// Vertical field of view in degrees.
pub const DEFAULT_ZOOM: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;
/// Pitch is clamped to this many degrees either side of the horizon.
pub const PITCH_LIMIT: f32 = 89.0;

/// Perspective camera driven by Euler yaw and pitch (degrees).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    view: Mat4,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera3D {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            zoom: DEFAULT_ZOOM,
            view: Mat4::IDENTITY,
        };
        camera.recalculate();
        camera
    }

    /// Recompute the basis vectors from yaw/pitch, then the view matrix.
    pub fn recalculate(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
        self.view = Mat4::look_at_rh(self.position, self.position + self.front, self.up);
    }

    /// View matrix as of the last [`recalculate`](Self::recalculate).
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// OpenGL-style perspective projection for the given aspect ratio.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect_ratio, NEAR_PLANE, FAR_PLANE)
    }

    /// Apply a yaw/pitch offset in degrees, clamping pitch.
    pub fn rotate(&mut self, yaw_offset: f32, pitch_offset: f32) {
        self.yaw += yaw_offset;
        self.pitch = (self.pitch + pitch_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.recalculate();
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.recalculate();
    }
}

/// Direction of the world-space ray under a cursor position.
///
/// `cursor` is in pixels with a top-left origin. The result is normalized
/// and starts at the camera position.
pub fn screen_to_world_ray(cursor: Vec2, viewport: Vec2, projection: Mat4, view: Mat4) -> Vec3 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        log::warn!("Picking with an empty viewport {viewport}");
        return Vec3::ZERO;
    }

    let ndc = Vec2::new(
        2.0 * cursor.x / viewport.x - 1.0,
        1.0 - 2.0 * cursor.y / viewport.y,
    );
    let clip = Vec4::new(ndc.x, ndc.y, -1.0, 1.0);

    let eye = projection.inverse() * clip;
    let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);

    (view.inverse() * eye).truncate().normalize_or_zero()
}
