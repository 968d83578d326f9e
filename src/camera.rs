use crate::constants::{CAMERA_EYE, CAMERA_FAR, CAMERA_NEAR};
use glam::{Mat4, Vec3};

/// Right-handed perspective camera with a cached projection.
///
/// The projection only changes when [`Camera::update_projection`] is called,
/// so per-frame FOV easing can skip the rebuild when nothing moved.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    projection: Mat4,
}

impl Camera {
    pub fn new(fov_degrees: f32, aspect: f32) -> Self {
        let eye = Vec3::from_array(CAMERA_EYE);
        let mut camera = Self {
            eye,
            target: eye + Vec3::NEG_Z,
            up: Vec3::Y,
            aspect: aspect.max(1e-4),
            fov_degrees,
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
    }

    /// Point the camera from its eye toward `eye + direction`.
    pub fn aim(&mut self, direction: Vec3) {
        self.target = self.eye + direction;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}
