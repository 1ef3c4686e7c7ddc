//! Perspective camera

use nalgebra::{Matrix4, Perspective3, UnitQuaternion, Vector3};
use orbitframe_core::{Point2d, Point3d, Ray, Vector3d};

/// Pitch is kept this far away from the poles so `look_at` stays defined
const POLE_MARGIN: f64 = 1e-3;

/// A perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3d,
    pub target: Point3d,
    pub up: Vector3d,
    /// Vertical field of view in radians
    pub fov: f64,
    pub aspect_ratio: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3d,
        target: Point3d,
        up: Vector3d,
        fov: f64,
        aspect_ratio: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    pub fn fov_degrees(&self) -> f64 {
        self.fov.to_degrees()
    }

    pub fn set_fov_degrees(&mut self, degrees: f64) {
        self.fov = degrees.to_radians();
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Move the camera forward
    pub fn move_forward(&mut self, distance: f64) {
        let direction = (self.target - self.position).normalize();
        self.position += direction * distance;
        self.target += direction * distance;
    }

    /// Rotate the camera around the target by yaw about +Y and pitch toward
    /// the poles, keeping the distance.
    pub fn orbit(&mut self, horizontal: f64, vertical: f64) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius == 0.0 {
            return;
        }
        let yaw = offset.x.atan2(offset.z) + horizontal;
        let max_pitch = std::f64::consts::FRAC_PI_2 - POLE_MARGIN;
        let pitch = ((offset.y / radius).asin() + vertical).clamp(-max_pitch, max_pitch);
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -pitch);
        self.position = self.target + rotation * Vector3d::new(0.0, 0.0, radius);
    }

    /// Ray through a point in normalized device coordinates (-1..1, +Y up)
    pub fn ray_from_ndc(&self, ndc: &Point2d) -> Ray {
        let inverse = (self.projection_matrix() * self.view_matrix())
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
        let far = inverse.transform_point(&Point3d::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - self.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3d::new(0.0, 0.0, 5.0),
            Point3d::new(0.0, 0.0, 0.0),
            Vector3d::new(0.0, 1.0, 0.0),
            std::f64::consts::FRAC_PI_4,
            1.0,
            0.1,
            100.0,
        )
    }
}
