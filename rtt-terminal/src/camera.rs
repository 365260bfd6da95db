/// Look-at camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};
use rtt_core::Transform;
use serde::Deserialize;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Camera on the -Y axis looking at the origin with +Z up
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, -3.0, 0.0),
            target: Point3::origin(),
            up: Vector3::z(),
            fov: 45.0,
            aspect: Self::cell_aspect(width, height),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    fn cell_aspect(width: u32, height: u32) -> f32 {
        width as f32 * CELL_ASPECT / height.max(1) as f32
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = Self::cell_aspect(width, height);
    }

    /// Orbit the camera position around the origin by `angle` degrees
    pub fn rotate(&mut self, angle: f32, axis: &Vector3<f32>) {
        if let Some(rotation) = Transform::rotation_matrix(angle, axis) {
            self.position = Point3::from(rotation.transform_vector(&self.position.coords));
        }
    }

    /// Move the camera along its line to the origin
    pub fn scale(&mut self, factor: f32) {
        self.position = Point3::from(self.position.coords * factor);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov.to_radians(), self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(80, 40);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_centres_target() {
        let camera = Camera::new(80, 40);
        let view = camera.view_matrix();
        let target = view.transform_point(&camera.target);
        // Right-handed view space looks down -Z
        assert_relative_eq!(target, Point3::new(0.0, 0.0, -3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_scale_and_rotate_move_position() {
        let mut camera = Camera::default();
        camera.scale(2.0);
        assert_relative_eq!(camera.position, Point3::new(0.0, -6.0, 0.0));

        camera.rotate(90.0, &Vector3::z());
        assert_relative_eq!(camera.position, Point3::new(6.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_orthographic_projection_is_affine() {
        let mut camera = Camera::default();
        camera.mode = ProjectionMode::Orthographic;
        let projection = camera.projection_matrix();
        assert_relative_eq!(projection[(3, 3)], 1.0);
    }
}
