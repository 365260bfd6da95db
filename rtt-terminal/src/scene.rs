/// Demo scene: a small open box of walls with a cuboid, a sphere, a pillar
/// and an orbiting lamp
use nalgebra::{Point3, Vector3};
use rtt_core::light::LAMP_SIZE;
use rtt_core::shader::uniforms;
use rtt_core::{
    Cuboid, GeometryError, Light, Material, Rectangle, Shader, Shape, Sphere, VertexBuffer, Wall,
};

use crate::camera::Camera;
use crate::renderer::{AsciiRenderer, AsciiShader};

/// Radius of the lamp's orbit around its resting place, in world units
const LIGHT_ORBIT_RADIUS: f32 = 0.5;
/// Degrees per second the cuboid spins on the spot
const CUBOID_SPIN_SPEED: f32 = 15.0;

/// Half length of each coordinate axis drawn through the origin
const AXIS_EXTENT: f32 = 2.0;
/// Axis directions with their colors: x red, y green, z blue
const AXES: [([f32; 3], [f32; 3]); 3] = [
    ([1.0, 0.0, 0.0], [0.9, 0.2, 0.1]),
    ([0.0, 1.0, 0.0], [0.1, 0.9, 0.1]),
    ([0.0, 0.0, 1.0], [0.2, 0.5, 1.0]),
];

pub struct Scene {
    cuboid: Cuboid,
    fixtures: Vec<Box<dyn Shape>>,
    light: Light,
    light_speed: f32,
}

impl Scene {
    pub fn demo(sphere_density: u32, light_speed: f32) -> Result<Self, GeometryError> {
        let gold = Material::new(0.5, 0.0, 0.5, Vector3::new(1.0, 0.83, 0.3));
        let grey = Material::new(0.5, 0.0, 0.5, Vector3::new(0.5, 0.5, 0.5));
        let light_grey = Material::new(0.5, 0.0, 0.5, Vector3::new(0.8, 0.8, 0.8));

        let light = Light::new(Vector3::new(1.4, 1.4, 1.4))?;

        let mut cuboid = Cuboid::new(&gold);
        cuboid.translate(&Vector3::new(0.1, 2.1, -0.5), true);
        cuboid.sculpt(&Vector3::new(0.7, 0.7, 0.7));

        let mut sphere = Sphere::new(&gold, sphere_density)?;
        sphere.translate(&Vector3::new(-0.8, 2.4, -0.9), true);
        sphere.sculpt(&Vector3::new(0.5, 0.5, 0.5));

        let mut pillar = Rectangle::new(&grey, 0.3, 0.3, 1.2)?;
        pillar.translate(&Vector3::new(0.9, 2.6, -0.9), true);

        let mut floor = Wall::new(&light_grey);
        floor.translate(&Vector3::new(0.0, 1.5, -1.5), true);
        floor.sculpt(&Vector3::new(3.0, 3.0, 3.0));

        let mut far_wall = Wall::new(&light_grey);
        far_wall.translate(&Vector3::new(0.0, 3.0, 0.0), true);
        far_wall.rotate(90.0, &Vector3::x(), true);
        far_wall.sculpt(&Vector3::new(3.0, 3.0, 3.0));

        let mut left_wall = Wall::new(&light_grey);
        left_wall.translate(&Vector3::new(-1.5, 1.5, 0.0), true);
        left_wall.rotate(90.0, &Vector3::y(), true);
        left_wall.sculpt(&Vector3::new(3.0, 3.0, 3.0));

        log_projection_plane(&light_grey)?;

        Ok(Self {
            cuboid,
            fixtures: vec![
                Box::new(sphere),
                Box::new(pillar),
                Box::new(floor),
                Box::new(far_wall),
                Box::new(left_wall),
            ],
            light,
            light_speed,
        })
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn cuboid(&self) -> &Cuboid {
        &self.cuboid
    }

    /// Pose the animated shapes for the frame at `elapsed` seconds.
    ///
    /// The motion is transient, so it is rebuilt from scratch every frame.
    pub fn animate(&mut self, elapsed: f32) {
        let angle = (elapsed * self.light_speed).to_radians();
        let orbit = Vector3::new(angle.cos() - 1.0, angle.sin(), 0.0) * LIGHT_ORBIT_RADIUS;
        // Lamp space is scaled down to the size of the marker
        self.light.translate(&(orbit / LAMP_SIZE));

        self.cuboid
            .rotate(elapsed * CUBOID_SPIN_SPEED, &Vector3::z(), false);
    }

    /// Draw every lit shape through `shader`
    pub fn draw_shapes(
        &mut self,
        camera: &Camera,
        shader: &dyn Shader,
        buffer: &mut dyn VertexBuffer,
    ) {
        shader.use_program();
        feed_camera(camera, shader);
        self.light.apply(shader);

        self.cuboid.draw(shader, buffer);
        for shape in self.fixtures.iter_mut() {
            shape.draw(shader, buffer);
        }
    }

    /// Draw the lamp marker through `shader`
    pub fn draw_light(
        &mut self,
        camera: &Camera,
        shader: &dyn Shader,
        buffer: &mut dyn VertexBuffer,
    ) {
        shader.use_program();
        feed_camera(camera, shader);
        self.light.draw(shader, buffer);
    }

    /// Draw the world coordinate axes as unlit segments
    pub fn draw_axes(camera: &Camera, shader: &AsciiShader, renderer: &mut AsciiRenderer) {
        shader.use_program();
        feed_camera(camera, shader);

        for (direction, color) in AXES {
            let half = Vector3::from(direction) * AXIS_EXTENT;
            renderer.draw_segment(
                shader,
                &Point3::from(-half),
                &Point3::from(half),
                &Vector3::from(color),
            );
        }
    }
}

fn feed_camera(camera: &Camera, shader: &dyn Shader) {
    shader.feed_matrix(uniforms::VIEW, &camera.view_matrix());
    shader.feed_matrix(uniforms::PROJECTION, &camera.projection_matrix());
    shader.feed_vector3(uniforms::VIEW_POSITION, &camera.position.coords);
}

/// The screen plane a ray tracing pass would shoot through; only its corners
/// are reported.
fn log_projection_plane(material: &Material) -> Result<(), GeometryError> {
    let mut plane = Wall::new(material);
    plane.rotate(90.0, &Vector3::x(), true);
    plane.sculpt(&Vector3::new(5.3, 5.3, 5.3));

    for (i, j) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let corner = plane.corner(i, j)?;
        log::info!(
            "projection plane corner ({}, {}) at {:.3}, {:.3}, {:.3}",
            i,
            j,
            corner.x,
            corner.y,
            corner.z
        );
    }
    Ok(())
}
