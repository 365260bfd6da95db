/// Point light drawn as a small lamp sphere
use nalgebra::{Point3, Vector3};

use crate::error::GeometryError;
use crate::material::{LightProperties, Material};
use crate::shader::{uniforms, Shader, VertexBuffer};
use crate::shape::{Shape, Sphere};

pub const LAMP_DENSITY: u32 = 20;
pub const LAMP_SIZE: f32 = 0.05;

/// A light whose position lives in its lamp sphere's transform.
///
/// The lamp is placed persistently at construction. Every later
/// translate/rotate/scale is transient and must be reapplied each frame.
#[derive(Debug, Clone)]
pub struct Light {
    lamp: Sphere,
    properties: LightProperties,
}

impl Light {
    /// White light at `location`
    pub fn new(location: Vector3<f32>) -> Result<Self, GeometryError> {
        Self::with_color(location, Vector3::new(1.0, 1.0, 1.0))
    }

    pub fn with_color(location: Vector3<f32>, color: Vector3<f32>) -> Result<Self, GeometryError> {
        let properties = LightProperties::from_color(color);
        let material = Material::new(0.0, 0.0, 1.0, properties.specular);

        let mut lamp = Sphere::new(&material, LAMP_DENSITY)?;
        lamp.translate(&location, true);
        lamp.scale(&Vector3::repeat(LAMP_SIZE), true);

        Ok(Self { lamp, properties })
    }

    /// `offset` is in lamp space, which is scaled down by [`LAMP_SIZE`]
    pub fn translate(&mut self, offset: &Vector3<f32>) {
        self.lamp.translate(offset, false);
    }

    /// Rotate the lamp by `angle` degrees around `axis` for the current frame
    pub fn rotate(&mut self, angle: f32, axis: &Vector3<f32>) {
        self.lamp.rotate(angle, axis, false);
    }

    pub fn scale(&mut self, factors: &Vector3<f32>) {
        self.lamp.scale(factors, false);
    }

    pub fn location(&self) -> Point3<f32> {
        self.lamp.centre()
    }

    pub fn properties(&self) -> &LightProperties {
        &self.properties
    }

    pub fn lamp(&self) -> &Sphere {
        &self.lamp
    }

    /// Feed the light's position and colors to a shading program
    pub fn apply(&self, shader: &dyn Shader) {
        shader.feed_vector3(uniforms::LIGHT_POSITION, &self.location().coords);
        shader.feed_vector3(uniforms::LIGHT_AMBIENT, &self.properties.ambient);
        shader.feed_vector3(uniforms::LIGHT_DIFFUSE, &self.properties.diffuse);
        shader.feed_vector3(uniforms::LIGHT_SPECULAR, &self.properties.specular);
    }

    pub fn draw(&mut self, shader: &dyn Shader, buffer: &mut dyn VertexBuffer) {
        self.lamp.draw(shader, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingBuffer, RecordingShader, Uniform};
    use approx::assert_relative_eq;

    #[test]
    fn test_light_is_placed_and_sized() {
        let light = Light::new(Vector3::new(1.4, 1.4, 1.4)).unwrap();
        assert_relative_eq!(light.location(), Point3::new(1.4, 1.4, 1.4), epsilon = 1e-6);
        assert_eq!(light.lamp().density(), LAMP_DENSITY);

        let baked = light.lamp().core().transform().baked();
        assert_relative_eq!(baked[(0, 0)], LAMP_SIZE);
        assert_eq!(light.lamp().core().material().reflect(), 1.0);
    }

    #[test]
    fn test_light_colors() {
        let light = Light::with_color(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.5)).unwrap();
        let props = light.properties();
        assert_relative_eq!(props.ambient, Vector3::new(0.2, 0.0, 0.1));
        assert_relative_eq!(props.diffuse, Vector3::new(0.5, 0.0, 0.25));
        assert_relative_eq!(props.specular, Vector3::new(1.0, 0.0, 0.5));
        assert_eq!(light.lamp().core().material().color(), props.specular);
    }

    #[test]
    fn test_light_motion_is_transient() {
        let shader = RecordingShader::default();
        let mut buffer = RecordingBuffer::default();
        let mut light = Light::new(Vector3::new(1.0, 0.0, 0.0)).unwrap();

        // The lamp is scaled down, so a local offset of 20 moves it by 1
        light.translate(&Vector3::new(20.0, 0.0, 0.0));
        assert_relative_eq!(light.location(), Point3::new(2.0, 0.0, 0.0), epsilon = 1e-5);

        light.draw(&shader, &mut buffer);
        assert_relative_eq!(light.location(), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_eq!(buffer.draws[0].vertex_count, 6 * 20 * 20);
    }

    #[test]
    fn test_rotation_spins_in_place() {
        let mut light = Light::new(Vector3::new(1.0, 0.0, 0.0)).unwrap();
        light.rotate(90.0, &Vector3::z());
        // Rotation composes after the placement, so the centre stays put
        assert_relative_eq!(light.location(), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_apply_feeds_light_uniforms() {
        let shader = RecordingShader::default();
        let light = Light::new(Vector3::new(0.0, 1.0, 2.0)).unwrap();
        light.apply(&shader);

        assert_eq!(
            shader.names(),
            vec!["light.position", "light.ambient", "light.diffuse", "light.specular"]
        );
        match shader.last("light.position") {
            Some(Uniform::Vector3(position)) => {
                assert_relative_eq!(position, Vector3::new(0.0, 1.0, 2.0), epsilon = 1e-6)
            }
            other => panic!("unexpected light.position upload: {:?}", other),
        }
        assert_eq!(
            shader.last("light.ambient"),
            Some(Uniform::Vector3(Vector3::new(0.2, 0.2, 0.2)))
        );
    }
}
