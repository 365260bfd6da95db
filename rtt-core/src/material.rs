/// Reflectance descriptors attached to shapes and lights
use nalgebra::Vector3;

/// How far the coefficient sum may drift from 1.0 before a warning is logged
pub const MATERIAL_SUM_TOLERANCE: f32 = 1e-4;

/// Immutable surface description consumed by the forward shader.
///
/// The three coefficients split incoming light into absorbed, refracted and
/// reflected parts and are expected to sum to one. A material that breaks
/// this is still constructed; the mismatch is only reported through `log`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    absorb: f32,
    refract: f32,
    reflect: f32,
    color: Vector3<f32>,
}

impl Material {
    pub fn new(absorb: f32, refract: f32, reflect: f32, color: Vector3<f32>) -> Self {
        let material = Self {
            absorb,
            refract,
            reflect,
            color,
        };

        if !material.is_balanced() {
            log::warn!(
                "material coefficients sum to {} instead of 1 (absorb={}, refract={}, reflect={})",
                material.coefficient_sum(),
                absorb,
                refract,
                reflect
            );
        }

        material
    }

    pub fn absorb(&self) -> f32 {
        self.absorb
    }

    pub fn refract(&self) -> f32 {
        self.refract
    }

    pub fn reflect(&self) -> f32 {
        self.reflect
    }

    /// Base color, each channel in `0.0..=1.0`
    pub fn color(&self) -> Vector3<f32> {
        self.color
    }

    pub fn coefficient_sum(&self) -> f32 {
        self.absorb + self.refract + self.reflect
    }

    /// True when the coefficients sum to one within [`MATERIAL_SUM_TOLERANCE`]
    pub fn is_balanced(&self) -> bool {
        (self.coefficient_sum() - 1.0).abs() <= MATERIAL_SUM_TOLERANCE
    }
}

/// Ambient, diffuse and specular colors emitted by a light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProperties {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl LightProperties {
    pub const AMBIENT_RATIO: f32 = 0.2;
    pub const DIFFUSE_RATIO: f32 = 0.5;
    pub const SPECULAR_RATIO: f32 = 1.0;

    pub fn new(ambient: Vector3<f32>, diffuse: Vector3<f32>, specular: Vector3<f32>) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
        }
    }

    /// Split a single base color into the fixed ambient/diffuse/specular ratios
    pub fn from_color(color: Vector3<f32>) -> Self {
        Self::new(
            color * Self::AMBIENT_RATIO,
            color * Self::DIFFUSE_RATIO,
            color * Self::SPECULAR_RATIO,
        )
    }
}

impl Default for LightProperties {
    fn default() -> Self {
        Self::from_color(Vector3::new(1.0, 1.0, 1.0))
    }
}
