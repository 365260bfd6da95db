/// Drawable primitives: geometry, material and transform pair bundled together
use nalgebra::{Point3, Vector3};

use crate::error::GeometryError;
use crate::geometry::Mesh;
use crate::material::Material;
use crate::primitives;
use crate::shader::{uniforms, Shader, VertexBuffer};
use crate::transform::TransformPair;

/// Specular reflectance uploaded for every material
pub const MATERIAL_SPECULAR: f32 = 0.5;
pub const MATERIAL_SHININESS: f32 = 128.0;

/// State every primitive owns exclusively
#[derive(Debug, Clone)]
pub struct ShapeCore {
    mesh: Mesh,
    material: Material,
    transform: TransformPair,
}

impl ShapeCore {
    pub fn new(mesh: Mesh, material: Material) -> Self {
        Self {
            mesh,
            material,
            transform: TransformPair::new(),
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn transform(&self) -> &TransformPair {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut TransformPair {
        &mut self.transform
    }

    /// Upload uniforms and vertices, draw, then fall back to the baked placement
    pub fn draw(&mut self, shader: &dyn Shader, buffer: &mut dyn VertexBuffer) {
        let color = self.material.color();
        shader.feed_matrix(uniforms::MODEL, self.transform.working());
        shader.feed_vector3(uniforms::MATERIAL_AMBIENT, &color);
        shader.feed_vector3(uniforms::MATERIAL_DIFFUSE, &color);
        shader.feed_vector3(
            uniforms::MATERIAL_SPECULAR,
            &Vector3::repeat(MATERIAL_SPECULAR),
        );
        shader.feed_scalar(uniforms::MATERIAL_SHININESS, MATERIAL_SHININESS);

        buffer.upload_and_draw(
            self.mesh.as_bytes(),
            self.mesh.layout(),
            self.mesh.vertex_count(),
        );

        self.transform.reset();
    }
}

/// Capabilities shared by every primitive.
///
/// Implementors only expose their [`ShapeCore`]; the operations are provided.
pub trait Shape {
    fn core(&self) -> &ShapeCore;

    fn core_mut(&mut self) -> &mut ShapeCore;

    /// Local-space point reported by [`Shape::location`]
    fn anchor(&self) -> Point3<f32> {
        Point3::origin()
    }

    fn translate(&mut self, offset: &Vector3<f32>, persistent: bool) {
        self.core_mut().transform_mut().translate(offset, persistent);
    }

    /// Rotate by `angle` degrees around `axis`
    fn rotate(&mut self, angle: f32, axis: &Vector3<f32>, persistent: bool) {
        self.core_mut().transform_mut().rotate(angle, axis, persistent);
    }

    fn scale(&mut self, factors: &Vector3<f32>, persistent: bool) {
        self.core_mut().transform_mut().scale(factors, persistent);
    }

    /// Permanently size the unit primitive
    fn sculpt(&mut self, dimensions: &Vector3<f32>) {
        self.scale(dimensions, true);
    }

    fn draw(&mut self, shader: &dyn Shader, buffer: &mut dyn VertexBuffer) {
        self.core_mut().draw(shader, buffer);
    }

    /// World-space position of the anchor under the current transform
    fn location(&self) -> Point3<f32> {
        self.core().transform().transform_point(&self.anchor())
    }
}

macro_rules! impl_shape {
    ($shape:ty) => {
        impl Shape for $shape {
            fn core(&self) -> &ShapeCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut ShapeCore {
                &mut self.core
            }
        }
    };
}

/// Unit cube
#[derive(Debug, Clone)]
pub struct Cuboid {
    core: ShapeCore,
}

impl Cuboid {
    pub fn new(material: &Material) -> Self {
        Self {
            core: ShapeCore::new(primitives::cuboid(material.color()), material.clone()),
        }
    }
}

impl_shape!(Cuboid);

/// Unit quad in the local XY plane
#[derive(Debug, Clone)]
pub struct Wall {
    core: ShapeCore,
}

impl Wall {
    pub fn new(material: &Material) -> Self {
        Self {
            core: ShapeCore::new(primitives::wall(material.color()), material.clone()),
        }
    }

    /// World-space corner `(i, j)`; `i` picks the x edge, `j` the y edge
    pub fn corner(&self, i: usize, j: usize) -> Result<Point3<f32>, GeometryError> {
        let index = primitives::wall_corner_index(i, j)?;
        let local = self
            .core
            .mesh()
            .vertex(index)
            .map(|vertex| vertex.position)
            .ok_or(GeometryError::CornerOutOfRange { i, j })?;
        Ok(self.core.transform().transform_point(&local))
    }
}

impl_shape!(Wall);

/// Unit UV sphere
#[derive(Debug, Clone)]
pub struct Sphere {
    core: ShapeCore,
    density: u32,
}

impl Sphere {
    pub fn new(material: &Material, density: u32) -> Result<Self, GeometryError> {
        let mesh = primitives::sphere(material.color(), density)?;
        Ok(Self {
            core: ShapeCore::new(mesh, material.clone()),
            density,
        })
    }

    pub fn density(&self) -> u32 {
        self.density
    }

    pub fn centre(&self) -> Point3<f32> {
        self.location()
    }
}

impl_shape!(Sphere);

/// Box with explicit extents and no per-vertex normals
#[derive(Debug, Clone)]
pub struct Rectangle {
    core: ShapeCore,
    dimensions: Vector3<f32>,
}

impl Rectangle {
    pub fn new(
        material: &Material,
        width: f32,
        height: f32,
        depth: f32,
    ) -> Result<Self, GeometryError> {
        let mesh = primitives::rectangle(material.color(), width, height, depth)?;
        Ok(Self {
            core: ShapeCore::new(mesh, material.clone()),
            dimensions: Vector3::new(width, height, depth),
        })
    }

    pub fn dimensions(&self) -> Vector3<f32> {
        self.dimensions
    }
}

impl_shape!(Rectangle);
