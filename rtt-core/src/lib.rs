/// RTT Core Library - Procedural primitives and their transform pairs
///
/// This library builds the vertex buffers of the scene primitives (cuboid,
/// wall, sphere, rectangle), attaches materials to them, and tracks each
/// shape's working and baked model matrices across draws. Drawing goes
/// through the caller-supplied `Shader` and `VertexBuffer` traits.

pub mod error;
pub mod geometry;
pub mod light;
pub mod material;
pub mod primitives;
pub mod shader;
pub mod shape;
pub mod transform;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use error::GeometryError;
pub use geometry::{Mesh, Triangle, Vertex, VertexLayout};
pub use light::Light;
pub use material::{LightProperties, Material};
pub use shader::{Shader, VertexBuffer};
pub use shape::{Cuboid, Rectangle, Shape, ShapeCore, Sphere, Wall};
pub use transform::{Transform, TransformPair};
