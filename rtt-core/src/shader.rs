//! Boundary between the scene core and whatever draws it.
//!
//! The core never owns a shader program or a GPU buffer. Callers pass both
//! into every draw, already bound, and the core only pushes uniforms and
//! vertex bytes through these traits.

use nalgebra::{Matrix4, Vector3};

use crate::geometry::VertexLayout;

/// Uniform names shared with the shader sources. They must match verbatim.
pub mod uniforms {
    pub const MODEL: &str = "model";
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "projection";
    pub const VIEW_POSITION: &str = "view_pos";

    pub const MATERIAL_AMBIENT: &str = "material.ambient";
    pub const MATERIAL_DIFFUSE: &str = "material.diffuse";
    pub const MATERIAL_SPECULAR: &str = "material.specular";
    pub const MATERIAL_SHININESS: &str = "material.shininess";

    pub const LIGHT_POSITION: &str = "light.position";
    pub const LIGHT_AMBIENT: &str = "light.ambient";
    pub const LIGHT_DIFFUSE: &str = "light.diffuse";
    pub const LIGHT_SPECULAR: &str = "light.specular";
}

/// A linked shader program accepting uniform uploads.
///
/// Uploads take `&self`: they change state on the device, not on the handle.
pub trait Shader {
    fn use_program(&self);

    fn feed_matrix(&self, name: &str, value: &Matrix4<f32>);

    fn feed_vector3(&self, name: &str, value: &Vector3<f32>);

    fn feed_scalar(&self, name: &str, value: f32);
}

/// The currently bound vertex buffer
pub trait VertexBuffer {
    /// Replace the buffer contents with `bytes` and draw `vertex_count`
    /// vertices as a triangle list
    fn upload_and_draw(&mut self, bytes: &[u8], layout: VertexLayout, vertex_count: usize);
}
