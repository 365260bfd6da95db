/// Interleaved vertex buffers and the vertex/triangle views over them
use nalgebra::{Point3, Vector3};

/// Attribute layout of an interleaved buffer.
///
/// Every attribute is one `[f32; 3]` triplet and the position always comes
/// first, so the stride is counted in triplets rather than bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// position, color, normal
    PositionColorNormal,
    /// position, color
    PositionColor,
}

impl VertexLayout {
    pub fn triplets_per_vertex(self) -> usize {
        match self {
            VertexLayout::PositionColorNormal => 3,
            VertexLayout::PositionColor => 2,
        }
    }

    pub fn stride_bytes(self) -> usize {
        self.triplets_per_vertex() * std::mem::size_of::<[f32; 3]>()
    }

    pub fn has_normal(self) -> bool {
        matches!(self, VertexLayout::PositionColorNormal)
    }
}

/// A 3D vertex with position, color and an optional normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
    pub normal: Option<Vector3<f32>>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, color: Vector3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            color,
            normal: Some(normal),
        }
    }

    pub fn unlit(position: Point3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position,
            color,
            normal: None,
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Raw interleaved vertex buffer, laid out exactly as it is uploaded.
///
/// Triangles are implicit: every three consecutive vertices form one, so the
/// order of pushes is the winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    layout: VertexLayout,
    triplets: Vec<[f32; 3]>,
}

impl Mesh {
    pub fn new(layout: VertexLayout) -> Self {
        Self {
            layout,
            triplets: Vec::new(),
        }
    }

    pub fn with_capacity(layout: VertexLayout, vertices: usize) -> Self {
        Self {
            layout,
            triplets: Vec::with_capacity(vertices * layout.triplets_per_vertex()),
        }
    }

    /// Wrap an already packed buffer. Trailing triplets that do not make up a
    /// whole vertex are ignored by every accessor.
    pub fn from_triplets(layout: VertexLayout, triplets: Vec<[f32; 3]>) -> Self {
        Self { layout, triplets }
    }

    /// Unpack a byte range produced by [`Mesh::as_bytes`]
    pub fn from_bytes(layout: VertexLayout, bytes: &[u8]) -> Self {
        Self::from_triplets(layout, bytemuck::pod_collect_to_vec(bytes))
    }

    pub fn push(&mut self, vertex: Vertex) {
        self.triplets.push(vertex.position.coords.into());
        self.triplets.push(vertex.color.into());
        if self.layout.has_normal() {
            let normal = vertex.normal.unwrap_or_else(Vector3::zeros);
            self.triplets.push(normal.into());
        }
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn vertex_count(&self) -> usize {
        self.triplets.len() / self.layout.triplets_per_vertex()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    pub fn triplets(&self) -> &[[f32; 3]] {
        &self.triplets
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triplets)
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        if index >= self.vertex_count() {
            return None;
        }

        let base = index * self.layout.triplets_per_vertex();
        let position = Point3::from(self.triplets[base]);
        let color = Vector3::from(self.triplets[base + 1]);
        let vertex = if self.layout.has_normal() {
            Vertex::new(position, color, Vector3::from(self.triplets[base + 2]))
        } else {
            Vertex::unlit(position, color)
        };

        Some(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        (0..self.vertex_count()).filter_map(move |i| self.vertex(i))
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).filter_map(move |t| {
            Some(Triangle::new(
                self.vertex(t * 3)?,
                self.vertex(t * 3 + 1)?,
                self.vertex(t * 3 + 2)?,
            ))
        })
    }
}
