/// Local-space geometry builders for the four primitive kinds
use std::f32::consts::{FRAC_PI_2, PI};

use nalgebra::{Point3, Vector3};

use crate::error::GeometryError;
use crate::geometry::{Mesh, Vertex, VertexLayout};

pub const CUBOID_VERTEX_COUNT: usize = 36;
pub const WALL_VERTEX_COUNT: usize = 6;
pub const RECTANGLE_VERTEX_COUNT: usize = 36;

/// Indices into the wall buffer for corners `(i, j)`, row-major over `i`
const WALL_CORNERS: [[usize; 2]; 2] = [[0, 5], [1, 2]];

/// Face outlines of the unit cube in emission order, each followed by its
/// outward normal. The six vertices per face form two triangles.
const CUBOID_FACES: [([[f32; 3]; 6], [f32; 3]); 6] = [
    // floor
    (
        [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
        ],
        [0.0, 0.0, -1.0],
    ),
    // front
    (
        [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, -0.5, 0.5],
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, 0.5],
            [-0.5, -0.5, 0.5],
        ],
        [0.0, -1.0, 0.0],
    ),
    // left
    (
        [
            [-0.5, -0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, 0.5, 0.5],
            [-0.5, -0.5, -0.5],
            [-0.5, 0.5, 0.5],
            [-0.5, -0.5, 0.5],
        ],
        [-1.0, 0.0, 0.0],
    ),
    // right
    (
        [
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [0.5, 0.5, 0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, 0.5],
            [0.5, -0.5, 0.5],
        ],
        [1.0, 0.0, 0.0],
    ),
    // bottom
    (
        [
            [-0.5, 0.5, -0.5],
            [0.5, 0.5, -0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, -0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ],
        [0.0, 1.0, 0.0],
    ),
    // ceiling
    (
        [
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ],
        [0.0, 0.0, 1.0],
    ),
];

/// Unit cube centred on the origin with flat per-face normals
pub fn cuboid(color: Vector3<f32>) -> Mesh {
    let mut mesh = Mesh::with_capacity(VertexLayout::PositionColorNormal, CUBOID_VERTEX_COUNT);

    for (positions, normal) in CUBOID_FACES.iter() {
        let normal = Vector3::from(*normal);
        for position in positions {
            mesh.push(Vertex::new(Point3::from(*position), color, normal));
        }
    }

    mesh
}

/// Unit quad in the XY plane facing +Z
pub fn wall(color: Vector3<f32>) -> Mesh {
    let normal = Vector3::new(0.0, 0.0, 1.0);
    let positions = [
        [-0.5, -0.5, 0.0],
        [0.5, -0.5, 0.0],
        [0.5, 0.5, 0.0],
        [-0.5, -0.5, 0.0],
        [0.5, 0.5, 0.0],
        [-0.5, 0.5, 0.0],
    ];

    let mut mesh = Mesh::with_capacity(VertexLayout::PositionColorNormal, WALL_VERTEX_COUNT);
    for position in positions {
        mesh.push(Vertex::new(Point3::from(position), color, normal));
    }
    mesh
}

/// Buffer index of wall corner `(i, j)`, where `i` picks the x edge and `j`
/// the y edge (0 for -0.5, 1 for +0.5)
pub fn wall_corner_index(i: usize, j: usize) -> Result<usize, GeometryError> {
    WALL_CORNERS
        .get(i)
        .and_then(|row| row.get(j))
        .copied()
        .ok_or(GeometryError::CornerOutOfRange { i, j })
}

/// `6 * density²`, or `None` when that does not fit in `usize`
pub fn sphere_vertex_count(density: u32) -> Option<usize> {
    let d = usize::try_from(density).ok()?;
    d.checked_mul(d)?.checked_mul(6)
}

/// Unit UV sphere with `density` latitude and longitude bands.
///
/// Position and normal coincide because the radius is one.
pub fn sphere(color: Vector3<f32>, density: u32) -> Result<Mesh, GeometryError> {
    if density == 0 || density % 2 != 0 {
        return Err(GeometryError::InvalidDensity(density));
    }
    // The byte size of the buffer has to be addressable too
    let stride = VertexLayout::PositionColorNormal.stride_bytes();
    let vertex_count = sphere_vertex_count(density)
        .filter(|&count| {
            count
                .checked_mul(stride)
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(GeometryError::InvalidDensity(density))?;

    let bands = density as f32;
    let point = |lat: u32, lon: u32| {
        let phi = -FRAC_PI_2 + PI * lat as f32 / bands;
        let theta = 2.0 * PI * lon as f32 / bands;
        Vector3::new(phi.cos() * theta.cos(), phi.cos() * theta.sin(), phi.sin())
    };

    let mut mesh = Mesh::with_capacity(VertexLayout::PositionColorNormal, vertex_count);
    let mut emit = |direction: Vector3<f32>| {
        mesh.push(Vertex::new(Point3::from(direction), color, direction));
    };

    for lat in 0..density {
        for lon in 0..density {
            let lower_left = point(lat, lon);
            let lower_right = point(lat, lon + 1);
            let upper_right = point(lat + 1, lon + 1);
            let upper_left = point(lat + 1, lon);

            emit(lower_left);
            emit(lower_right);
            emit(upper_right);

            emit(lower_left);
            emit(upper_right);
            emit(upper_left);
        }
    }

    log::debug!(
        "built sphere with density {} ({} vertices)",
        density,
        mesh.vertex_count()
    );
    Ok(mesh)
}

/// Axis-aligned box centred on the origin with the given extents
pub fn rectangle(
    color: Vector3<f32>,
    width: f32,
    height: f32,
    depth: f32,
) -> Result<Mesh, GeometryError> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !(valid(width) && valid(height) && valid(depth)) {
        return Err(GeometryError::InvalidDimensions {
            width,
            height,
            depth,
        });
    }

    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    let corner = |sx: f32, sy: f32, sz: f32| Point3::new(sx * x, sy * y, sz * z);

    // Each quad is listed counter-clockwise as seen from outside the box
    let quads = [
        // z-
        [
            corner(-1.0, -1.0, -1.0),
            corner(-1.0, 1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(1.0, -1.0, -1.0),
        ],
        // z+
        [
            corner(-1.0, -1.0, 1.0),
            corner(1.0, -1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
        ],
        // y-
        [
            corner(-1.0, -1.0, -1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, -1.0, 1.0),
            corner(-1.0, -1.0, 1.0),
        ],
        // y+
        [
            corner(-1.0, 1.0, -1.0),
            corner(-1.0, 1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(1.0, 1.0, -1.0),
        ],
        // x-
        [
            corner(-1.0, -1.0, -1.0),
            corner(-1.0, -1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
            corner(-1.0, 1.0, -1.0),
        ],
        // x+
        [
            corner(1.0, -1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(1.0, 1.0, 1.0),
            corner(1.0, -1.0, 1.0),
        ],
    ];

    let mut mesh = Mesh::with_capacity(VertexLayout::PositionColor, RECTANGLE_VERTEX_COUNT);
    for [a, b, c, d] in quads {
        for position in [a, b, c, a, c, d] {
            mesh.push(Vertex::unlit(position, color));
        }
    }

    Ok(mesh)
}
