/// ASCII rasterizer standing in for the GPU behind the core's draw calls
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use rtt_core::shader::uniforms;
use rtt_core::{Mesh, Shader, Transform, Triangle, VertexBuffer, VertexLayout};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
enum UniformValue {
    Matrix(Matrix4<f32>),
    Vector3(Vector3<f32>),
    Scalar(f32),
}

/// Uniform store playing the part of a linked shader program.
///
/// A lit shader shades faces against the `light.*` uniforms, an unlit one
/// paints the material color as is (used for the lamp itself).
#[derive(Debug)]
pub struct AsciiShader {
    name: &'static str,
    lit: bool,
    uniforms: RefCell<HashMap<String, UniformValue>>,
}

impl AsciiShader {
    pub fn lit(name: &'static str) -> Self {
        Self::with_lighting(name, true)
    }

    pub fn unlit(name: &'static str) -> Self {
        Self::with_lighting(name, false)
    }

    fn with_lighting(name: &'static str, lit: bool) -> Self {
        Self {
            name,
            lit,
            uniforms: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn matrix(&self, name: &str) -> Option<Matrix4<f32>> {
        match self.uniforms.borrow().get(name) {
            Some(UniformValue::Matrix(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn vector3(&self, name: &str) -> Option<Vector3<f32>> {
        match self.uniforms.borrow().get(name) {
            Some(UniformValue::Vector3(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn scalar(&self, name: &str) -> Option<f32> {
        match self.uniforms.borrow().get(name) {
            Some(UniformValue::Scalar(value)) => Some(*value),
            _ => None,
        }
    }

    fn store(&self, name: &str, value: UniformValue) {
        self.uniforms.borrow_mut().insert(name.to_string(), value);
    }
}

impl Shader for AsciiShader {
    fn use_program(&self) {
        log::trace!("using shader program {}", self.name);
    }

    fn feed_matrix(&self, name: &str, value: &Matrix4<f32>) {
        self.store(name, UniformValue::Matrix(*value));
    }

    fn feed_vector3(&self, name: &str, value: &Vector3<f32>) {
        self.store(name, UniformValue::Vector3(*value));
    }

    fn feed_scalar(&self, name: &str, value: f32) {
        self.store(name, UniformValue::Scalar(value));
    }
}

/// Uniforms resolved once per draw call
struct DrawState {
    model: Matrix4<f32>,
    mvp: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,
    color: Vector3<f32>,
    lighting: Option<Lighting>,
}

struct Lighting {
    position: Point3<f32>,
    ambient: Vector3<f32>,
    diffuse: Vector3<f32>,
}

impl DrawState {
    fn from_shader(shader: &AsciiShader) -> Self {
        let model = shader.matrix(uniforms::MODEL).unwrap_or_else(Matrix4::identity);
        let view = shader.matrix(uniforms::VIEW).unwrap_or_else(Matrix4::identity);
        let projection = shader
            .matrix(uniforms::PROJECTION)
            .unwrap_or_else(Matrix4::identity);

        let normal_matrix = model
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix3::identity);

        let lighting = if shader.is_lit() {
            Some(Lighting {
                position: Point3::from(
                    shader
                        .vector3(uniforms::LIGHT_POSITION)
                        .unwrap_or_else(Vector3::zeros),
                ),
                ambient: shader
                    .vector3(uniforms::LIGHT_AMBIENT)
                    .unwrap_or_else(|| Vector3::repeat(0.2)),
                diffuse: shader
                    .vector3(uniforms::LIGHT_DIFFUSE)
                    .unwrap_or_else(|| Vector3::repeat(0.5)),
            })
        } else {
            None
        };

        Self {
            model,
            mvp: Transform::mvp_matrix(&model, &view, &projection),
            normal_matrix,
            color: shader
                .vector3(uniforms::MATERIAL_DIFFUSE)
                .unwrap_or_else(|| Vector3::repeat(1.0)),
            lighting,
        }
    }

    /// Shaded color of a flat face
    fn shade(&self, triangle: &Triangle) -> Vector3<f32> {
        let Some(lighting) = &self.lighting else {
            return self.color;
        };

        let local_normal = match triangle.vertices.map(|v| v.normal) {
            [Some(a), Some(b), Some(c)] => (a + b + c) / 3.0,
            _ => triangle.calculate_normal(),
        };
        let normal = (self.normal_matrix * local_normal)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        let centroid = triangle
            .vertices
            .iter()
            .map(|v| self.model.transform_point(&v.position).coords)
            .sum::<Vector3<f32>>()
            / 3.0;
        let to_light = (lighting.position.coords - centroid)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        let intensity = normal.dot(&to_light).max(0.0);
        (lighting.ambient + lighting.diffuse * intensity).component_mul(&self.color)
    }
}

/// ASCII renderer that rasterizes triangles into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    /// Bind `shader` to this framebuffer for a batch of draw calls
    pub fn target<'a>(&'a mut self, shader: &'a AsciiShader) -> DrawTarget<'a> {
        DrawTarget {
            renderer: self,
            shader,
        }
    }

    /// Draw a world-space line segment through the view and projection fed
    /// to `shader`, depth tested against the triangles
    pub fn draw_segment(
        &mut self,
        shader: &AsciiShader,
        from: &Point3<f32>,
        to: &Point3<f32>,
        color: &Vector3<f32>,
    ) {
        let view = shader.matrix(uniforms::VIEW).unwrap_or_else(Matrix4::identity);
        let projection = shader
            .matrix(uniforms::PROJECTION)
            .unwrap_or_else(Matrix4::identity);
        let mvp = Transform::mvp_matrix(&Matrix4::identity(), &view, &projection);

        let (Some(start), Some(end)) = (self.project(from, &mvp), self.project(to, &mvp)) else {
            return;
        };

        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let character = line_glyph(dx, dy);
        let color = to_terminal_color(color);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = (start.0 + dx * t).floor();
            let y = (start.1 + dy * t).floor();
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }

            let depth = start.2 + (end.2 - start.2) * t;
            let idx = y as usize * self.width + x as usize;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = character;
                self.color_buffer[idx] = color;
            }
        }
    }

    fn render_mesh(&mut self, mesh: &Mesh, vertex_count: usize, state: &DrawState) {
        for triangle in mesh.triangles().take(vertex_count / 3) {
            self.render_triangle(&triangle, state);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, state: &DrawState) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(triangle.vertices.iter()) {
            match self.project(&vertex.position, &state.mvp) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        let color = state.shade(triangle);
        let luminance = (color.x + color.y + color.z) / 3.0;
        let char_index = (luminance.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        // Lit faces should never vanish into the background glyph
        let character = LUMINOSITY_RAMP[char_index.clamp(1, LUMINOSITY_RAMP.len() - 1)];

        self.rasterize_triangle(&screen_coords, character, to_terminal_color(&color));
    }

    fn project(&self, position: &Point3<f32>, mvp: &Matrix4<f32>) -> Option<(f32, f32, f32)> {
        let clip = mvp * Vector4::new(position.x, position.y, position.z, 1.0);

        // Prevent division by near-zero or negative depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height as f32;

        Some((screen_x, screen_y, depth))
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                // Interpolate depth
                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                    self.color_buffer[idx] = color;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// A renderer with a shader bound, accepting vertex uploads
pub struct DrawTarget<'a> {
    renderer: &'a mut AsciiRenderer,
    shader: &'a AsciiShader,
}

impl VertexBuffer for DrawTarget<'_> {
    fn upload_and_draw(&mut self, bytes: &[u8], layout: VertexLayout, vertex_count: usize) {
        let mesh = Mesh::from_bytes(layout, bytes);
        if mesh.vertex_count() < vertex_count {
            log::warn!(
                "draw of {} vertices but only {} were uploaded",
                vertex_count,
                mesh.vertex_count()
            );
        }

        let state = DrawState::from_shader(self.shader);
        self.renderer.render_mesh(&mesh, vertex_count, &state);
    }
}

/// Glyph following a screen-space direction; screen y grows downwards
fn line_glyph(dx: f32, dy: f32) -> char {
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if dx * dy > 0.0 {
        '\\'
    } else {
        '/'
    }
}

fn to_terminal_color(color: &Vector3<f32>) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use rtt_core::{Material, Shape, Wall};

    fn facing_wall() -> Wall {
        let material = Material::new(0.5, 0.0, 0.5, Vector3::new(0.8, 0.8, 0.8));
        let mut wall = Wall::new(&material);
        // Turn the +Z face towards the camera on -Y
        wall.rotate(90.0, &Vector3::x(), true);
        wall
    }

    fn feed_camera(shader: &AsciiShader, camera: &Camera) {
        shader.feed_matrix(uniforms::VIEW, &camera.view_matrix());
        shader.feed_matrix(uniforms::PROJECTION, &camera.projection_matrix());
    }

    #[test]
    fn test_barycentric_inside_and_degenerate() {
        let (w0, w1, w2) =
            barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!(w0 > 0.0 && w1 > 0.0 && w2 > 0.0);
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-6);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn test_shader_stores_latest_uniform() {
        let shader = AsciiShader::lit("general");
        shader.feed_scalar(uniforms::MATERIAL_SHININESS, 32.0);
        shader.feed_scalar(uniforms::MATERIAL_SHININESS, 128.0);
        assert_eq!(shader.scalar(uniforms::MATERIAL_SHININESS), Some(128.0));
        assert_eq!(shader.matrix(uniforms::MATERIAL_SHININESS), None);
    }

    #[test]
    fn test_unlit_wall_covers_centre() {
        let camera = Camera::new(40, 20);
        let shader = AsciiShader::unlit("lamp");
        feed_camera(&shader, &camera);

        let mut renderer = AsciiRenderer::new(40, 20);
        let mut wall = facing_wall();
        wall.draw(&shader, &mut renderer.target(&shader));

        assert!(renderer.covered_cells() > 0);
        assert_ne!(renderer.cell(20, 10), Some(' '));
        assert_eq!(renderer.cell(0, 0), Some(' '));
    }

    #[test]
    fn test_lit_face_is_brighter_towards_light() {
        let camera = Camera::new(40, 20);
        let mut wall = facing_wall();

        let render = |light: Vector3<f32>, wall: &mut Wall| {
            let shader = AsciiShader::lit("general");
            feed_camera(&shader, &camera);
            shader.feed_vector3(uniforms::LIGHT_POSITION, &light);
            let mut renderer = AsciiRenderer::new(40, 20);
            wall.draw(&shader, &mut renderer.target(&shader));
            renderer.cell(20, 10).unwrap_or(' ')
        };

        let front = render(Vector3::new(0.0, -2.0, 0.0), &mut wall);
        let behind = render(Vector3::new(0.0, 2.0, 0.0), &mut wall);
        let rank = |c: char| LUMINOSITY_RAMP.iter().position(|&r| r == c).unwrap_or(0);
        assert!(rank(front) > rank(behind));
    }

    #[test]
    fn test_clear_resets_buffers() {
        let camera = Camera::new(40, 20);
        let shader = AsciiShader::unlit("lamp");
        feed_camera(&shader, &camera);
        let mut renderer = AsciiRenderer::new(40, 20);
        facing_wall().draw(&shader, &mut renderer.target(&shader));

        renderer.clear();
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_segment_glyphs() {
        assert_eq!(line_glyph(10.0, 1.0), '-');
        assert_eq!(line_glyph(0.0, -5.0), '|');
        assert_eq!(line_glyph(3.0, 3.0), '\\');
        assert_eq!(line_glyph(3.0, -3.0), '/');
    }

    #[test]
    fn test_segment_crosses_screen() {
        let camera = Camera::new(40, 20);
        let shader = AsciiShader::unlit("axis");
        feed_camera(&shader, &camera);
        let mut renderer = AsciiRenderer::new(40, 20);

        renderer.draw_segment(
            &shader,
            &Point3::new(-2.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
            &Vector3::new(0.9, 0.2, 0.1),
        );

        let dashes = (0..40)
            .filter(|&x| (9..=11).any(|y| renderer.cell(x, y) == Some('-')))
            .count();
        assert!(dashes > 30, "only {} cells drawn", dashes);
        assert_eq!(renderer.cell(20, 0), Some(' '));
    }

    #[test]
    fn test_segment_hidden_behind_face() {
        let camera = Camera::new(40, 20);
        let shader = AsciiShader::unlit("lamp");
        feed_camera(&shader, &camera);
        let mut renderer = AsciiRenderer::new(40, 20);
        facing_wall().draw(&shader, &mut renderer.target(&shader));
        let face = renderer.cell(20, 10);

        // Runs behind the wall, which sits on the origin
        renderer.draw_segment(
            &shader,
            &Point3::new(-0.3, 1.0, 0.0),
            &Point3::new(0.3, 1.0, 0.0),
            &Vector3::new(0.9, 0.2, 0.1),
        );
        assert_eq!(renderer.cell(20, 10), face);
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let renderer = AsciiRenderer::new(4, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r\n"));
    }
}
