//! Recording doubles for the shader and buffer traits, plus log capture
use std::cell::{Cell, RefCell};
use std::sync::Once;

use nalgebra::{Matrix4, Vector3};

use crate::geometry::VertexLayout;
use crate::shader::{Shader, VertexBuffer};

#[derive(Debug, Clone, PartialEq)]
pub enum Uniform {
    Matrix(Matrix4<f32>),
    Vector3(Vector3<f32>),
    Scalar(f32),
}

#[derive(Debug, Default)]
pub struct RecordingShader {
    uploads: RefCell<Vec<(String, Uniform)>>,
    uses: Cell<usize>,
}

impl RecordingShader {
    pub fn last(&self, name: &str) -> Option<Uniform> {
        self.uploads
            .borrow()
            .iter()
            .rev()
            .find(|(uploaded, _)| uploaded == name)
            .map(|(_, value)| value.clone())
    }

    pub fn last_matrix(&self, name: &str) -> Option<Matrix4<f32>> {
        match self.last(name)? {
            Uniform::Matrix(value) => Some(value),
            _ => None,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.uploads
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn uses(&self) -> usize {
        self.uses.get()
    }

    fn record(&self, name: &str, value: Uniform) {
        self.uploads.borrow_mut().push((name.to_string(), value));
    }
}

impl Shader for RecordingShader {
    fn use_program(&self) {
        self.uses.set(self.uses.get() + 1);
    }

    fn feed_matrix(&self, name: &str, value: &Matrix4<f32>) {
        self.record(name, Uniform::Matrix(*value));
    }

    fn feed_vector3(&self, name: &str, value: &Vector3<f32>) {
        self.record(name, Uniform::Vector3(*value));
    }

    fn feed_scalar(&self, name: &str, value: f32) {
        self.record(name, Uniform::Scalar(value));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub bytes: Vec<u8>,
    pub layout: VertexLayout,
    pub vertex_count: usize,
}

#[derive(Debug, Default)]
pub struct RecordingBuffer {
    pub draws: Vec<DrawCall>,
}

impl VertexBuffer for RecordingBuffer {
    fn upload_and_draw(&mut self, bytes: &[u8], layout: VertexLayout, vertex_count: usize) {
        self.draws.push(DrawCall {
            bytes: bytes.to_vec(),
            layout,
            vertex_count,
        });
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
}

/// Global logger keeping records per thread, so parallel tests stay apart
struct CapturingLogger;

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INSTALL: Once = Once::new();

/// Run `f` and return every record it logged on this thread
pub fn capture_logs<F: FnOnce()>(f: F) -> Vec<(log::Level, String)> {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });

    CAPTURED.with(|records| records.borrow_mut().clear());
    f();
    CAPTURED.with(|records| records.borrow_mut().drain(..).collect())
}
