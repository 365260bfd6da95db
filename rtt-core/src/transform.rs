/// Elementary transformation matrices and the per-shape transform pair
use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Builders for the elementary matrices composed into a shape's transforms
pub struct Transform;

impl Transform {
    /// Rotation of `angle` degrees around `axis`, or `None` for a zero axis
    pub fn rotation_matrix(angle: f32, axis: &Vector3<f32>) -> Option<Matrix4<f32>> {
        let axis = Unit::try_new(*axis, f32::EPSILON)?;
        Some(Matrix4::from_axis_angle(&axis, angle.to_radians()))
    }

    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Create a scale matrix
    pub fn scale_matrix(factors: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(factors)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

/// Working and baked model matrices of one shape.
///
/// Every operation right-multiplies the working matrix. Persistent operations
/// also right-multiply the baked matrix, always starting from the previous
/// baked value, never from the working one. [`TransformPair::reset`] drops
/// whatever the working matrix picked up since the last reset.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformPair {
    working: Matrix4<f32>,
    baked: Matrix4<f32>,
}

impl TransformPair {
    pub fn new() -> Self {
        Self {
            working: Matrix4::identity(),
            baked: Matrix4::identity(),
        }
    }

    pub fn working(&self) -> &Matrix4<f32> {
        &self.working
    }

    pub fn baked(&self) -> &Matrix4<f32> {
        &self.baked
    }

    pub fn translate(&mut self, offset: &Vector3<f32>, persistent: bool) {
        self.apply(Transform::translation_matrix(offset), persistent);
    }

    /// A zero-length axis leaves both matrices untouched
    pub fn rotate(&mut self, angle: f32, axis: &Vector3<f32>, persistent: bool) {
        match Transform::rotation_matrix(angle, axis) {
            Some(rotation) => self.apply(rotation, persistent),
            None => log::warn!("ignoring rotation of {} degrees around a zero axis", angle),
        }
    }

    pub fn scale(&mut self, factors: &Vector3<f32>, persistent: bool) {
        self.apply(Transform::scale_matrix(factors), persistent);
    }

    /// Working matrix goes back to the baked placement
    pub fn reset(&mut self) {
        self.working = self.baked;
    }

    /// Map a local-space point through the working matrix
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        self.working.transform_point(point)
    }

    fn apply(&mut self, matrix: Matrix4<f32>, persistent: bool) {
        self.working *= matrix;
        if persistent {
            self.baked *= matrix;
        }
    }
}

impl Default for TransformPair {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(0.0, &Vector3::z()).unwrap();
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_takes_degrees() {
        let matrix = Transform::rotation_matrix(90.0, &Vector3::z()).unwrap();
        let rotated = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_normalizes_axis() {
        let unit = Transform::rotation_matrix(30.0, &Vector3::x()).unwrap();
        let long = Transform::rotation_matrix(30.0, &Vector3::new(4.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(unit, long, epsilon = 1e-6);
        assert!(Transform::rotation_matrix(30.0, &Vector3::zeros()).is_none());
    }

    #[test]
    fn test_transient_ops_vanish_on_reset() {
        let mut pair = TransformPair::new();
        pair.translate(&Vector3::new(1.0, 2.0, 3.0), true);
        let baked = *pair.baked();

        pair.translate(&Vector3::new(5.0, 0.0, 0.0), false);
        pair.rotate(45.0, &Vector3::y(), false);
        pair.scale(&Vector3::new(2.0, 2.0, 2.0), false);
        assert_ne!(*pair.working(), baked);
        assert_eq!(*pair.baked(), baked);

        pair.reset();
        assert_eq!(*pair.working(), baked);
        pair.reset();
        assert_eq!(*pair.working(), baked);
    }

    #[test]
    fn test_persistent_ops_compose_onto_baked() {
        let mut pair = TransformPair::new();
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 2.0, 0.0);

        // A transient op before the persistent ones must not leak into baked
        pair.scale(&Vector3::new(3.0, 3.0, 3.0), false);
        pair.translate(&a, true);
        pair.translate(&b, true);

        let expected = Transform::translation_matrix(&a) * Transform::translation_matrix(&b);
        assert_relative_eq!(*pair.baked(), expected);

        for _ in 0..3 {
            pair.reset();
            assert_relative_eq!(*pair.working(), expected);
        }
    }

    #[test]
    fn test_zero_axis_rotation_is_ignored() {
        let mut pair = TransformPair::new();
        pair.rotate(90.0, &Vector3::zeros(), true);
        assert_eq!(pair, TransformPair::new());
    }

    #[test]
    fn test_mvp_order() {
        let model = Transform::translation_matrix(&Vector3::new(1.0, 0.0, 0.0));
        let view = Transform::scale_matrix(&Vector3::new(2.0, 2.0, 2.0));
        let projection = Matrix4::identity();
        let mvp = Transform::mvp_matrix(&model, &view, &projection);
        assert_relative_eq!(
            mvp.transform_point(&Point3::origin()),
            Point3::new(2.0, 0.0, 0.0)
        );
    }
}
