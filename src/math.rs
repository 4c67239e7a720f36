/// A 2D affine transform stored as `[a, b, c, d, e, f]`.
///
/// Points map as `x' = a*x + c*y + e` and `y' = b*x + d*y + f`, which is the
/// 3x3 homogeneous matrix
///
/// ```text
/// | a  c  e |
/// | b  d  f |
/// | 0  0  1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineMatrix(pub [f64; 6]);

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Uniform scale about the origin
    pub fn scale(factor: f64) -> Self {
        AffineMatrix([factor, 0.0, 0.0, factor, 0.0, 0.0])
    }

    /// Rotation about the origin, angle in degrees
    pub fn rotation(degrees: f64) -> Self {
        let (sin_a, cos_a) = degrees.to_radians().sin_cos();
        AffineMatrix([cos_a, sin_a, -sin_a, cos_a, 0.0, 0.0])
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        AffineMatrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// Expands to the full homogeneous matrix (row-major)
    pub fn to_homogeneous(&self) -> [[f64; 3]; 3] {
        let [a, b, c, d, e, f] = self.0;
        [[a, c, e], [b, d, f], [0.0, 0.0, 1.0]]
    }

    pub fn from_homogeneous(m: &[[f64; 3]; 3]) -> Self {
        AffineMatrix([m[0][0], m[1][0], m[0][1], m[1][1], m[0][2], m[1][2]])
    }

    /// Returns `self * other`: `other` is applied to a point first.
    pub fn concat(&self, other: &AffineMatrix) -> AffineMatrix {
        AffineMatrix::from_homogeneous(&multiply_matrices(
            &self.to_homogeneous(),
            &other.to_homogeneous(),
        ))
    }

    pub fn transform_point(&self, point: [f64; 2]) -> [f64; 2] {
        let [x, y, _] = multiply_matrix_vector(&self.to_homogeneous(), &[point[0], point[1], 1.0]);
        [x, y]
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

/// Builds the transform for a shape: scale, then rotate, then translate.
///
/// The three operations are concatenated onto an identity transform in that
/// order, so the result is `S * R * T`.
pub fn compose_matrix(scale: f64, angle_degrees: f64, tx: f64, ty: f64) -> AffineMatrix {
    AffineMatrix::IDENTITY
        .concat(&AffineMatrix::scale(scale))
        .concat(&AffineMatrix::rotation(angle_degrees))
        .concat(&AffineMatrix::translation(tx, ty))
}

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn assert_close(actual: [f64; 6], expected: [f64; 6]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < EPSILON, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn neutral_parameters_give_identity() {
        let m = compose_matrix(1.0, 0.0, 0.0, 0.0);
        assert_eq!(m.coefficients(), [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn quarter_turn_rotation_block() {
        let m = compose_matrix(1.0, 90.0, 0.0, 0.0);
        assert_close(m.coefficients(), [0.0, 1.0, -1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn compose_is_pure() {
        let first = compose_matrix(1.37, 212.4, -33.0, 81.5);
        let second = compose_matrix(1.37, 212.4, -33.0, 81.5);
        assert_eq!(first, second);
    }

    #[test]
    fn translation_is_applied_in_rotated_scaled_frame() {
        // S(2) * R(90) * T(10, 0): the offset is rotated onto +y and doubled
        let m = compose_matrix(2.0, 90.0, 10.0, 0.0);
        let [a, b, c, d, e, f] = m.coefficients();
        assert_close([a, b, c, d, e, f], [0.0, 2.0, -2.0, 0.0, 0.0, 20.0]);
    }

    #[test]
    fn closed_form_coefficients() {
        let (s, angle, tx, ty) = (1.5, 37.0_f64, 12.0, -7.0);
        let (sin_a, cos_a) = angle.to_radians().sin_cos();
        let m = compose_matrix(s, angle, tx, ty);
        assert_close(
            m.coefficients(),
            [
                s * cos_a,
                s * sin_a,
                -s * sin_a,
                s * cos_a,
                s * (cos_a * tx - sin_a * ty),
                s * (sin_a * tx + cos_a * ty),
            ],
        );
    }

    #[test]
    fn transform_point_matches_coefficients() {
        let m = compose_matrix(0.75, 123.0, 40.0, -15.0);
        let [a, b, c, d, e, f] = m.coefficients();
        let p = m.transform_point([50.0, 25.0]);
        assert!((p[0] - (a * 50.0 + c * 25.0 + e)).abs() < EPSILON);
        assert!((p[1] - (b * 50.0 + d * 25.0 + f)).abs() < EPSILON);
    }

    #[test]
    fn homogeneous_round_trip_keeps_bottom_row() {
        let m = compose_matrix(1.2, 300.0, 5.0, 6.0);
        let h = m.to_homogeneous();
        assert_eq!(h[2], [0.0, 0.0, 1.0]);
        assert_eq!(AffineMatrix::from_homogeneous(&h), m);
    }

    #[test]
    fn finite_across_the_full_circle() {
        for step in 0..3600 {
            let angle = step as f64 / 10.0;
            assert!(compose_matrix(1.7, angle, 150.0, -150.0).is_finite());
        }
    }

    #[test]
    fn edge_function_sign_follows_winding() {
        let a = [0.0, 0.0];
        let b = [10.0, 0.0];
        let inside = [2.0, 2.0];
        let outside = [2.0, -2.0];
        assert!(edge_function(&a, &b, &inside) * edge_function(&a, &b, &outside) < 0.0);
    }
}
