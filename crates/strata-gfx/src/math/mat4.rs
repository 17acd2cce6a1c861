use core::ops::Mul;

use bytemuck::{Pod, Zeroable};

use super::Vec3;

/// 4x4 matrix stored column-major.
///
/// Element `(row, col)` lives at index `col * 4 + row`, the layout WGSL
/// `mat4x4<f32>` expects, so a `Mat4` can be written into a uniform buffer
/// as-is.
///
/// Matrices act on column vectors. `Mat4::multiply(a, b)` is `a · b` and
/// applies `b` first; a model-view-projection matrix is therefore
/// `multiply(multiply(projection, view), model)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    cols: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            cols: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    #[inline]
    pub const fn from_cols_array(cols: [f32; 16]) -> Self {
        Self { cols }
    }

    #[inline]
    pub const fn to_cols_array(&self) -> [f32; 16] {
        self.cols
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cols[col * 4 + row]
    }

    /// Returns `a · b`.
    pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a.cols[k * 4 + row] * b.cols[col * 4 + k];
                }
                out[col * 4 + row] = sum;
            }
        }
        Mat4 { cols: out }
    }

    /// Returns `base · R`, where `R` rotates by `radians` around `axis`
    /// (counter-clockwise looking down the axis towards the origin).
    ///
    /// A zero-length axis has no rotation; `base` is returned unchanged.
    pub fn rotate(base: &Mat4, radians: f32, axis: Vec3) -> Mat4 {
        let axis = axis.normalize();
        if axis == Vec3::ZERO {
            return *base;
        }

        let (s, c) = radians.sin_cos();
        let t = 1.0 - c;
        let Vec3 { x, y, z } = axis;

        let r = Mat4::from_cols_array([
            t * x * x + c,
            t * x * y + s * z,
            t * x * z - s * y,
            0.0,
            t * x * y - s * z,
            t * y * y + c,
            t * y * z + s * x,
            0.0,
            t * x * z + s * y,
            t * y * z - s * x,
            t * z * z + c,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ]);

        Mat4::multiply(base, &r)
    }

    /// Returns `base · T(offset)`.
    pub fn translate(base: &Mat4, offset: Vec3) -> Mat4 {
        let mut t = Mat4::identity();
        t.cols[12] = offset.x;
        t.cols[13] = offset.y;
        t.cols[14] = offset.z;
        Mat4::multiply(base, &t)
    }

    /// Returns `base · S(factors)`.
    pub fn scale(base: &Mat4, factors: Vec3) -> Mat4 {
        let mut s = Mat4::identity();
        s.cols[0] = factors.x;
        s.cols[5] = factors.y;
        s.cols[10] = factors.z;
        Mat4::multiply(base, &s)
    }

    /// Right-handed view matrix looking from `eye` towards `center`.
    ///
    /// The camera basis is built by Gram-Schmidt: forward is
    /// `center - eye`, side is `forward × up`, and the corrected up is
    /// `side × forward`. The camera looks down its local -Z.
    ///
    /// When `eye == center` there is no view direction and identity is
    /// returned. An `up` parallel to the view direction yields a degenerate
    /// basis; callers keep them apart (the orbit camera clamps its polar
    /// angle for this reason).
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
        if eye == center {
            return Mat4::identity();
        }

        let f = center.subtract(eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);

        Mat4::from_cols_array([
            s.x,
            u.x,
            -f.x,
            0.0,
            s.y,
            u.y,
            -f.y,
            0.0,
            s.z,
            u.z,
            -f.z,
            0.0,
            -s.dot(eye),
            -u.dot(eye),
            f.dot(eye),
            1.0,
        ])
    }

    /// Right-handed perspective projection.
    ///
    /// Maps view-space depth `-near..-far` to clip depth `0..1`, the wgpu
    /// convention. Returns `None` unless `0 < near < far`, `aspect > 0` and
    /// `0 < fovy_degrees < 180`.
    pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Option<Mat4> {
        let valid = near > 0.0
            && far > near
            && aspect > 0.0
            && fovy_degrees > 0.0
            && fovy_degrees < 180.0
            && far.is_finite()
            && aspect.is_finite();
        if !valid {
            return None;
        }

        let f = 1.0 / (fovy_degrees.to_radians() * 0.5).tan();
        let range = near - far;

        let mut out = [0.0f32; 16];
        out[0] = f / aspect;
        out[5] = f;
        out[10] = far / range;
        out[11] = -1.0;
        out[14] = near * far / range;
        Some(Mat4::from_cols_array(out))
    }

    pub fn transpose(m: &Mat4) -> Mat4 {
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[row * 4 + col] = m.cols[col * 4 + row];
            }
        }
        Mat4 { cols: out }
    }

    /// Cofactor inverse.
    ///
    /// Returns `None` for a singular matrix (determinant zero or not finite).
    pub fn inverse(m: &Mat4) -> Option<Mat4> {
        let a = &m.cols;
        let (a00, a01, a02, a03) = (a[0], a[1], a[2], a[3]);
        let (a10, a11, a12, a13) = (a[4], a[5], a[6], a[7]);
        let (a20, a21, a22, a23) = (a[8], a[9], a[10], a[11]);
        let (a30, a31, a32, a33) = (a[12], a[13], a[14], a[15]);

        let b00 = a00 * a11 - a01 * a10;
        let b01 = a00 * a12 - a02 * a10;
        let b02 = a00 * a13 - a03 * a10;
        let b03 = a01 * a12 - a02 * a11;
        let b04 = a01 * a13 - a03 * a11;
        let b05 = a02 * a13 - a03 * a12;
        let b06 = a20 * a31 - a21 * a30;
        let b07 = a20 * a32 - a22 * a30;
        let b08 = a20 * a33 - a23 * a30;
        let b09 = a21 * a32 - a22 * a31;
        let b10 = a21 * a33 - a23 * a31;
        let b11 = a22 * a33 - a23 * a32;

        let det = b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;

        Some(Mat4::from_cols_array([
            (a11 * b11 - a12 * b10 + a13 * b09) * inv,
            (a02 * b10 - a01 * b11 - a03 * b09) * inv,
            (a31 * b05 - a32 * b04 + a33 * b03) * inv,
            (a22 * b04 - a21 * b05 - a23 * b03) * inv,
            (a12 * b08 - a10 * b11 - a13 * b07) * inv,
            (a00 * b11 - a02 * b08 + a03 * b07) * inv,
            (a32 * b02 - a30 * b05 - a33 * b01) * inv,
            (a20 * b05 - a22 * b02 + a23 * b01) * inv,
            (a10 * b10 - a11 * b08 + a13 * b06) * inv,
            (a01 * b08 - a00 * b10 - a03 * b06) * inv,
            (a30 * b04 - a31 * b02 + a33 * b00) * inv,
            (a21 * b02 - a20 * b04 - a23 * b00) * inv,
            (a11 * b07 - a10 * b09 - a12 * b06) * inv,
            (a00 * b09 - a01 * b07 + a02 * b06) * inv,
            (a31 * b01 - a30 * b03 - a32 * b00) * inv,
            (a20 * b03 - a21 * b01 + a22 * b00) * inv,
        ]))
    }

    /// Transforms a point (w = 1), applying the perspective divide when the
    /// resulting w is neither 0 nor 1.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        let x = c[0] * p.x + c[4] * p.y + c[8] * p.z + c[12];
        let y = c[1] * p.x + c[5] * p.y + c[9] * p.z + c[13];
        let z = c[2] * p.x + c[6] * p.y + c[10] * p.z + c[14];
        let w = c[3] * p.x + c[7] * p.y + c[11] * p.z + c[15];
        if w != 0.0 && w != 1.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    #[inline]
    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::multiply(&self, &rhs)
    }
}
