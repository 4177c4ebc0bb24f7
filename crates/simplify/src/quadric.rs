//! Quadric error metric.
//!
//! A quadric is the symmetric 4x4 matrix `Q = sum(p p^T)` over a set of
//! planes `p = [a, b, c, d]` with unit normal `(a, b, c)`. For a point
//! `v = [x, y, z, 1]`, `v^T Q v` is the sum of squared distances from the
//! point to every plane folded into `Q`.

use std::ops::{Add, AddAssign};

use glam::DVec3;

/// Below this determinant the 3x3 block is treated as singular.
pub const SINGULAR_DETERMINANT: f64 = 1e-10;

/// Symmetric 4x4 error quadric stored as its 10 independent coefficients.
///
/// Layout (upper triangle, row-major):
/// ```text
/// [ xx xy xz xw ]
/// [    yy yz yw ]
/// [       zz zw ]
/// [          ww ]
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quadric {
    pub xx: f64,
    pub xy: f64,
    pub xz: f64,
    pub xw: f64,
    pub yy: f64,
    pub yz: f64,
    pub yw: f64,
    pub zz: f64,
    pub zw: f64,
    pub ww: f64,
}

impl Quadric {
    /// Fundamental quadric of the plane `normal . p + d = 0`.
    ///
    /// `normal` is expected to be unit length (or zero, for degenerate faces,
    /// which yields the zero quadric).
    pub fn from_plane(normal: DVec3, d: f64) -> Self {
        let DVec3 { x: a, y: b, z: c } = normal;
        Self {
            xx: a * a,
            xy: a * b,
            xz: a * c,
            xw: a * d,
            yy: b * b,
            yz: b * c,
            yw: b * d,
            zz: c * c,
            zw: c * d,
            ww: d * d,
        }
    }

    /// Quadric of the plane through three points, or zero for a degenerate triangle
    pub fn from_triangle(p0: DVec3, p1: DVec3, p2: DVec3) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        Self::from_plane(normal, -normal.dot(p0))
    }

    /// Evaluate `v^T Q v` for `v = [p, 1]`, including the scalar term.
    pub fn evaluate(&self, p: DVec3) -> f64 {
        let DVec3 { x, y, z } = p;
        x * x * self.xx
            + 2.0 * x * y * self.xy
            + 2.0 * x * z * self.xz
            + 2.0 * x * self.xw
            + y * y * self.yy
            + 2.0 * y * z * self.yz
            + 2.0 * y * self.yw
            + z * z * self.zz
            + 2.0 * z * self.zw
            + self.ww
    }

    /// Determinant of the upper-left 3x3 block
    pub fn determinant(&self) -> f64 {
        self.xx * (self.yy * self.zz - self.yz * self.yz)
            - self.xy * (self.xy * self.zz - self.yz * self.xz)
            + self.xz * (self.xy * self.yz - self.yy * self.xz)
    }

    /// Point minimizing the quadric error, or `None` when the system is singular.
    ///
    /// Solves
    /// ```text
    /// [ xx xy xz ] [x]   [-xw]
    /// [ xy yy yz ] [y] = [-yw]
    /// [ xz yz zz ] [z]   [-zw]
    /// ```
    /// by cofactor expansion.
    pub fn optimal_point(&self) -> Option<DVec3> {
        let det = self.determinant();
        if det.abs() < SINGULAR_DETERMINANT {
            return None;
        }
        let inv = 1.0 / det;

        // Cofactors of the symmetric block
        let c00 = self.yy * self.zz - self.yz * self.yz;
        let c01 = self.xz * self.yz - self.xy * self.zz;
        let c02 = self.xy * self.yz - self.xz * self.yy;
        let c11 = self.xx * self.zz - self.xz * self.xz;
        let c12 = self.xy * self.xz - self.xx * self.yz;
        let c22 = self.xx * self.yy - self.xy * self.xy;

        let rhs = DVec3::new(-self.xw, -self.yw, -self.zw);
        Some(DVec3::new(
            (c00 * rhs.x + c01 * rhs.y + c02 * rhs.z) * inv,
            (c01 * rhs.x + c11 * rhs.y + c12 * rhs.z) * inv,
            (c02 * rhs.x + c12 * rhs.y + c22 * rhs.z) * inv,
        ))
    }
}

impl Add for Quadric {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, rhs: Self) {
        self.xx += rhs.xx;
        self.xy += rhs.xy;
        self.xz += rhs.xz;
        self.xw += rhs.xw;
        self.yy += rhs.yy;
        self.yz += rhs.yz;
        self.yw += rhs.yw;
        self.zz += rhs.zz;
        self.zw += rhs.zw;
        self.ww += rhs.ww;
    }
}
