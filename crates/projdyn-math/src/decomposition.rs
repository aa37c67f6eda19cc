//! Matrix decompositions for deformation-gradient constraints.
//!
//! Every function here is pure: it takes a 3×3 deformation gradient and
//! returns a projected 3×3 matrix. The clamping policy for degenerate and
//! inverted inputs lives in [`proper_svd`]:
//!
//! - Non-finite input, or an SVD that fails to converge, yields the
//!   identity factorization (`U = V = I`, `Σ = 0`).
//! - If `U` or `V` comes back as a reflection, the column belonging to the
//!   smallest singular value is negated together with that singular value.
//!   The returned `U` and `V` are therefore always proper rotations, and an
//!   inverted element shows up as a single negative singular value.

use glam::{DMat3, DVec3};
use nalgebra::Matrix3;
use projdyn_types::constants::SINGULAR_VALUE_EPSILON;

/// Iteration cap handed to the nalgebra SVD.
const MAX_SVD_ITERATIONS: usize = 200;

/// Singular value decomposition `F = U · diag(σ) · Vᵀ` with proper rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svd3 {
    /// Left rotation (`det = +1`).
    pub u: DMat3,
    /// Signed singular values. At most one is negative.
    pub sigma: DVec3,
    /// Right rotation (`det = +1`).
    pub v: DMat3,
}

impl Svd3 {
    /// Factorization returned for inputs that cannot be decomposed.
    pub const IDENTITY: Self = Self {
        u: DMat3::IDENTITY,
        sigma: DVec3::ZERO,
        v: DMat3::IDENTITY,
    };

    /// The closest rotation, `R = U · Vᵀ`.
    #[inline]
    pub fn rotation(&self) -> DMat3 {
        self.u * self.v.transpose()
    }

    /// Rebuilds `U · diag(sigma) · Vᵀ` with replacement singular values.
    #[inline]
    pub fn with_singular_values(&self, sigma: DVec3) -> DMat3 {
        self.u * DMat3::from_diagonal(sigma) * self.v.transpose()
    }

    /// Rebuilds the original matrix.
    #[inline]
    pub fn reconstruct(&self) -> DMat3 {
        self.with_singular_values(self.sigma)
    }

    /// True when the decomposed matrix has a negative determinant.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.sigma.min_element() < 0.0
    }
}

/// Result of a polar decomposition: F = R · S
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarDecomposition {
    /// Rotation part (`det = +1`).
    pub rotation: DMat3,
    /// Symmetric stretch part.
    pub stretch: DMat3,
}

/// Computes the SVD of `f` with `U` and `V` forced to be proper rotations.
pub fn proper_svd(f: &DMat3) -> Svd3 {
    if !f.is_finite() {
        return Svd3::IDENTITY;
    }

    let Some(svd) = to_nalgebra(f).try_svd(true, true, f64::EPSILON, MAX_SVD_ITERATIONS) else {
        return Svd3::IDENTITY;
    };
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Svd3::IDENTITY;
    };

    let mut u = from_nalgebra(&u);
    let mut v = from_nalgebra(&v_t.transpose());
    let mut sigma = DVec3::new(
        svd.singular_values[0],
        svd.singular_values[1],
        svd.singular_values[2],
    );

    let k = smallest_index(sigma);
    if u.determinant() < 0.0 {
        let col = u.col(k);
        *u.col_mut(k) = -col;
        sigma[k] = -sigma[k];
    }
    if v.determinant() < 0.0 {
        let col = v.col(k);
        *v.col_mut(k) = -col;
        sigma[k] = -sigma[k];
    }

    Svd3 { u, sigma, v }
}

/// Polar decomposition `F = R · S` via the proper SVD.
///
/// For an inverted `F` the stretch carries the negative singular value,
/// so `R` stays a rotation.
pub fn polar_decomposition(f: &DMat3) -> PolarDecomposition {
    let svd = proper_svd(f);
    PolarDecomposition {
        rotation: svd.rotation(),
        stretch: svd.v * DMat3::from_diagonal(svd.sigma) * svd.v.transpose(),
    }
}

/// Closest proper rotation to `f`.
#[inline]
pub fn polar_rotation(f: &DMat3) -> DMat3 {
    proper_svd(f).rotation()
}

/// Clamps every singular value of `f` into `[min, max]` and rebuilds it.
///
/// A negative (inverted) singular value is clamped to `min`, so the result
/// is never inverted when `min > 0`.
pub fn clamp_singular_values(f: &DMat3, min: f64, max: f64) -> DMat3 {
    let svd = proper_svd(f);
    let clamped = svd.sigma.clamp(DVec3::splat(min), DVec3::splat(max));
    svd.with_singular_values(clamped)
}

/// Closest volume-preserving matrix with the same rotation and stretch axes.
///
/// Singular values are made non-negative and divided by the cube root of
/// their product, so the result has determinant `+1` and keeps the ratios of
/// the original stretches. Collapsed inputs fall back to the pure rotation.
pub fn volume_preserving_fit(f: &DMat3) -> DMat3 {
    let svd = proper_svd(f);
    let magnitudes = svd.sigma.abs();
    let product = magnitudes.x * magnitudes.y * magnitudes.z;
    if product < SINGULAR_VALUE_EPSILON.powi(3) {
        return svd.rotation();
    }
    svd.with_singular_values(magnitudes / product.cbrt())
}

/// Edge matrix `[p1-p0, p2-p0, p3-p0]` of a tetrahedron.
#[inline]
pub fn edge_matrix(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3) -> DMat3 {
    DMat3::from_cols(p1 - p0, p2 - p0, p3 - p0)
}

/// Deformation gradient `F = Ds · Dm⁻¹`.
#[inline]
pub fn deformation_gradient(ds: &DMat3, dm_inv: &DMat3) -> DMat3 {
    *ds * *dm_inv
}

fn smallest_index(sigma: DVec3) -> usize {
    let mut k = 0;
    for i in 1..3 {
        if sigma[i] < sigma[k] {
            k = i;
        }
    }
    k
}

fn to_nalgebra(m: &DMat3) -> Matrix3<f64> {
    Matrix3::from_fn(|row, col| m.col(col)[row])
}

fn from_nalgebra(m: &Matrix3<f64>) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(m[(0, 0)], m[(1, 0)], m[(2, 0)]),
        DVec3::new(m[(0, 1)], m[(1, 1)], m[(2, 1)]),
        DVec3::new(m[(0, 2)], m[(1, 2)], m[(2, 2)]),
    )
}
