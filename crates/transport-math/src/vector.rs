// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Vector Kernels
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Norms and BLAS-like helpers over flat `f64` sequences.
//!
//! The norm functions accept anything that iterates `&f64`, so they work
//! on slices, `Vec`s and `ndarray` arrays alike.

/// Vector norm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormType {
    L1,
    #[default]
    L2,
    LInf,
}

/// Norm of `v`.
pub fn norm<'v, I>(v: I, norm_type: NormType) -> f64
where
    I: IntoIterator<Item = &'v f64>,
{
    let it = v.into_iter();
    match norm_type {
        NormType::L1 => it.map(|x| x.abs()).sum(),
        NormType::L2 => it.map(|x| x * x).sum::<f64>().sqrt(),
        NormType::LInf => it.fold(0.0_f64, |m, x| m.max(x.abs())),
    }
}

/// Norm of `a - b`.
pub fn norm_difference<'a, 'b, I, J>(a: I, b: J, norm_type: NormType) -> f64
where
    I: IntoIterator<Item = &'a f64>,
    J: IntoIterator<Item = &'b f64>,
{
    let diff = a.into_iter().zip(b).map(|(x, y)| x - y);
    match norm_type {
        NormType::L1 => diff.map(f64::abs).sum(),
        NormType::L2 => diff.map(|d| d * d).sum::<f64>().sqrt(),
        NormType::LInf => diff.fold(0.0_f64, |m, d| m.max(d.abs())),
    }
}

/// Dot product.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// `y = y + alpha * x` (axpy).
#[inline]
pub fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
}

/// `y = alpha * x` (scale-copy).
#[inline]
pub fn scale(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi = alpha * xi;
    }
}

/// `out = a - b`.
#[inline]
pub fn sub(a: &[f64], b: &[f64], out: &mut [f64]) {
    for ((oi, &ai), &bi) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
        *oi = ai - bi;
    }
}
