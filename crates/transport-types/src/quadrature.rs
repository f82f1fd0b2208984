// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Angular Quadrature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Octant-symmetric discrete-ordinates quadrature.
//!
//! Every octant carries the same set of direction cosines up to sign.
//! Octant `o` is negative along axis `d` iff bit `d` of `o` is set, so
//! reflecting across a face normal to `d` is `o ^ (1 << d)`.
//!
//! Weights are normalised to sum to one over all directions: the scalar
//! flux is `φ = Σ w ψ` and an isotropic emission density `q` is used
//! directly as the angular source.

use std::f64::consts::PI;

use crate::constants::MAX_DIMENSION;
use crate::error::{TransportError, TransportResult};

#[derive(Debug, Clone)]
pub struct Quadrature {
    dimension: usize,
    /// First-octant cosines `[μ, η, ξ]` per angle.
    cosines: Vec<[f64; 3]>,
    /// Per-angle weight, identical in every octant.
    weights: Vec<f64>,
}

impl Quadrature {
    /// Gauss-Legendre set for slab geometry. `order` is the total number
    /// of directions and must be even.
    pub fn gauss_legendre(order: usize) -> TransportResult<Self> {
        if order < 2 || order % 2 != 0 {
            return Err(TransportError::ConfigError(format!(
                "Gauss-Legendre order must be even and >= 2, got {order}"
            )));
        }
        let (nodes, weights) = gauss_legendre_positive(order);
        let cosines = nodes.iter().map(|&mu| [mu, 0.0, 0.0]).collect();
        Self::from_octant(1, cosines, weights)
    }

    /// Chebyshev-Legendre product set for 2D or 3D: `azimuths` equally
    /// spaced azimuthal angles per quadrant times `polars` Gauss-Legendre
    /// polar cosines per hemisphere.
    pub fn product(dimension: usize, azimuths: usize, polars: usize) -> TransportResult<Self> {
        if !(2..=MAX_DIMENSION).contains(&dimension) {
            return Err(TransportError::ConfigError(format!(
                "product quadrature needs dimension 2 or 3, got {dimension}"
            )));
        }
        if azimuths == 0 || polars == 0 {
            return Err(TransportError::ConfigError(
                "product quadrature needs at least one azimuth and one polar angle".to_string(),
            ));
        }
        let (xi, polar_weights) = gauss_legendre_positive(2 * polars);
        let mut cosines = Vec::with_capacity(azimuths * polars);
        let mut weights = Vec::with_capacity(azimuths * polars);
        for (p, &x) in xi.iter().enumerate() {
            let sin_theta = (1.0 - x * x).sqrt();
            for a in 0..azimuths {
                let phi = (a as f64 + 0.5) * 0.5 * PI / azimuths as f64;
                cosines.push([sin_theta * phi.cos(), sin_theta * phi.sin(), x]);
                weights.push(polar_weights[p] / azimuths as f64);
            }
        }
        Self::from_octant(dimension, cosines, weights)
    }

    /// Externally supplied first-octant set. Weights are rescaled so the
    /// full sphere sums to one.
    pub fn from_octant(
        dimension: usize,
        cosines: Vec<[f64; 3]>,
        weights: Vec<f64>,
    ) -> TransportResult<Self> {
        if dimension == 0 || dimension > MAX_DIMENSION {
            return Err(TransportError::ConfigError(format!(
                "quadrature dimension must be 1, 2 or 3, got {dimension}"
            )));
        }
        if cosines.is_empty() || cosines.len() != weights.len() {
            return Err(TransportError::mismatch("quadrature weights", cosines.len(), weights.len()));
        }
        for (a, c) in cosines.iter().enumerate() {
            if c.iter().take(dimension).any(|&v| !(v > 0.0 && v <= 1.0)) {
                return Err(TransportError::ConfigError(format!(
                    "angle {a} needs first-octant cosines in (0, 1]"
                )));
            }
        }
        let sum: f64 = weights.iter().sum();
        if !(sum > 0.0) || weights.iter().any(|&w| w < 0.0) {
            return Err(TransportError::ConfigError(
                "quadrature weights must be non-negative with a positive sum".to_string(),
            ));
        }
        let octants = 1usize << dimension;
        let scale = 1.0 / (sum * octants as f64);
        Ok(Quadrature {
            dimension,
            cosines,
            weights: weights.into_iter().map(|w| w * scale).collect(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn number_octants(&self) -> usize {
        1 << self.dimension
    }

    pub fn angles_per_octant(&self) -> usize {
        self.cosines.len()
    }

    pub fn number_angles(&self) -> usize {
        self.number_octants() * self.angles_per_octant()
    }

    /// Flat direction index.
    #[inline]
    pub fn index(&self, o: usize, a: usize) -> usize {
        o * self.cosines.len() + a
    }

    /// Sign of each axis in octant `o`.
    #[inline]
    pub fn octant_sign(&self, o: usize) -> [f64; 3] {
        let mut sign = [1.0; 3];
        for (d, s) in sign.iter_mut().enumerate() {
            if (o >> d) & 1 == 1 {
                *s = -1.0;
            }
        }
        sign
    }

    /// Signed direction cosines of angle `a` in octant `o`.
    #[inline]
    pub fn direction(&self, o: usize, a: usize) -> [f64; 3] {
        let sign = self.octant_sign(o);
        let c = self.cosines[a];
        [sign[0] * c[0], sign[1] * c[1], sign[2] * c[2]]
    }

    /// Unsigned cosine of angle `a` along `axis`.
    #[inline]
    pub fn cosine(&self, a: usize, axis: usize) -> f64 {
        self.cosines[a][axis]
    }

    #[inline]
    pub fn weight(&self, a: usize) -> f64 {
        self.weights[a]
    }

    /// Octant mirrored across a face normal to `axis`.
    #[inline]
    pub fn reflect(&self, o: usize, axis: usize) -> usize {
        o ^ (1 << axis)
    }
}

/// Positive Gauss-Legendre nodes of `order` (even) in decreasing order,
/// with weights normalised to sum to one.
fn gauss_legendre_positive(order: usize) -> (Vec<f64>, Vec<f64>) {
    let half = order / 2;
    let mut nodes = Vec::with_capacity(half);
    let mut weights = Vec::with_capacity(half);
    for i in 0..half {
        let mut x = (PI * (i as f64 + 0.75) / (order as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre(order, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }
        let (_, dp) = legendre(order, x);
        nodes.push(x);
        weights.push(2.0 / ((1.0 - x * x) * dp * dp));
    }
    let sum: f64 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= sum;
    }
    (nodes, weights)
}

/// Legendre polynomial `P_n(x)` and its derivative.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=n {
        let kf = k as f64;
        let next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
        p_prev = p;
        p = next;
    }
    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}
