// ─────────────────────────────────────────────────────────────────────
// SCPN Transport — Material
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array2, Array3};

use crate::error::{TransportError, TransportResult};

/// Multigroup macroscopic cross sections per material.
///
/// Scattering is stored as `sigma_s[m, g_to, g_from]` (isotropic, P0).
/// Group 0 is the highest energy group, so `g_from > g_to` is upscatter.
#[derive(Debug, Clone)]
pub struct Material {
    number_materials: usize,
    number_groups: usize,
    sigma_t: Array2<f64>,
    sigma_s: Array3<f64>,
    nu_sigma_f: Array2<f64>,
    chi: Array2<f64>,
}

impl Material {
    pub fn new(number_materials: usize, number_groups: usize) -> TransportResult<Self> {
        if number_materials == 0 || number_groups == 0 {
            return Err(TransportError::ConfigError(
                "material needs at least one material and one group".to_string(),
            ));
        }
        Ok(Material {
            number_materials,
            number_groups,
            sigma_t: Array2::zeros((number_materials, number_groups)),
            sigma_s: Array3::zeros((number_materials, number_groups, number_groups)),
            nu_sigma_f: Array2::zeros((number_materials, number_groups)),
            chi: Array2::zeros((number_materials, number_groups)),
        })
    }

    fn check(&self, m: usize, g: usize) -> TransportResult<()> {
        if m >= self.number_materials {
            return Err(TransportError::out_of_bounds("material", m, self.number_materials));
        }
        if g >= self.number_groups {
            return Err(TransportError::out_of_bounds("group", g, self.number_groups));
        }
        Ok(())
    }

    pub fn set_sigma_t(&mut self, m: usize, g: usize, value: f64) -> TransportResult<()> {
        self.check(m, g)?;
        self.sigma_t[[m, g]] = value;
        Ok(())
    }

    /// Scattering from `g_from` into `g_to`.
    pub fn set_sigma_s(&mut self, m: usize, g_to: usize, g_from: usize, value: f64) -> TransportResult<()> {
        self.check(m, g_to)?;
        self.check(m, g_from)?;
        self.sigma_s[[m, g_to, g_from]] = value;
        Ok(())
    }

    pub fn set_nu_sigma_f(&mut self, m: usize, g: usize, value: f64) -> TransportResult<()> {
        self.check(m, g)?;
        self.nu_sigma_f[[m, g]] = value;
        Ok(())
    }

    pub fn set_chi(&mut self, m: usize, g: usize, value: f64) -> TransportResult<()> {
        self.check(m, g)?;
        self.chi[[m, g]] = value;
        Ok(())
    }

    /// Set every per-group vector of material `m` at once.
    pub fn set_group_data(
        &mut self,
        m: usize,
        sigma_t: &[f64],
        nu_sigma_f: &[f64],
        chi: &[f64],
    ) -> TransportResult<()> {
        for (name, v) in [("sigma_t", sigma_t), ("nu_sigma_f", nu_sigma_f), ("chi", chi)] {
            if v.len() != self.number_groups {
                return Err(TransportError::mismatch(name, self.number_groups, v.len()));
            }
        }
        for g in 0..self.number_groups {
            self.set_sigma_t(m, g, sigma_t[g])?;
            self.set_nu_sigma_f(m, g, nu_sigma_f[g])?;
            self.set_chi(m, g, chi[g])?;
        }
        Ok(())
    }

    pub fn number_materials(&self) -> usize {
        self.number_materials
    }

    pub fn number_groups(&self) -> usize {
        self.number_groups
    }

    #[inline]
    pub fn sigma_t(&self, m: usize, g: usize) -> f64 {
        self.sigma_t[[m, g]]
    }

    #[inline]
    pub fn sigma_s(&self, m: usize, g_to: usize, g_from: usize) -> f64 {
        self.sigma_s[[m, g_to, g_from]]
    }

    #[inline]
    pub fn nu_sigma_f(&self, m: usize, g: usize) -> f64 {
        self.nu_sigma_f[[m, g]]
    }

    #[inline]
    pub fn chi(&self, m: usize, g: usize) -> f64 {
        self.chi[[m, g]]
    }

    /// Diffusion coefficient `1/(3σt)`.
    #[inline]
    pub fn diff_coef(&self, m: usize, g: usize) -> f64 {
        1.0 / (3.0 * self.sigma_t[[m, g]])
    }

    /// Absorption: total minus all scattering out of `g`.
    pub fn sigma_a(&self, m: usize, g: usize) -> f64 {
        let out: f64 = (0..self.number_groups).map(|gp| self.sigma_s[[m, gp, g]]).sum();
        self.sigma_t[[m, g]] - out
    }

    pub fn is_fissile(&self, m: usize) -> bool {
        (0..self.number_groups).any(|g| self.nu_sigma_f[[m, g]] > 0.0)
    }

    /// True when no material scatters from a lower to a higher energy group.
    pub fn downscatter(&self) -> bool {
        self.upscatter_cutoff() == self.number_groups
    }

    /// First group that receives upscatter from any lower-energy group, or
    /// `number_groups` when there is none.
    pub fn upscatter_cutoff(&self) -> usize {
        for g in 0..self.number_groups {
            for m in 0..self.number_materials {
                if (g + 1..self.number_groups).any(|gp| self.sigma_s[[m, g, gp]] != 0.0) {
                    return g;
                }
            }
        }
        self.number_groups
    }

    /// Physical sanity: positive total cross sections, non-negative
    /// everything else.
    pub fn validate(&self) -> TransportResult<()> {
        for m in 0..self.number_materials {
            for g in 0..self.number_groups {
                let st = self.sigma_t[[m, g]];
                if !(st.is_finite() && st > 0.0) {
                    return Err(TransportError::ConfigError(format!(
                        "material {m} group {g}: sigma_t must be positive, got {st}"
                    )));
                }
                if self.nu_sigma_f[[m, g]] < 0.0 || self.chi[[m, g]] < 0.0 {
                    return Err(TransportError::ConfigError(format!(
                        "material {m} group {g}: fission data must be non-negative"
                    )));
                }
                if (0..self.number_groups).any(|gp| self.sigma_s[[m, g, gp]] < 0.0) {
                    return Err(TransportError::ConfigError(format!(
                        "material {m} group {g}: scattering must be non-negative"
                    )));
                }
            }
        }
        Ok(())
    }
}
