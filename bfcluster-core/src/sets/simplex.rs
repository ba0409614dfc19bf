//! Projection onto the capped simplex.
//!
//! ```text
//! Δ(k) = { θ ∈ ℝⁿ : 0 ≤ θᵢ ≤ 1, Σ θᵢ = k }
//! ```
//!
//! The projection of λ is θᵢ = clamp(λᵢ − τ, 0, 1) where τ solves
//! mass(τ) = Σ clamp(λᵢ − τ, 0, 1) = k. `mass` is continuous, nonincreasing and
//! piecewise linear with breakpoints at λᵢ and λᵢ − 1, so τ is found exactly by
//! sorting the 2n breakpoints, binary-searching the bracketing pair, and
//! interpolating. Total cost O(n log n).

use crate::error::ProjectionError;

#[inline]
fn mass(values: &[f64], tau: f64) -> f64 {
    values.iter().map(|&v| (v - tau).clamp(0.0, 1.0)).sum()
}

/// Threshold τ with Σ clamp(λᵢ − τ, 0, 1) = k.
pub fn capped_simplex_threshold(values: &[f64], k: f64) -> Result<f64, ProjectionError> {
    let n = values.len();
    if !(k >= 0.0 && k <= n as f64) {
        return Err(ProjectionError::RankOutOfRange { k, n });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ProjectionError::NonFinite { stage: "capped simplex" });
    }
    if n == 0 {
        return Ok(0.0);
    }

    let mut breakpoints: Vec<f64> = values.iter().flat_map(|&v| [v - 1.0, v]).collect();
    breakpoints.sort_unstable_by(|a, b| a.total_cmp(b));

    let mut lo = 0usize;
    let mut hi = breakpoints.len() - 1;
    let mut mass_lo = mass(values, breakpoints[lo]);
    let mut mass_hi = mass(values, breakpoints[hi]);

    // mass(bp[0]) = n and mass(bp[last]) = 0
    if mass_lo <= k {
        return Ok(breakpoints[lo]);
    }
    if mass_hi >= k {
        return Ok(breakpoints[hi]);
    }

    // Invariant: mass(bp[lo]) >= k > mass(bp[hi])
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        let mass_mid = mass(values, breakpoints[mid]);
        if mass_mid >= k {
            lo = mid;
            mass_lo = mass_mid;
        } else {
            hi = mid;
            mass_hi = mass_mid;
        }
    }

    let (t_lo, t_hi) = (breakpoints[lo], breakpoints[hi]);
    let drop = mass_lo - mass_hi;
    if drop <= 0.0 {
        return Ok(t_lo);
    }
    Ok(t_lo + (mass_lo - k) * (t_hi - t_lo) / drop)
}

/// Project `values` onto Δ(k), writing θ into `out`.
pub fn project_capped_simplex_into(
    values: &[f64],
    k: f64,
    out: &mut [f64],
) -> Result<(), ProjectionError> {
    assert_eq!(values.len(), out.len());
    let tau = capped_simplex_threshold(values, k)?;
    for (o, &v) in out.iter_mut().zip(values.iter()) {
        *o = (v - tau).clamp(0.0, 1.0);
    }
    Ok(())
}

/// Project `values` onto Δ(k).
pub fn project_capped_simplex(values: &[f64], k: f64) -> Result<Vec<f64>, ProjectionError> {
    let mut out = vec![0.0; values.len()];
    project_capped_simplex_into(values, k, &mut out)?;
    Ok(out)
}
