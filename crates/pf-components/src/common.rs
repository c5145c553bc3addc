//! Common utilities for component calculations.

use std::collections::BTreeMap;

use pf_core::numeric::ensure_finite;
use pf_core::Real;

use crate::error::{ComponentError, ComponentResult};

/// Flat numeric field map used by the per-kind factories.
pub type ParamMap = BTreeMap<String, Real>;

/// Get a mandatory parameter from a field map.
pub fn get_mand(params: &ParamMap, key: &str) -> ComponentResult<Real> {
    let value = params
        .get(key)
        .copied()
        .ok_or_else(|| ComponentError::MissingParam {
            key: key.to_string(),
        })?;
    ensure_finite(value, "parameter").map_err(|_| ComponentError::NonFinite {
        key: key.to_string(),
    })
}

/// Get an optional parameter from a field map.
pub fn get_opt(params: &ParamMap, key: &str, default: Real) -> Real {
    params.get(key).copied().unwrap_or(default)
}

/// Efficiency in percent from input and output power.
///
/// Zero input power yields `default` (100% for sources and loads,
/// 0% for series elements and regulators).
pub fn efficiency(ipwr: Real, opwr: Real, default: Real) -> Real {
    if ipwr > 0.0 {
        100.0 * (opwr / ipwr).abs()
    } else {
        default
    }
}

/// Resolve a phase-dependent load value.
///
/// No phase or no overrides: the base value. Phase unlisted in the
/// overrides: the standby fallback. Otherwise the override.
pub fn resolve_phase_value(
    base: Real,
    standby: Real,
    overrides: &BTreeMap<String, Real>,
    phase: Option<&str>,
) -> Real {
    match phase {
        None => base,
        Some(_) if overrides.is_empty() => base,
        Some(p) => overrides.get(p).copied().unwrap_or(standby),
    }
}

/// Whether a regulator is active in the given phase.
///
/// An empty `active_phases` list means always-on.
pub fn phase_active(active_phases: &[String], phase: Option<&str>) -> bool {
    match phase {
        None => true,
        Some(_) if active_phases.is_empty() => true,
        Some(p) => active_phases.iter().any(|a| a == p),
    }
}
