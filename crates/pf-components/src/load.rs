//! Leaf load component models: fixed power, fixed current, fixed resistance.

use std::collections::BTreeMap;

use pf_core::Real;

use crate::common::{get_mand, get_opt, resolve_phase_value, ParamMap};
use crate::error::{ComponentError, ComponentResult};
use crate::limits::Limits;
use crate::PowerLoss;

/// Phase-name to override-value map shared by the load kinds.
pub type PhaseLoads = BTreeMap<String, Real>;

/// Whether limit checks apply for this load in the given phase.
///
/// A load with phase overrides is considered idle in phases it does not
/// list, so warnings are suppressed there.
fn warnings_apply(overrides: &PhaseLoads, phase: Option<&str>) -> bool {
    match phase {
        None => true,
        Some(p) => overrides.is_empty() || overrides.contains_key(p),
    }
}

/// Load drawing a fixed power regardless of supply voltage.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerLoad {
    pub name: String,
    /// Power draw in the default phase (W)
    pub pwr: Real,
    /// Standby draw for phases not listed in `phase_loads`
    pub pwrs: Real,
    pub phase_loads: PhaseLoads,
    pub limits: Limits,
}

impl PowerLoad {
    pub fn new(name: impl Into<String>, pwr: Real) -> Self {
        Self {
            name: name.into(),
            pwr: pwr.abs(),
            pwrs: 0.0,
            phase_loads: PhaseLoads::new(),
            limits: Limits::default(),
        }
    }

    pub fn with_standby(mut self, pwrs: Real) -> Self {
        self.pwrs = pwrs.abs();
        self
    }

    pub fn with_phase_loads(mut self, phase_loads: PhaseLoads) -> Self {
        self.phase_loads = phase_loads;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build from a flat field map (`pwr` mandatory, `pwrs` optional).
    pub fn from_params(
        name: impl Into<String>,
        params: &ParamMap,
        limits: Limits,
    ) -> ComponentResult<Self> {
        let pwr = get_mand(params, "pwr")?;
        let pwrs = get_opt(params, "pwrs", 0.0);
        Ok(Self::new(name, pwr).with_standby(pwrs).with_limits(limits))
    }

    pub fn input_current(&self, vi: Real, _vo: Real, _io: Real, phase: Option<&str>) -> Real {
        if vi == 0.0 {
            return 0.0;
        }
        let p = resolve_phase_value(self.pwr, self.pwrs, &self.phase_loads, phase);
        p / vi.abs()
    }

    pub fn warnings(&self, vi: Real, _vo: Real, ii: Real, _io: Real, phase: Option<&str>) -> String {
        if !warnings_apply(&self.phase_loads, phase) {
            return String::new();
        }
        self.limits.check(&[("vi", vi), ("ii", ii)])
    }
}

/// Load drawing a fixed current regardless of supply voltage.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentLoad {
    pub name: String,
    /// Current draw in the default phase (A)
    pub ii: Real,
    /// Standby draw for phases not listed in `phase_loads`
    pub iis: Real,
    pub phase_loads: PhaseLoads,
    pub limits: Limits,
}

impl CurrentLoad {
    pub fn new(name: impl Into<String>, ii: Real) -> Self {
        Self {
            name: name.into(),
            ii: ii.abs(),
            iis: 0.0,
            phase_loads: PhaseLoads::new(),
            limits: Limits::default(),
        }
    }

    pub fn with_standby(mut self, iis: Real) -> Self {
        self.iis = iis.abs();
        self
    }

    pub fn with_phase_loads(mut self, phase_loads: PhaseLoads) -> Self {
        self.phase_loads = phase_loads;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build from a flat field map (`ii` mandatory, `iis` optional).
    pub fn from_params(
        name: impl Into<String>,
        params: &ParamMap,
        limits: Limits,
    ) -> ComponentResult<Self> {
        let ii = get_mand(params, "ii")?;
        let iis = get_opt(params, "iis", 0.0);
        Ok(Self::new(name, ii).with_standby(iis).with_limits(limits))
    }

    pub fn initial_current(&self, phase: Option<&str>) -> Real {
        resolve_phase_value(self.ii, self.iis, &self.phase_loads, phase).abs()
    }

    pub fn input_current(&self, vi: Real, _vo: Real, _io: Real, phase: Option<&str>) -> Real {
        if vi == 0.0 {
            return 0.0;
        }
        resolve_phase_value(self.ii, self.iis, &self.phase_loads, phase).abs()
    }

    pub fn warnings(&self, vi: Real, _vo: Real, ii: Real, _io: Real, phase: Option<&str>) -> String {
        if !warnings_apply(&self.phase_loads, phase) {
            return String::new();
        }
        self.limits.check(&[("vi", vi), ("ii", ii)])
    }
}

/// Load drawing current through a fixed resistance.
#[derive(Clone, Debug, PartialEq)]
pub struct ResistiveLoad {
    pub name: String,
    /// Load resistance (ohm), strictly positive
    pub rs: Real,
    pub phase_loads: PhaseLoads,
    pub limits: Limits,
}

impl ResistiveLoad {
    pub fn new(name: impl Into<String>, rs: Real) -> ComponentResult<Self> {
        if rs.abs() == 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "resistive load rs must be > 0",
            });
        }
        Ok(Self {
            name: name.into(),
            rs: rs.abs(),
            phase_loads: PhaseLoads::new(),
            limits: Limits::default(),
        })
    }

    pub fn with_phase_loads(mut self, phase_loads: PhaseLoads) -> Self {
        self.phase_loads = phase_loads;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build from a flat field map (`rs` mandatory).
    pub fn from_params(
        name: impl Into<String>,
        params: &ParamMap,
        limits: Limits,
    ) -> ComponentResult<Self> {
        let rs = get_mand(params, "rs")?;
        Ok(Self::new(name, rs)?.with_limits(limits))
    }

    pub fn input_current(&self, vi: Real, _vo: Real, _io: Real, phase: Option<&str>) -> Real {
        // Unlisted phases keep the base resistance
        let r = resolve_phase_value(self.rs, self.rs, &self.phase_loads, phase);
        vi.abs() / r
    }

    pub fn warnings(&self, vi: Real, _vo: Real, ii: Real, _io: Real, phase: Option<&str>) -> String {
        if !warnings_apply(&self.phase_loads, phase) {
            return String::new();
        }
        self.limits.check(&[("vi", vi), ("ii", ii)])
    }
}

/// Power and loss shared by all load kinds: loads consume their input power
/// entirely, so loss is zero and efficiency is pinned at 100%.
pub(crate) fn load_power_loss(vi: Real, ii: Real) -> PowerLoss {
    PowerLoss {
        power: (vi * ii).abs(),
        loss: 0.0,
        efficiency: 100.0,
    }
}
