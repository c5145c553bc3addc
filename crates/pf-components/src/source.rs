//! Voltage source component model.

use pf_core::Real;

use crate::common::{efficiency, get_mand, get_opt, ParamMap};
use crate::error::ComponentResult;
use crate::limits::Limits;
use crate::PowerLoss;

/// Ideal voltage source with series resistance.
///
/// Sources are the roots of a power tree; they never have a parent, so the
/// input-side quantities are synthesized by the solver (vi = vo + rs*ii).
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    pub name: String,
    /// No-load output voltage (sign defines rail polarity)
    pub vo: Real,
    /// Series resistance (ohm)
    pub rs: Real,
    pub limits: Limits,
}

impl Source {
    pub fn new(name: impl Into<String>, vo: Real, rs: Real) -> Self {
        Self {
            name: name.into(),
            vo,
            rs: rs.abs(),
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build from a flat field map (`vo` mandatory, `rs` optional).
    pub fn from_params(
        name: impl Into<String>,
        params: &ParamMap,
        limits: Limits,
    ) -> ComponentResult<Self> {
        let vo = get_mand(params, "vo")?;
        let rs = get_opt(params, "rs", 0.0);
        Ok(Self::new(name, vo, rs).with_limits(limits))
    }

    pub fn initial_voltage(&self, _phase: Option<&str>) -> Real {
        self.vo
    }

    pub fn initial_current(&self, _phase: Option<&str>) -> Real {
        0.0
    }

    pub fn output_voltage(&self, _vi: Real, _ii: Real, io: Real, _phase: Option<&str>) -> Real {
        self.vo - self.rs * io
    }

    pub fn input_current(&self, _vi: Real, _vo: Real, io: Real, _phase: Option<&str>) -> Real {
        io
    }

    pub fn power_loss(
        &self,
        _vi: Real,
        vo: Real,
        _ii: Real,
        io: Real,
        _phase: Option<&str>,
    ) -> PowerLoss {
        let opwr = (vo * io).abs();
        let loss = self.rs * io * io;
        let power = opwr + loss;
        PowerLoss {
            power,
            loss,
            efficiency: efficiency(power, opwr, 100.0),
        }
    }

    pub fn warnings(&self, _vi: Real, _vo: Real, ii: Real, io: Real, _phase: Option<&str>) -> String {
        self.limits.check(&[("ii", ii), ("io", io)])
    }
}
