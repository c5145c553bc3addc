//! Linear regulator component model.

use pf_core::Real;

use crate::common::{efficiency, get_mand, get_opt, phase_active, ParamMap};
use crate::error::{ComponentError, ComponentResult};
use crate::limits::Limits;
use crate::PowerLoss;

/// Low-dropout linear regulator.
///
/// Output tracks the input minus the dropout voltage up to the set point;
/// everything above the output rail is dissipated. Inactive-phase behavior
/// mirrors [`crate::Converter`]: 0V out, standby current `iis` in.
#[derive(Clone, Debug, PartialEq)]
pub struct LinReg {
    pub name: String,
    /// Regulated output voltage (sign defines polarity)
    pub vo: Real,
    /// Dropout voltage, |vdrop| < |vo|
    pub vdrop: Real,
    /// Quiescent current while active (A)
    pub iq: Real,
    /// Standby current while inactive (A)
    pub iis: Real,
    pub active_phases: Vec<String>,
    pub limits: Limits,
}

impl LinReg {
    pub fn new(name: impl Into<String>, vo: Real, vdrop: Real) -> ComponentResult<Self> {
        if vdrop.abs() >= vo.abs() {
            return Err(ComponentError::InvalidArg {
                what: "linreg dropout voltage must be < |vo|",
            });
        }
        Ok(Self {
            name: name.into(),
            vo,
            vdrop: vdrop.abs(),
            iq: 0.0,
            iis: 0.0,
            active_phases: Vec::new(),
            limits: Limits::default(),
        })
    }

    pub fn with_iq(mut self, iq: Real) -> Self {
        self.iq = iq.abs();
        self
    }

    pub fn with_standby_current(mut self, iis: Real) -> Self {
        self.iis = iis.abs();
        self
    }

    pub fn with_active_phases<I, S>(mut self, phases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_phases = phases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build from a flat field map (`vo` mandatory; `vdrop`, `iq`, `iis` optional).
    pub fn from_params(
        name: impl Into<String>,
        params: &ParamMap,
        limits: Limits,
    ) -> ComponentResult<Self> {
        let vo = get_mand(params, "vo")?;
        let vdrop = get_opt(params, "vdrop", 0.0);
        let iq = get_opt(params, "iq", 0.0);
        let iis = get_opt(params, "iis", 0.0);
        Ok(Self::new(name, vo, vdrop)?
            .with_iq(iq)
            .with_standby_current(iis)
            .with_limits(limits))
    }

    fn active(&self, phase: Option<&str>) -> bool {
        phase_active(&self.active_phases, phase)
    }

    pub fn initial_voltage(&self, phase: Option<&str>) -> Real {
        if self.active(phase) { self.vo } else { 0.0 }
    }

    pub fn initial_current(&self, phase: Option<&str>) -> Real {
        if self.active(phase) { self.iq } else { self.iis }
    }

    pub fn output_voltage(&self, vi: Real, _ii: Real, _io: Real, phase: Option<&str>) -> Real {
        let mut v = self.vo.abs().min((vi.abs() - self.vdrop).max(0.0));
        if !self.active(phase) {
            v = 0.0;
        }
        if self.vo >= 0.0 { v } else { -v }
    }

    pub fn input_current(&self, vi: Real, _vo: Real, io: Real, phase: Option<&str>) -> Real {
        if vi == 0.0 {
            return 0.0;
        }
        if self.active(phase) {
            io + self.iq
        } else {
            self.iis
        }
    }

    pub fn power_loss(&self, vi: Real, vo: Real, ii: Real, io: Real, phase: Option<&str>) -> PowerLoss {
        let (power, loss) = if self.active(phase) {
            let loss = (vi.abs() - vo.abs()) * io + vi.abs() * self.iq;
            ((vi * ii).abs(), loss)
        } else {
            (0.0, (self.iis * vi).abs())
        };
        PowerLoss {
            power,
            loss,
            efficiency: efficiency(power, power - loss, 0.0),
        }
    }

    pub fn warnings(&self, vi: Real, vo: Real, ii: Real, io: Real, _phase: Option<&str>) -> String {
        self.limits
            .check(&[("vi", vi), ("vo", vo), ("ii", ii), ("io", io)])
    }
}
