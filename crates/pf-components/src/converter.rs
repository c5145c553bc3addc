//! Switching converter component model.

use pf_core::Real;

use crate::common::{efficiency, get_mand, get_opt, phase_active, ParamMap};
use crate::error::{ComponentError, ComponentResult};
use crate::limits::Limits;
use crate::PowerLoss;

/// Switching regulator with fixed output voltage and flat efficiency.
///
/// When `active_phases` is non-empty and the current phase is not listed,
/// the converter is powered down: it outputs 0V and draws only the
/// standby current `iis`.
#[derive(Clone, Debug, PartialEq)]
pub struct Converter {
    pub name: String,
    /// Regulated output voltage (sign defines polarity)
    pub vo: Real,
    /// Conversion efficiency, open interval (0, 1)
    pub eff: Real,
    /// Quiescent current while active (A)
    pub iq: Real,
    /// Standby current while inactive (A)
    pub iis: Real,
    pub active_phases: Vec<String>,
    pub limits: Limits,
}

impl Converter {
    pub fn new(name: impl Into<String>, vo: Real, eff: Real) -> ComponentResult<Self> {
        if eff <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "converter efficiency must be > 0.0",
            });
        }
        if eff >= 1.0 {
            return Err(ComponentError::InvalidArg {
                what: "converter efficiency must be < 1.0",
            });
        }
        Ok(Self {
            name: name.into(),
            vo,
            eff,
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

    /// Build from a flat field map (`vo`, `eff` mandatory; `iq`, `iis` optional).
    pub fn from_params(
        name: impl Into<String>,
        params: &ParamMap,
        limits: Limits,
    ) -> ComponentResult<Self> {
        let vo = get_mand(params, "vo")?;
        let eff = get_mand(params, "eff")?;
        let iq = get_opt(params, "iq", 0.0);
        let iis = get_opt(params, "iis", 0.0);
        Ok(Self::new(name, vo, eff)?
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

    pub fn output_voltage(&self, _vi: Real, _ii: Real, _io: Real, phase: Option<&str>) -> Real {
        if self.active(phase) { self.vo } else { 0.0 }
    }

    pub fn input_current(&self, vi: Real, vo: Real, io: Real, phase: Option<&str>) -> Real {
        if vi == 0.0 {
            return 0.0;
        }
        if !self.active(phase) {
            return self.iis;
        }
        let ve = self.eff * vi;
        if ve > 0.0 {
            self.iq + (vo * io / ve).abs()
        } else {
            0.0
        }
    }

    pub fn power_loss(&self, vi: Real, _vo: Real, ii: Real, _io: Real, phase: Option<&str>) -> PowerLoss {
        let (power, loss) = if self.active(phase) {
            let loss = (self.iq * vi + (ii - self.iq) * vi * (1.0 - self.eff)).abs();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_bounds_are_exclusive() {
        assert!(Converter::new("c", 1.8, 0.0).is_err());
        assert!(Converter::new("c", 1.8, 1.0).is_err());
        assert!(Converter::new("c", 1.8, 1.5).is_err());
        assert!(Converter::new("c", 1.8, 0.87).is_ok());
    }

    #[test]
    fn input_current_reflects_output_power() {
        let conv = Converter::new("1.8V buck", 1.8, 0.87)
            .unwrap()
            .with_iq(12e-6);
        let ii = conv.input_current(3.0, 1.8, 0.015, None);
        let expected: Real = 12e-6 + Real::abs(1.8 * 0.015 / (0.87 * 3.0));
        assert!((ii - expected).abs() < 1e-12);
    }

    #[test]
    fn dead_input_draws_nothing() {
        let conv = Converter::new("Buck", 3.3, 0.5).unwrap();
        assert_eq!(conv.input_current(0.0, 3.3, 0.1, None), 0.0);
    }

    #[test]
    fn negative_input_with_positive_efficiency_cuts_off() {
        let conv = Converter::new("inv", -12.0, 0.88).unwrap();
        // eff * vi <= 0 means no conversion path
        assert_eq!(conv.input_current(-5.0, -12.0, 0.1, None), 0.0);
    }

    #[test]
    fn inactive_phase_powers_down() {
        let conv = Converter::new("Buck 3.3", 3.3, 0.88)
            .unwrap()
            .with_standby_current(20e-6)
            .with_active_phases(["active"]);

        assert_eq!(conv.output_voltage(5.0, 0.0, 0.0, Some("sleep")), 0.0);
        assert_eq!(conv.input_current(5.0, 0.0, 0.1, Some("sleep")), 20e-6);
        let pl = conv.power_loss(5.0, 0.0, 20e-6, 0.0, Some("sleep"));
        assert_eq!(pl.power, 0.0);
        assert!((pl.loss - 1e-4).abs() < 1e-12);
        assert_eq!(pl.efficiency, 0.0);

        // active and no-phase behave normally
        assert_eq!(conv.output_voltage(5.0, 0.0, 0.0, Some("active")), 3.3);
        assert_eq!(conv.output_voltage(5.0, 0.0, 0.0, None), 3.3);
    }

    #[test]
    fn loss_splits_quiescent_and_conversion() {
        let conv = Converter::new("buck", 1.8, 0.9).unwrap().with_iq(1e-3);
        let vi = 5.0;
        let ii = 0.1;
        let pl = conv.power_loss(vi, 1.8, ii, 0.0, None);
        let expected = (1e-3 * vi + (ii - 1e-3) * vi * 0.1).abs();
        assert!((pl.loss - expected).abs() < 1e-12);
        assert!((pl.power - 0.5).abs() < 1e-12);
    }
}
