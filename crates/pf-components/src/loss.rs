//! Passive series loss component model.

use pf_core::Real;

use crate::common::{efficiency, get_mand, ParamMap};
use crate::error::ComponentResult;
use crate::limits::Limits;
use crate::PowerLoss;

/// Series element with resistance and/or a fixed voltage drop
/// (filters, cables, diodes, shunts).
#[derive(Clone, Debug, PartialEq)]
pub struct Loss {
    pub name: String,
    /// Series resistance (ohm)
    pub rs: Real,
    /// Fixed voltage drop (V)
    pub vdrop: Real,
    pub limits: Limits,
}

impl Loss {
    pub fn new(name: impl Into<String>, rs: Real, vdrop: Real) -> Self {
        Self {
            name: name.into(),
            rs: rs.abs(),
            vdrop: vdrop.abs(),
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build from a flat field map (`rs` and `vdrop` both mandatory).
    pub fn from_params(
        name: impl Into<String>,
        params: &ParamMap,
        limits: Limits,
    ) -> ComponentResult<Self> {
        let rs = get_mand(params, "rs")?;
        let vdrop = get_mand(params, "vdrop")?;
        Ok(Self::new(name, rs, vdrop).with_limits(limits))
    }

    pub fn initial_voltage(&self, _phase: Option<&str>) -> Real {
        0.0
    }

    pub fn initial_current(&self, _phase: Option<&str>) -> Real {
        0.0
    }

    pub fn output_voltage(&self, vi: Real, _ii: Real, io: Real, _phase: Option<&str>) -> Real {
        if vi == 0.0 {
            return 0.0;
        }
        // drop follows the polarity of the input rail
        if vi >= 0.0 {
            vi - self.rs * io - self.vdrop
        } else {
            vi + self.rs * io + self.vdrop
        }
    }

    pub fn input_current(&self, vi: Real, _vo: Real, io: Real, _phase: Option<&str>) -> Real {
        if vi == 0.0 {
            return 0.0;
        }
        io
    }

    pub fn power_loss(&self, vi: Real, vo: Real, ii: Real, io: Real, _phase: Option<&str>) -> PowerLoss {
        let loss = (self.rs * ii * ii + self.vdrop * ii).abs();
        let power = (vi * ii).abs();
        let opwr = (vo * io).abs();
        PowerLoss {
            power,
            loss,
            efficiency: efficiency(power, opwr, 0.0),
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
    fn drop_is_resistive_plus_fixed() {
        let loss = Loss::new("RC filter", 33.0, 0.0);
        let vo = loss.output_voltage(5.0, 0.0, 10e-3, None);
        assert!((vo - (5.0 - 0.33)).abs() < 1e-12);
    }

    #[test]
    fn negative_rail_drops_toward_zero() {
        let loss = Loss::new("diode", 0.0, 0.7);
        let vo = loss.output_voltage(-12.0, 0.0, 0.1, None);
        assert!((vo - (-11.3)).abs() < 1e-12);
    }

    #[test]
    fn dead_rail_passes_zero() {
        let loss = Loss::new("cable", 1.0, 0.5);
        assert_eq!(loss.output_voltage(0.0, 0.0, 1.0, None), 0.0);
        assert_eq!(loss.input_current(0.0, 0.0, 1.0, None), 0.0);
    }

    #[test]
    fn zero_power_efficiency_defaults_to_zero() {
        let loss = Loss::new("cable", 1.0, 0.0);
        let pl = loss.power_loss(0.0, 0.0, 0.0, 0.0, None);
        assert_eq!(pl.efficiency, 0.0);
    }

    #[test]
    fn dissipation_tracks_current() {
        let loss = Loss::new("shunt", 0.1, 0.2);
        let pl = loss.power_loss(5.0, 4.97, 0.1, 0.1, None);
        assert!((pl.loss - (0.1 * 0.01 + 0.2 * 0.1)).abs() < 1e-12);
        assert!((pl.power - 0.5).abs() < 1e-12);
    }

    #[test]
    fn from_params_requires_both_fields() {
        let mut params = ParamMap::new();
        params.insert("rs".into(), 33.0);
        assert!(Loss::from_params("l", &params, Limits::default()).is_err());
        params.insert("vdrop".into(), 0.0);
        assert!(Loss::from_params("l", &params, Limits::default()).is_ok());
    }
}
