//! The closed component variant type and its dispatch.

use pf_core::Real;

use crate::converter::Converter;
use crate::limits::Limits;
use crate::linreg::LinReg;
use crate::load::{load_power_loss, CurrentLoad, PowerLoad, ResistiveLoad};
use crate::loss::Loss;
use crate::source::Source;

/// Component kind tag.
///
/// The three load variants share the `Load` tag: they are interchangeable
/// from the graph's point of view (always leaves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Source,
    Load,
    Loss,
    Converter,
    LinReg,
}

impl ComponentKind {
    /// Whether a node of this kind may have a child of `child` kind.
    ///
    /// Loads are leaves; everything else accepts any kind except Source,
    /// which only ever appears as a root.
    pub fn allows_child(self, child: ComponentKind) -> bool {
        match self {
            ComponentKind::Load => false,
            _ => child != ComponentKind::Source,
        }
    }

    /// Stable tag used in result tables and persisted files.
    pub fn tag(self) -> &'static str {
        match self {
            ComponentKind::Source => "SOURCE",
            ComponentKind::Load => "LOAD",
            ComponentKind::Loss => "LOSS",
            ComponentKind::Converter => "CONVERTER",
            ComponentKind::LinReg => "LINREG",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Power and loss result of a single component evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLoss {
    /// Input power (W)
    pub power: Real,
    /// Dissipated power (W)
    pub loss: Real,
    /// Efficiency in percent
    pub efficiency: Real,
}

/// A power-tree component: one of the seven concrete kinds.
///
/// All electrical behavior dispatches through this enum, keeping a single
/// call site in the solver.
#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    Source(Source),
    PowerLoad(PowerLoad),
    CurrentLoad(CurrentLoad),
    ResistiveLoad(ResistiveLoad),
    Loss(Loss),
    Converter(Converter),
    LinReg(LinReg),
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Source(c) => &c.name,
            Component::PowerLoad(c) => &c.name,
            Component::CurrentLoad(c) => &c.name,
            Component::ResistiveLoad(c) => &c.name,
            Component::Loss(c) => &c.name,
            Component::Converter(c) => &c.name,
            Component::LinReg(c) => &c.name,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Source(_) => ComponentKind::Source,
            Component::PowerLoad(_) | Component::CurrentLoad(_) | Component::ResistiveLoad(_) => {
                ComponentKind::Load
            }
            Component::Loss(_) => ComponentKind::Loss,
            Component::Converter(_) => ComponentKind::Converter,
            Component::LinReg(_) => ComponentKind::LinReg,
        }
    }

    pub fn limits(&self) -> &Limits {
        match self {
            Component::Source(c) => &c.limits,
            Component::PowerLoad(c) => &c.limits,
            Component::CurrentLoad(c) => &c.limits,
            Component::ResistiveLoad(c) => &c.limits,
            Component::Loss(c) => &c.limits,
            Component::Converter(c) => &c.limits,
            Component::LinReg(c) => &c.limits,
        }
    }

    /// The source record, if this component is one. The solver needs the
    /// series resistance to reconstruct a root's input-side voltage.
    pub fn as_source(&self) -> Option<&Source> {
        match self {
            Component::Source(c) => Some(c),
            _ => None,
        }
    }

    /// Kind-specific parameter values in declaration order, for parameter
    /// reports and persistence.
    pub fn params(&self) -> Vec<(&'static str, Real)> {
        match self {
            Component::Source(c) => vec![("vo", c.vo), ("rs", c.rs)],
            Component::PowerLoad(c) => vec![("pwr", c.pwr), ("pwrs", c.pwrs)],
            Component::CurrentLoad(c) => vec![("ii", c.ii), ("iis", c.iis)],
            Component::ResistiveLoad(c) => vec![("rs", c.rs)],
            Component::Loss(c) => vec![("rs", c.rs), ("vdrop", c.vdrop)],
            Component::Converter(c) => {
                vec![("vo", c.vo), ("eff", c.eff), ("iq", c.iq), ("iis", c.iis)]
            }
            Component::LinReg(c) => {
                vec![("vo", c.vo), ("vdrop", c.vdrop), ("iq", c.iq), ("iis", c.iis)]
            }
        }
    }

    /// Phase names this component refers to, for phase-registry validation.
    pub fn referenced_phases(&self) -> Vec<&str> {
        match self {
            Component::Source(_) | Component::Loss(_) => Vec::new(),
            Component::PowerLoad(c) => c.phase_loads.keys().map(String::as_str).collect(),
            Component::CurrentLoad(c) => c.phase_loads.keys().map(String::as_str).collect(),
            Component::ResistiveLoad(c) => c.phase_loads.keys().map(String::as_str).collect(),
            Component::Converter(c) => c.active_phases.iter().map(String::as_str).collect(),
            Component::LinReg(c) => c.active_phases.iter().map(String::as_str).collect(),
        }
    }

    /// Starting output voltage for the relaxation (no-load value).
    pub fn initial_voltage(&self, phase: Option<&str>) -> Real {
        match self {
            Component::Source(c) => c.initial_voltage(phase),
            Component::PowerLoad(_) | Component::CurrentLoad(_) | Component::ResistiveLoad(_) => 0.0,
            Component::Loss(c) => c.initial_voltage(phase),
            Component::Converter(c) => c.initial_voltage(phase),
            Component::LinReg(c) => c.initial_voltage(phase),
        }
    }

    /// Starting input current for the relaxation (quiescent value).
    pub fn initial_current(&self, phase: Option<&str>) -> Real {
        match self {
            Component::Source(c) => c.initial_current(phase),
            Component::PowerLoad(_) | Component::ResistiveLoad(_) => 0.0,
            Component::CurrentLoad(c) => c.initial_current(phase),
            Component::Loss(c) => c.initial_current(phase),
            Component::Converter(c) => c.initial_current(phase),
            Component::LinReg(c) => c.initial_current(phase),
        }
    }

    /// Steady-state voltage presented to children.
    pub fn output_voltage(&self, vi: Real, ii: Real, io: Real, phase: Option<&str>) -> Real {
        match self {
            Component::Source(c) => c.output_voltage(vi, ii, io, phase),
            Component::PowerLoad(_) | Component::CurrentLoad(_) | Component::ResistiveLoad(_) => 0.0,
            Component::Loss(c) => c.output_voltage(vi, ii, io, phase),
            Component::Converter(c) => c.output_voltage(vi, ii, io, phase),
            Component::LinReg(c) => c.output_voltage(vi, ii, io, phase),
        }
    }

    /// Steady-state current drawn from the parent.
    pub fn input_current(&self, vi: Real, vo: Real, io: Real, phase: Option<&str>) -> Real {
        match self {
            Component::Source(c) => c.input_current(vi, vo, io, phase),
            Component::PowerLoad(c) => c.input_current(vi, vo, io, phase),
            Component::CurrentLoad(c) => c.input_current(vi, vo, io, phase),
            Component::ResistiveLoad(c) => c.input_current(vi, vo, io, phase),
            Component::Loss(c) => c.input_current(vi, vo, io, phase),
            Component::Converter(c) => c.input_current(vi, vo, io, phase),
            Component::LinReg(c) => c.input_current(vi, vo, io, phase),
        }
    }

    /// Input power, dissipated loss, and efficiency at the given operating point.
    pub fn power_loss(&self, vi: Real, vo: Real, ii: Real, io: Real, phase: Option<&str>) -> PowerLoss {
        match self {
            Component::Source(c) => c.power_loss(vi, vo, ii, io, phase),
            Component::PowerLoad(_) | Component::CurrentLoad(_) | Component::ResistiveLoad(_) => {
                load_power_loss(vi, ii)
            }
            Component::Loss(c) => c.power_loss(vi, vo, ii, io, phase),
            Component::Converter(c) => c.power_loss(vi, vo, ii, io, phase),
            Component::LinReg(c) => c.power_loss(vi, vo, ii, io, phase),
        }
    }

    /// Names of the limit fields violated at the given operating point.
    pub fn warnings(&self, vi: Real, vo: Real, ii: Real, io: Real, phase: Option<&str>) -> String {
        match self {
            Component::Source(c) => c.warnings(vi, vo, ii, io, phase),
            Component::PowerLoad(c) => c.warnings(vi, vo, ii, io, phase),
            Component::CurrentLoad(c) => c.warnings(vi, vo, ii, io, phase),
            Component::ResistiveLoad(c) => c.warnings(vi, vo, ii, io, phase),
            Component::Loss(c) => c.warnings(vi, vo, ii, io, phase),
            Component::Converter(c) => c.warnings(vi, vo, ii, io, phase),
            Component::LinReg(c) => c.warnings(vi, vo, ii, io, phase),
        }
    }
}

impl From<Source> for Component {
    fn from(c: Source) -> Self {
        Component::Source(c)
    }
}

impl From<PowerLoad> for Component {
    fn from(c: PowerLoad) -> Self {
        Component::PowerLoad(c)
    }
}

impl From<CurrentLoad> for Component {
    fn from(c: CurrentLoad) -> Self {
        Component::CurrentLoad(c)
    }
}

impl From<ResistiveLoad> for Component {
    fn from(c: ResistiveLoad) -> Self {
        Component::ResistiveLoad(c)
    }
}

impl From<Loss> for Component {
    fn from(c: Loss) -> Self {
        Component::Loss(c)
    }
}

impl From<Converter> for Component {
    fn from(c: Converter) -> Self {
        Component::Converter(c)
    }
}

impl From<LinReg> for Component {
    fn from(c: LinReg) -> Self {
        Component::LinReg(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_rule_table() {
        use ComponentKind::*;
        assert!(Source.allows_child(Load));
        assert!(Source.allows_child(Converter));
        assert!(!Source.allows_child(Source));
        assert!(!Load.allows_child(Load));
        assert!(!Load.allows_child(Loss));
        assert!(Loss.allows_child(LinReg));
        assert!(!Converter.allows_child(Source));
    }

    #[test]
    fn load_variants_share_kind_tag() {
        let p: Component = PowerLoad::new("p", 1.0).into();
        let i: Component = CurrentLoad::new("i", 1.0).into();
        let r: Component = ResistiveLoad::new("r", 1.0).unwrap().into();
        assert_eq!(p.kind(), ComponentKind::Load);
        assert_eq!(i.kind(), ComponentKind::Load);
        assert_eq!(r.kind(), ComponentKind::Load);
        assert_eq!(p.kind().tag(), "LOAD");
    }

    #[test]
    fn dispatch_reaches_variant_behavior() {
        let src: Component = Source::new("batt", 3.0, 0.013).into();
        assert_eq!(src.initial_voltage(None), 3.0);
        assert_eq!(src.name(), "batt");
        assert!(src.as_source().is_some());

        let load: Component = PowerLoad::new("MCU", 27e-3).into();
        assert_eq!(load.output_voltage(1.8, 0.0, 0.0, None), 0.0);
        assert!(load.as_source().is_none());
    }

    #[test]
    fn referenced_phases_collects_overrides() {
        let conv: Component = Converter::new("c", 3.3, 0.9)
            .unwrap()
            .with_active_phases(["active"])
            .into();
        assert_eq!(conv.referenced_phases(), vec!["active"]);

        let mut pl = crate::load::PhaseLoads::new();
        pl.insert("sleep".into(), 1e-6);
        let load: Component = PowerLoad::new("m", 0.2).with_phase_loads(pl).into();
        assert_eq!(load.referenced_phases(), vec!["sleep"]);
    }
}
