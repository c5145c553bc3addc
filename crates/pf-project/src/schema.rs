//! System file schema definitions.
//!
//! The file is a JSON object with `name`, `version`, an optional `phases`
//! map, and one entry per source root keyed by the source's name. Each
//! root entry carries the source's own record plus a `childs` map from
//! parent name to the list of components attached under it.

use std::collections::BTreeMap;

use pf_components::{Limits, ParamMap};
use pf_core::Real;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemFile {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub phases: BTreeMap<String, Real>,
    #[serde(flatten)]
    pub roots: BTreeMap<String, RootDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootDef {
    #[serde(rename = "type")]
    pub kind: String,
    pub params: ParamsDef,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub childs: BTreeMap<String, Vec<ComponentDef>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    #[serde(rename = "type")]
    pub kind: String,
    pub params: ParamsDef,
    #[serde(default)]
    pub limits: Limits,
}

/// Kind-specific field map. `type` decides which fields are read; the
/// three load variants share the LOAD tag and are told apart by which of
/// `pwr`/`rs`/`ii` is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParamsDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vo: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rs: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eff: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdrop: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iq: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iis: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwr: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwrs: Option<Real>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ii: Option<Real>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub phase_loads: BTreeMap<String, Real>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active_phases: Vec<String>,
}

impl ParamsDef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Flatten the present numeric fields into a [`ParamMap`] for the
    /// per-kind component factories.
    pub fn field_map(&self) -> ParamMap {
        let fields = [
            ("vo", self.vo),
            ("rs", self.rs),
            ("eff", self.eff),
            ("vdrop", self.vdrop),
            ("iq", self.iq),
            ("iis", self.iis),
            ("pwr", self.pwr),
            ("pwrs", self.pwrs),
            ("ii", self.ii),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
            .collect()
    }
}
