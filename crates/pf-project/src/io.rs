//! Load/save between [`PowerGraph`] and the system file schema.

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;

use pf_components::{
    Component, Converter, CurrentLoad, LinReg, Limits, Loss, PowerLoad, ResistiveLoad, Source,
};
use pf_graph::PowerGraph;

use crate::schema::{ComponentDef, ParamsDef, RootDef, SystemFile};
use crate::{ProjectError, ProjectResult};

/// Build a component from its persisted record.
fn build_component(kind: &str, p: &ParamsDef, limits: Limits) -> ProjectResult<Component> {
    let map = p.field_map();
    let comp = match kind {
        "SOURCE" => Source::from_params(&p.name, &map, limits)?.into(),
        "CONVERTER" => Converter::from_params(&p.name, &map, limits)?
            .with_active_phases(p.active_phases.clone())
            .into(),
        "LINREG" => LinReg::from_params(&p.name, &map, limits)?
            .with_active_phases(p.active_phases.clone())
            .into(),
        "LOSS" => Loss::from_params(&p.name, &map, limits)?.into(),
        // the load variants share a tag; the present field decides
        "LOAD" => {
            if p.pwr.is_some() {
                PowerLoad::from_params(&p.name, &map, limits)?
                    .with_phase_loads(p.phase_loads.clone())
                    .into()
            } else if p.rs.is_some() {
                ResistiveLoad::from_params(&p.name, &map, limits)?
                    .with_phase_loads(p.phase_loads.clone())
                    .into()
            } else {
                CurrentLoad::from_params(&p.name, &map, limits)?
                    .with_phase_loads(p.phase_loads.clone())
                    .into()
            }
        }
        other => return Err(ProjectError::UnknownKind(other.to_string())),
    };
    Ok(comp)
}

/// Persisted record of a live component.
fn params_of(comp: &Component) -> ParamsDef {
    let mut p = ParamsDef::named(comp.name());
    match comp {
        Component::Source(c) => {
            p.vo = Some(c.vo);
            p.rs = Some(c.rs);
        }
        Component::PowerLoad(c) => {
            p.pwr = Some(c.pwr);
            p.pwrs = Some(c.pwrs);
            p.phase_loads = c.phase_loads.clone();
        }
        Component::CurrentLoad(c) => {
            p.ii = Some(c.ii);
            p.iis = Some(c.iis);
            p.phase_loads = c.phase_loads.clone();
        }
        Component::ResistiveLoad(c) => {
            p.rs = Some(c.rs);
            p.phase_loads = c.phase_loads.clone();
        }
        Component::Loss(c) => {
            p.rs = Some(c.rs);
            p.vdrop = Some(c.vdrop);
        }
        Component::Converter(c) => {
            p.vo = Some(c.vo);
            p.eff = Some(c.eff);
            p.iq = Some(c.iq);
            p.iis = Some(c.iis);
            p.active_phases = c.active_phases.clone();
        }
        Component::LinReg(c) => {
            p.vo = Some(c.vo);
            p.vdrop = Some(c.vdrop);
            p.iq = Some(c.iq);
            p.iis = Some(c.iis);
            p.active_phases = c.active_phases.clone();
        }
    }
    p
}

/// Attach a root's children, tolerating any key order in the `childs` map.
fn replay_childs(
    graph: &mut PowerGraph,
    childs: &BTreeMap<String, Vec<ComponentDef>>,
) -> ProjectResult<()> {
    let mut pending: Vec<(&String, &Vec<ComponentDef>)> = childs.iter().collect();
    while !pending.is_empty() {
        let before = pending.len();
        let mut remaining = Vec::new();
        for (parent, defs) in pending {
            if graph.lookup(parent).is_none() {
                remaining.push((parent, defs));
                continue;
            }
            for def in defs {
                let comp = build_component(&def.kind, &def.params, def.limits.clone())?;
                graph.add_comp(parent, comp)?;
            }
        }
        if remaining.len() == before {
            return Err(ProjectError::UnresolvedParent(remaining[0].0.clone()));
        }
        pending = remaining;
    }
    Ok(())
}

/// Rebuild a graph from serialized JSON; all graph invariants are
/// re-validated through the normal mutation operations.
pub fn from_json(text: &str) -> ProjectResult<PowerGraph> {
    let file: SystemFile = serde_json::from_str(text)?;

    let mut roots = file.roots.iter();
    let (_, first) = roots.next().ok_or(ProjectError::NoSources)?;
    let comp = build_component(&first.kind, &first.params, first.limits.clone())?;
    let Component::Source(src) = comp else {
        return Err(ProjectError::RootMustBeSource(first.params.name.clone()));
    };
    let mut graph = PowerGraph::new(&file.name, src);
    for (_, def) in roots {
        let comp = build_component(&def.kind, &def.params, def.limits.clone())?;
        graph.add_source(comp)?;
    }
    for def in file.roots.values() {
        replay_childs(&mut graph, &def.childs)?;
    }
    if !file.phases.is_empty() {
        graph.set_phases(file.phases.clone())?;
    }
    Ok(graph)
}

/// Serialize a graph, one entry per source root with its subtree grouped
/// by parent name.
pub fn to_json(graph: &PowerGraph) -> ProjectResult<String> {
    let mut roots = BTreeMap::new();
    for root_id in graph.roots() {
        let Some(root) = graph.node(root_id) else {
            continue;
        };
        let mut childs: BTreeMap<String, Vec<ComponentDef>> = BTreeMap::new();
        let mut queue = VecDeque::from([root_id]);
        while let Some(id) = queue.pop_front() {
            let kids = graph.children_of(id);
            if kids.is_empty() {
                continue;
            }
            let parent_name = graph
                .node(id)
                .map(|n| n.component.name().to_string())
                .unwrap_or_default();
            let defs = kids
                .iter()
                .filter_map(|&k| graph.node(k))
                .map(|n| ComponentDef {
                    kind: n.component.kind().tag().to_string(),
                    params: params_of(&n.component),
                    limits: n.component.limits().clone(),
                })
                .collect();
            childs.insert(parent_name, defs);
            queue.extend(kids);
        }
        roots.insert(
            root.component.name().to_string(),
            RootDef {
                kind: root.component.kind().tag().to_string(),
                params: params_of(&root.component),
                limits: root.component.limits().clone(),
                childs,
            },
        );
    }

    let file = SystemFile {
        name: graph.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        phases: graph.phases().clone(),
        roots,
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Load a system file from disk.
pub fn load(path: impl AsRef<Path>) -> ProjectResult<PowerGraph> {
    from_json(&fs::read_to_string(path)?)
}

/// Save a system file to disk.
pub fn save(graph: &PowerGraph, path: impl AsRef<Path>) -> ProjectResult<()> {
    fs::write(path, to_json(graph)?)?;
    Ok(())
}
