//! Result-table assembly from a converged operating point.

use nalgebra::DVector;
use pf_core::Real;
use pf_graph::{PowerGraph, Topology};
use serde::Serialize;

use crate::relax::OperatingPoint;

/// One row of the solve result table.
///
/// Component rows carry the solved quantities and the names of any
/// violated limit fields; aggregate rows (`Subsystem <source>`,
/// `System total`, `System average`) carry summed power/loss and a
/// `Yes`/empty warning flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub component: String,
    pub kind: String,
    pub parent: String,
    pub domain: String,
    pub phase: String,
    pub vi: Real,
    pub vo: Real,
    pub ii: Real,
    pub io: Real,
    pub power: Real,
    pub loss: Real,
    pub efficiency: Real,
    pub warnings: String,
}

/// Aggregate efficiency in percent; unloaded systems report 100%.
fn aggregate_efficiency(power: Real, loss: Real) -> Real {
    if power > 0.0 {
        100.0 * (power - loss) / power
    } else {
        100.0
    }
}

/// Reconstruct per-node rows from the converged vectors, in topology order.
pub(crate) fn assemble(
    graph: &PowerGraph,
    top: &Topology,
    op: &OperatingPoint,
    phase: Option<&str>,
) -> Vec<ResultRow> {
    let v: &DVector<Real> = &op.voltages;
    let i: &DVector<Real> = &op.currents;
    let mut rows = Vec::with_capacity(top.len());

    for pos in 0..top.len() {
        let Some(node) = graph.node(top.node_id(pos)) else {
            continue;
        };
        let io: Real = top.children(pos).iter().map(|&c| i[c]).sum();
        let ii = i[pos];
        let vo = v[pos];
        let (vi, parent) = match top.parent(pos) {
            Some(p) => {
                let name = graph
                    .node(top.node_id(p))
                    .map(|n| n.component.name().to_string())
                    .unwrap_or_default();
                (v[p], name)
            }
            None => {
                // input side of a root sits above its series resistance
                let rs = node.component.as_source().map_or(0.0, |s| s.rs);
                (vo + rs * ii, String::new())
            }
        };

        let pl = node.component.power_loss(vi, vo, ii, io, phase);
        rows.push(ResultRow {
            component: node.component.name().to_string(),
            kind: node.component.kind().tag().to_string(),
            parent,
            domain: top.domain(pos).to_string(),
            phase: phase.unwrap_or_default().to_string(),
            vi,
            vo,
            ii,
            io,
            power: pl.power,
            loss: pl.loss,
            efficiency: pl.efficiency,
            warnings: node.component.warnings(vi, vo, ii, io, phase),
        });
    }
    rows
}

/// Append the `Subsystem <source>` rows (multi-source only) and the
/// `System total` row.
pub(crate) fn aggregate(rows: &mut Vec<ResultRow>, top: &Topology, phase: Option<&str>) {
    let blank = |component: String, domain: String, power: Real, loss: Real, warned: bool| {
        ResultRow {
            component,
            kind: String::new(),
            parent: String::new(),
            domain,
            phase: phase.unwrap_or_default().to_string(),
            vi: 0.0,
            vo: 0.0,
            ii: 0.0,
            io: 0.0,
            power,
            loss,
            efficiency: aggregate_efficiency(power, loss),
            warnings: if warned { "Yes".to_string() } else { String::new() },
        }
    };

    // component rows share indices with topology positions
    let mut subsystems = Vec::new();
    let mut total_power = 0.0;
    let mut total_loss = 0.0;
    let mut total_warned = false;
    for &root in top.roots() {
        let domain = rows[root].domain.clone();
        let power = rows[root].power;
        let loss: Real = rows
            .iter()
            .filter(|r| r.domain == domain)
            .map(|r| r.loss)
            .sum();
        let warned = rows
            .iter()
            .any(|r| r.domain == domain && !r.warnings.is_empty());
        total_power += power;
        total_loss += loss;
        total_warned |= warned;
        subsystems.push(blank(
            format!("Subsystem {domain}"),
            domain,
            power,
            loss,
            warned,
        ));
    }

    if subsystems.len() > 1 {
        rows.append(&mut subsystems);
    }
    rows.push(blank(
        "System total".to_string(),
        String::new(),
        total_power,
        total_loss,
        total_warned,
    ));
}
