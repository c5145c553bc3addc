//! High-level solver interface.

use pf_core::Real;
use pf_graph::PowerGraph;
use tracing::debug;

use crate::error::{SolverError, SolverResult};
use crate::relax::{relax, SolveConfig};
use crate::report::{aggregate, assemble, ResultRow};

/// Solve one operating phase (or the phase-less steady state).
///
/// An explicit phase must be declared on the graph. Returns the component
/// rows in topological order followed by the aggregate rows.
pub fn solve_phase(
    graph: &PowerGraph,
    config: &SolveConfig,
    phase: Option<&str>,
) -> SolverResult<Vec<ResultRow>> {
    if let Some(p) = phase {
        if !graph.phases().contains_key(p) {
            return Err(SolverError::UnknownPhase(p.to_string()));
        }
    }
    let top = graph.topology();
    let op = relax(graph, &top, config, phase)?;
    debug!(
        phase = phase.unwrap_or(""),
        iterations = op.iterations,
        "phase solved"
    );
    let mut rows = assemble(graph, &top, &op, phase);
    aggregate(&mut rows, &top, phase);
    Ok(rows)
}

/// Solve the whole system.
///
/// Without declared phases this is a single phase-less table. With phases
/// declared it is every phase's table concatenated, closed by a
/// duration-weighted `System average` row tagged `All`.
pub fn solve(graph: &PowerGraph, config: &SolveConfig) -> SolverResult<Vec<ResultRow>> {
    let phases = graph.phases();
    if phases.is_empty() {
        return solve_phase(graph, config, None);
    }

    let mut rows = Vec::new();
    let mut weighted_power = 0.0;
    let mut weighted_loss = 0.0;
    let mut warned = false;
    let total_duration: Real = phases.values().sum();

    for (phase, duration) in phases {
        let table = solve_phase(graph, config, Some(phase))?;
        if let Some(total) = table.last() {
            weighted_power += total.power * duration;
            weighted_loss += total.loss * duration;
            warned |= !total.warnings.is_empty();
        }
        rows.extend(table);
    }

    let power = weighted_power / total_duration;
    let loss = weighted_loss / total_duration;
    rows.push(ResultRow {
        component: "System average".to_string(),
        kind: String::new(),
        parent: String::new(),
        domain: String::new(),
        phase: "All".to_string(),
        vi: 0.0,
        vo: 0.0,
        ii: 0.0,
        io: 0.0,
        power,
        loss,
        efficiency: if power > 0.0 {
            100.0 * (power - loss) / power
        } else {
            100.0
        },
        warnings: if warned { "Yes".to_string() } else { String::new() },
    });
    Ok(rows)
}
