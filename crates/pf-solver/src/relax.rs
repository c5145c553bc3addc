//! Fixed-point relaxation over a topology snapshot.
//!
//! Voltages propagate from roots to leaves, currents back up, until both
//! working vectors settle within tolerance.

use nalgebra::DVector;
use pf_core::{all_close, Real, Tolerances};
use pf_graph::{PowerGraph, Topology};
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};

/// Relaxation parameters.
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    /// Relative tolerances on the voltage and current vectors
    pub tolerances: Tolerances,
    /// Iteration cap
    pub max_iter: usize,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            max_iter: 1000,
        }
    }
}

/// Converged operating point: output voltages and input currents per
/// topology position, plus the iteration count.
#[derive(Debug, Clone)]
pub struct OperatingPoint {
    pub voltages: DVector<Real>,
    pub currents: DVector<Real>,
    pub iterations: usize,
}

/// Run the relaxation for one phase (None = phase-less solve).
///
/// Fails with [`SolverError::ConvergenceFailed`] when the cap is hit;
/// no partial result escapes.
pub fn relax(
    graph: &PowerGraph,
    top: &Topology,
    config: &SolveConfig,
    phase: Option<&str>,
) -> SolverResult<OperatingPoint> {
    let n = top.len();
    let mut voltages = DVector::zeros(n);
    let mut currents = DVector::zeros(n);
    for pos in 0..n {
        if let Some(node) = graph.node(top.node_id(pos)) {
            voltages[pos] = node.component.initial_voltage(phase);
            currents[pos] = node.component.initial_current(phase);
        }
    }

    for iteration in 1..=config.max_iter {
        let new_v = forward_pass(graph, top, &voltages, &currents, phase);
        let new_i = backward_pass(graph, top, &new_v, &currents, phase);

        let settled = all_close(new_v.as_slice(), voltages.as_slice(), config.tolerances.voltage)
            && all_close(new_i.as_slice(), currents.as_slice(), config.tolerances.current);
        voltages = new_v;
        currents = new_i;

        if settled {
            debug!(iteration, "relaxation settled");
            return Ok(OperatingPoint {
                voltages,
                currents,
                iterations: iteration,
            });
        }
    }

    warn!(max_iter = config.max_iter, "relaxation hit iteration cap");
    Err(SolverError::ConvergenceFailed {
        iterations: config.max_iter,
    })
}

/// Propagate output voltages from roots to leaves.
///
/// Parents come first in topology order, so `new_v[parent]` is already the
/// updated estimate when a child is visited.
fn forward_pass(
    graph: &PowerGraph,
    top: &Topology,
    voltages: &DVector<Real>,
    currents: &DVector<Real>,
    phase: Option<&str>,
) -> DVector<Real> {
    let mut new_v = voltages.clone();
    for pos in 0..top.len() {
        let Some(node) = graph.node(top.node_id(pos)) else {
            continue;
        };
        let io: Real = top.children(pos).iter().map(|&c| currents[c]).sum();
        let (vi, ii) = match top.parent(pos) {
            Some(parent) => (new_v[parent], currents[pos]),
            None => (0.0, 0.0),
        };
        new_v[pos] = node.component.output_voltage(vi, ii, io, phase);
    }
    new_v
}

/// Propagate input currents from leaves back to roots.
///
/// Uses the just-updated voltages and the previous iteration's currents
/// for the children sums.
fn backward_pass(
    graph: &PowerGraph,
    top: &Topology,
    voltages: &DVector<Real>,
    currents: &DVector<Real>,
    phase: Option<&str>,
) -> DVector<Real> {
    let mut new_i = currents.clone();
    for pos in (0..top.len()).rev() {
        let Some(node) = graph.node(top.node_id(pos)) else {
            continue;
        };
        let io: Real = top.children(pos).iter().map(|&c| currents[c]).sum();
        // roots see their own rail voltage on the input side
        let vi = match top.parent(pos) {
            Some(parent) => voltages[parent],
            None => voltages[pos],
        };
        new_i[pos] = node.component.input_current(vi, voltages[pos], io, phase);
    }
    new_i
}
