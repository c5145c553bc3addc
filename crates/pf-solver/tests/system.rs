//! End-to-end solver tests on reference systems.

use std::collections::BTreeMap;

use pf_components::{
    Converter, CurrentLoad, LinReg, Limits, Loss, PowerLoad, ResistiveLoad, Source,
};
use pf_graph::PowerGraph;
use pf_solver::{solve, solve_phase, ResultRow, SolveConfig, SolverError};

/// Battery-fed tree exercising every component kind.
fn mixed_tree() -> PowerGraph {
    let mut graph = PowerGraph::new("mixed", Source::new("3V coin", 3.0, 13e-3));
    graph
        .add_comp(
            "3V coin",
            Converter::new("1.8V buck", 1.8, 0.87).unwrap().with_iq(12e-6),
        )
        .unwrap();
    graph
        .add_comp("1.8V buck", PowerLoad::new("MCU", 27e-3))
        .unwrap();
    graph
        .add_comp(
            "3V coin",
            Converter::new("5V boost", 5.0, 0.91).unwrap().with_iq(42e-6),
        )
        .unwrap();
    graph
        .add_comp("5V boost", CurrentLoad::new("Sensor", 15e-3))
        .unwrap();
    graph
        .add_comp("5V boost", Loss::new("RC filter", 33.0, 0.0))
        .unwrap();
    graph
        .add_comp(
            "RC filter",
            LinReg::new("LDO 2.5V", 2.5, 0.27).unwrap().with_iq(150e-6),
        )
        .unwrap();
    graph
        .add_comp("LDO 2.5V", PowerLoad::new("ADC", 15e-3))
        .unwrap();
    graph
        .add_comp("5V boost", ResistiveLoad::new("Res divider", 200e3).unwrap())
        .unwrap();
    graph
}

fn row<'a>(rows: &'a [ResultRow], component: &str) -> &'a ResultRow {
    rows.iter()
        .find(|r| r.component == component)
        .unwrap_or_else(|| panic!("no row for {component}"))
}

#[test]
fn mixed_tree_reference_numbers() {
    let rows = solve(&mixed_tree(), &SolveConfig::default()).unwrap();
    assert_eq!(rows.len(), 10);

    let total = row(&rows, "System total");
    assert!((total.power - 0.147574).abs() < 1e-5);
    assert!((total.loss - 0.030449).abs() < 1e-5);
    assert!((total.efficiency - 79.3669).abs() < 1e-3);
    assert_eq!(total.warnings, "");

    // source droops under ~49mA of load
    let src = row(&rows, "3V coin");
    assert!((src.vi - 3.0).abs() < 1e-6);
    assert!(src.vo < 3.0);
    assert!((src.ii - src.io).abs() < 1e-12);

    // regulated rails hold their set points
    assert!((row(&rows, "1.8V buck").vo - 1.8).abs() < 1e-9);
    assert!((row(&rows, "5V boost").vo - 5.0).abs() < 1e-9);
    assert!((row(&rows, "LDO 2.5V").vo - 2.5).abs() < 1e-9);

    // series loss drops the LDO input below the rail
    let rc = row(&rows, "RC filter");
    assert!(rc.vo < rc.vi);
    assert!((rc.vo - (5.0 - 33.0 * rc.io)).abs() < 1e-6);
    assert!((rc.power - rc.vi * rc.ii).abs() < 1e-9);

    // loads draw what their parameters say
    assert!((row(&rows, "MCU").ii - 0.015).abs() < 1e-6);
    assert!((row(&rows, "Sensor").ii - 0.015).abs() < 1e-12);
    assert!((row(&rows, "Res divider").ii - 25e-6).abs() < 1e-9);

    // leaves have no output side
    assert_eq!(row(&rows, "ADC").io, 0.0);
    assert_eq!(row(&rows, "ADC").vo, 0.0);
}

#[test]
fn iteration_cap_is_an_error() {
    let config = SolveConfig {
        max_iter: 1,
        ..SolveConfig::default()
    };
    assert_eq!(
        solve(&mixed_tree(), &config).unwrap_err(),
        SolverError::ConvergenceFailed { iterations: 1 }
    );
}

#[test]
fn source_only_system() {
    let graph = PowerGraph::new("bare", Source::new("12V input", 12.0, 0.0));
    let rows = solve(&graph, &SolveConfig::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].component, "12V input");
    assert_eq!(rows[1].component, "System total");
    assert_eq!(rows[1].efficiency, 100.0);
    assert_eq!(rows[1].power, 0.0);
}

#[test]
fn zero_volt_source_converges() {
    let mut graph = PowerGraph::new("dead", Source::new("0V", 0.0, 0.0));
    graph.add_comp("0V", PowerLoad::new("MCU", 0.2)).unwrap();
    graph.add_comp("0V", CurrentLoad::new("Test", 0.1)).unwrap();

    let rows = solve(&graph, &SolveConfig::default()).unwrap();
    assert_eq!(rows.len(), 4);
    for r in &rows {
        assert!(r.ii.is_finite());
        assert_eq!(r.ii, 0.0);
    }
}

#[test]
fn multi_source_subsystems_and_warnings() {
    let mut graph = PowerGraph::new("multi", Source::new("3.3V", 3.3, 0.0));
    graph
        .add_source(Source::new("12V", 12.0, 0.0).with_limits(Limits {
            ii: [0.0, 1e-3],
            ..Limits::default()
        }))
        .unwrap();
    graph.add_comp("3.3V", PowerLoad::new("MCU", 0.2)).unwrap();
    graph.add_comp("12V", PowerLoad::new("Test", 1.5)).unwrap();
    graph.add_source(Source::new("3.3V aux", 3.3, 0.0)).unwrap();

    let rows = solve(&graph, &SolveConfig::default()).unwrap();
    // 5 components, 3 subsystems, 1 total
    assert_eq!(rows.len(), 9);

    // the 12V source trips its 1mA input-current limit
    assert_eq!(row(&rows, "Subsystem 12V").warnings, "Yes");
    assert_eq!(row(&rows, "Subsystem 3.3V").warnings, "");
    assert_eq!(row(&rows, "Subsystem 3.3V aux").warnings, "");
    assert_eq!(row(&rows, "System total").warnings, "Yes");

    // subsystem power is that source's input power
    assert!((row(&rows, "Subsystem 12V").power - 1.5).abs() < 1e-9);
    assert!((row(&rows, "Subsystem 3.3V").power - 0.2).abs() < 1e-9);
    assert_eq!(row(&rows, "Subsystem 3.3V aux").power, 0.0);
    assert!((row(&rows, "System total").power - 1.7).abs() < 1e-9);

    // dropping to one source removes the subsystem rows
    graph.del_comp("12V", false).unwrap();
    graph.del_comp("3.3V aux", false).unwrap();
    let rows = solve(&graph, &SolveConfig::default()).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| !r.component.starts_with("Subsystem")));
}

fn phased_system() -> PowerGraph {
    let mut graph = PowerGraph::new("phased", Source::new("5V", 5.0, 0.0));
    graph
        .add_comp(
            "5V",
            Converter::new("Buck 3.3", 3.3, 0.88)
                .unwrap()
                .with_active_phases(["active"]),
        )
        .unwrap();
    graph
        .add_comp("5V", LinReg::new("LDO 1.8", 1.5, 0.0).unwrap())
        .unwrap();
    let mut pl = pf_components::PhaseLoads::new();
    pl.insert("sleep".into(), 1e-6);
    pl.insert("active".into(), 0.2);
    graph
        .add_comp("Buck 3.3", PowerLoad::new("MCU", 0.2).with_phase_loads(pl))
        .unwrap();
    graph
        .add_comp("LDO 1.8", CurrentLoad::new("Sensor", 1.7e-3))
        .unwrap();
    let mut pl = pf_components::PhaseLoads::new();
    pl.insert("sleep".into(), 2.7e-3);
    graph
        .add_comp(
            "LDO 1.8",
            CurrentLoad::new("Sensor2", 2.7e-3).with_phase_loads(pl),
        )
        .unwrap();
    graph
        .add_comp("LDO 1.8", PowerLoad::new("Sensor3", 1.7e-3))
        .unwrap();
    graph
        .add_comp("LDO 1.8", ResistiveLoad::new("Sensor4", 25e3).unwrap())
        .unwrap();
    let mut pl = pf_components::PhaseLoads::new();
    pl.insert("active".into(), 45e3);
    graph
        .add_comp(
            "LDO 1.8",
            ResistiveLoad::new("Sensor5", 100e3).unwrap().with_phase_loads(pl),
        )
        .unwrap();

    let mut phases = BTreeMap::new();
    phases.insert("sleep".to_string(), 3600.0);
    phases.insert("active".to_string(), 127.0);
    graph.set_phases(phases).unwrap();
    graph
}

#[test]
fn phase_solve_tables() {
    let graph = phased_system();

    assert_eq!(
        solve_phase(&graph, &SolveConfig::default(), Some("unknown")).unwrap_err(),
        SolverError::UnknownPhase("unknown".into())
    );

    // one phase: 9 component rows + total
    let rows = solve_phase(&graph, &SolveConfig::default(), Some("sleep")).unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.phase == "sleep"));

    // buck is powered down outside its active phase
    let buck = row(&rows, "Buck 3.3");
    assert_eq!(buck.vo, 0.0);
    assert_eq!(buck.ii, 0.0);
    assert_eq!(row(&rows, "MCU").ii, 0.0);

    // phase overrides and fallbacks on the LDO rail
    assert!((row(&rows, "Sensor").ii - 1.7e-3).abs() < 1e-12);
    assert!((row(&rows, "Sensor2").ii - 2.7e-3).abs() < 1e-12);
    let ldo_vo = row(&rows, "LDO 1.8").vo;
    assert!((row(&rows, "Sensor4").ii - ldo_vo / 25e3).abs() < 1e-9);
    // Sensor5 falls back to its base resistance in an unlisted phase
    assert!((row(&rows, "Sensor5").ii - ldo_vo / 100e3).abs() < 1e-9);

    // all phases: two tables plus the weighted average row
    let rows = solve(&graph, &SolveConfig::default()).unwrap();
    assert_eq!(rows.len(), 21);
    let avg = rows.last().unwrap();
    assert_eq!(avg.component, "System average");
    assert_eq!(avg.phase, "All");

    // average power sits between the sleep and active totals
    let totals: Vec<&ResultRow> = rows
        .iter()
        .filter(|r| r.component == "System total")
        .collect();
    assert_eq!(totals.len(), 2);
    let (lo, hi) = (
        totals.iter().map(|r| r.power).fold(f64::INFINITY, f64::min),
        totals.iter().map(|r| r.power).fold(0.0, f64::max),
    );
    assert!(avg.power >= lo && avg.power <= hi);
    // sleep dominates the duration weighting
    assert!(avg.power < (lo + hi) / 2.0);
}

#[test]
fn active_phase_uses_buck_rail() {
    let graph = phased_system();
    let rows = solve_phase(&graph, &SolveConfig::default(), Some("active")).unwrap();
    let buck = row(&rows, "Buck 3.3");
    assert!((buck.vo - 3.3).abs() < 1e-9);
    // MCU draws its active power from the 3.3V rail
    assert!((row(&rows, "MCU").ii - 0.2 / 3.3).abs() < 1e-6);
    // Sensor5 uses its active override
    let ldo_vo = row(&rows, "LDO 1.8").vo;
    assert!((row(&rows, "Sensor5").ii - ldo_vo / 45e3).abs() < 1e-9);
}

#[test]
fn serialized_rows_keep_field_names() {
    let rows = solve(&mixed_tree(), &SolveConfig::default()).unwrap();
    let json = serde_json::to_string(&rows[0]).unwrap();
    assert!(json.contains("\"component\""));
    assert!(json.contains("\"efficiency\""));
}
