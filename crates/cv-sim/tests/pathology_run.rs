//! Integration test: pathology transforms and warm-started scenario pairs.

use cv_model::{
    SimulationConfig, combined_stiffness_and_afterload, healthy_params, increased_afterload,
};
use cv_sim::{run_scenario_pair, run_simulation};

fn short_config() -> SimulationConfig {
    SimulationConfig {
        n_cycles: 2,
        points_per_cycle: 200,
        rtol: 1e-6,
        atol: 1e-8,
        ..SimulationConfig::default()
    }
}

#[test]
fn stiffened_pathology_simulation_is_finite() {
    let healthy = healthy_params("healthy");
    let path = combined_stiffness_and_afterload(&healthy, 0.5, 1.5, true, "arterial stiffening")
        .expect("transform failed");

    let res = run_simulation(&path, &short_config(), None).expect("simulation failed");
    for row in &res.x {
        assert!(row.iter().all(|v| v.is_finite()));
    }
    assert!(res.signals["p1"].iter().all(|v| v.is_finite()));
    assert!(res.signals["Vlv"].iter().all(|v| v.is_finite()));
    assert_eq!(res.params.label, "arterial stiffening");
}

#[test]
fn scenario_pair_returns_healthy_then_pathological() {
    let healthy = healthy_params("healthy");
    let path = increased_afterload(&healthy, 1.5, true, "afterload").expect("transform failed");

    let (res_h, res_p) =
        run_scenario_pair(&healthy, &path, &short_config(), None).expect("pair failed");

    assert_eq!(res_h.params.label, "healthy");
    assert_eq!(res_p.params.label, "afterload");

    // pathological run warm-starts from the healthy final state
    assert_eq!(res_p.x[0], res_h.final_state().unwrap());
}

#[test]
fn explicit_initial_state_disables_warm_start() {
    let healthy = healthy_params("healthy");
    let path = increased_afterload(&healthy, 1.5, true, "afterload").expect("transform failed");
    let x0 = [8.0, 0.0, 80.0];

    let (res_h, res_p) =
        run_scenario_pair(&healthy, &path, &short_config(), Some(x0)).expect("pair failed");

    assert_eq!(res_h.x[0], x0);
    assert_eq!(res_p.x[0], x0);
}

#[test]
fn afterload_raises_mean_arterial_pressure() {
    let healthy = healthy_params("healthy");
    let path = increased_afterload(&healthy, 1.5, true, "afterload").expect("transform failed");

    let config = SimulationConfig {
        n_cycles: 6,
        points_per_cycle: 200,
        ..SimulationConfig::default()
    };
    let (res_h, res_p) = run_scenario_pair(&healthy, &path, &config, None).expect("pair failed");

    // compare mean p1 over the final cycle
    let mean_last_cycle = |p1: &[f64]| {
        let n = 200;
        let tail = &p1[p1.len() - n..];
        tail.iter().sum::<f64>() / n as f64
    };
    let map_h = mean_last_cycle(&res_h.signals["p1"]);
    let map_p = mean_last_cycle(&res_p.signals["p1"]);
    assert!(
        map_p > map_h,
        "afterload should raise mean arterial pressure: {map_p} vs {map_h}"
    );
}
