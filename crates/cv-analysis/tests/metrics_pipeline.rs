//! Integration test: cycle metrics computed from a full simulation run.

use cv_analysis::compute_all_metrics;
use cv_model::{SimulationConfig, healthy_params};
use cv_sim::run_simulation;

#[test]
fn healthy_run_yields_physiological_metrics() {
    let params = healthy_params("healthy");
    let config = SimulationConfig {
        n_cycles: 4,
        points_per_cycle: 200,
        ..SimulationConfig::default()
    };
    let res = run_simulation(&params, &config, None).expect("simulation failed");
    let metrics =
        compute_all_metrics(&res.signals, &res.t, params.tcc, 0.01).expect("metrics failed");

    let sbp = metrics["p1_SBP"];
    let dbp = metrics["p1_DBP"];
    let map = metrics["p1_MAP"];
    assert!(sbp > dbp, "SBP {sbp} vs DBP {dbp}");
    assert!(dbp < map && map < sbp, "MAP {map} outside [{dbp}, {sbp}]");
    assert!((metrics["p1_PP"] - (sbp - dbp)).abs() < 1e-9);

    assert!(metrics["SV"] > 0.0, "SV = {}", metrics["SV"]);
    assert!(metrics["Vmin"] > 0.0);
    assert!(metrics["pLV_max"] > metrics["pLV_min"]);

    // both valves open once per cycle but never the whole cycle
    for valve in ["MV", "AV"] {
        let frac = metrics[&format!("{valve}_open_fraction")];
        assert!(frac > 0.0 && frac < 1.0, "{valve} open fraction = {frac}");
        assert!(metrics[&format!("{valve}_peak")] > 0.0);
    }

    let res = res.with_metrics(metrics);
    assert!(res.metrics.contains_key("p1_MAP"));
}
