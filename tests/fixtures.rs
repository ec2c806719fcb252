use approx::assert_relative_eq;
use divider_calc::*;

fn small_config(decades: std::ops::RangeInclusive<i32>) -> Config {
    Config {
        series: SeriesSpec::Values(vec![10.0, 22.0, 47.0]),
        decades,
        tolerance: 0.20,
        ucc: 12.0,
        max_power_loss_mw: 50.0,
        targets: [6.0, 4.0, 8.0, 12.0],
        objective: Objective::Squared,
        node: MeasuredNode::AcrossR0,
        wiring: Wiring::Straight,
    }
}

#[test]
fn two_decades_cannot_meet_power_limit() {
    // R0 would need at least 2K88 to stay under 50mW at 12V.
    let config = small_config(0..=1);
    assert_eq!(config.candidates().unwrap().len(), 17);
    assert!(config.run().unwrap().is_none());
}

#[test]
fn four_decades_across_r0_squared() {
    let config = small_config(0..=3);
    assert_eq!(config.candidates().unwrap().len(), 31);

    let best = config.run().unwrap().unwrap();
    assert_eq!(best.r0.label, "22K + 47K (series)");
    assert_eq!(best.r1.label, "10K + 22K (series)");
    assert_eq!(best.r2.label, "47K + 47K (series)");
    assert_eq!(best.values(), (69_000.0, 32_000.0, 94_000.0));
    assert_relative_eq!(best.score, 4.281058172208088, epsilon = 1e-9);
    assert_relative_eq!(best.voltages[0], 4.246153846153846, epsilon = 1e-9);
    assert_relative_eq!(best.voltages[1], 5.079754601226994, epsilon = 1e-9);
    assert_relative_eq!(best.voltages[2], 8.198019801980198, epsilon = 1e-9);
    assert_eq!(best.voltages[3], 12.0);
    assert_relative_eq!(best.power_loss.r0, 2.0869565217391304, epsilon = 1e-9);
    assert_relative_eq!(best.power_loss.r1, 0.4517204195667091, epsilon = 1e-9);
    assert_relative_eq!(best.power_loss.r2, 0.5094659189280741, epsilon = 1e-9);
}

#[test]
fn four_decades_across_r0_absolute() {
    let config = Config {
        objective: Objective::Absolute,
        ..small_config(0..=3)
    };
    let best = config.run().unwrap().unwrap();
    assert_eq!(best.values(), (47_000.0, 22_000.0, 94_000.0));
    assert_relative_eq!(best.score, 2.7137903440917586, epsilon = 1e-9);
}

#[test]
fn four_decades_across_switches() {
    let config = Config {
        node: MeasuredNode::AcrossSwitches,
        targets: [6.0, 4.0, 2.0, 0.0],
        ..small_config(0..=3)
    };
    let best = config.run().unwrap().unwrap();
    assert_eq!(best.values(), (94_000.0, 22_000.0, 57_000.0));
    assert_relative_eq!(best.score, 0.6274298404269996, epsilon = 1e-9);
    assert_eq!(best.voltages[3], 0.0);
    assert_eq!(best.deviations[3].relative, RelativeDeviation::Percent(0.0));

    let config = Config {
        objective: Objective::Absolute,
        ..config
    };
    let best = config.run().unwrap().unwrap();
    assert_eq!(best.r0.label, "22K");
    assert_eq!(best.r1.label, "4K7");
    assert_eq!(best.r2.label, "10K + 2K2 (series)");
    assert_relative_eq!(best.score, 1.179693695693266, epsilon = 1e-9);
}

#[test]
fn crossed_wiring_swaps_r1_and_r2() {
    let straight = small_config(0..=3);
    let crossed = Config {
        wiring: Wiring::Crossed,
        ..small_config(0..=3)
    };
    let a = straight.run().unwrap().unwrap();
    let b = crossed.run().unwrap().unwrap();
    assert_eq!(a.r0, b.r0);
    assert_eq!(a.r1, b.r2);
    assert_eq!(a.r2, b.r1);
}

#[test]
fn default_configuration() {
    let config = Config::default();
    let candidates = config.candidates().unwrap();
    assert_eq!(candidates.len(), 214);

    let optimizer = config.optimizer().unwrap();
    assert_eq!(optimizer.iterations(&candidates), 9_800_344);

    let best = optimizer.search(&candidates).unwrap();
    assert_eq!(best.r0.label, "560K + 820K (series)");
    assert_eq!(best.r1.label, "68K");
    assert_eq!(best.r2.label, "100K + 39K (series)");
    assert_relative_eq!(best.score, 0.02798554367113685, epsilon = 1e-9);
    assert_relative_eq!(best.voltages[0], 4.695652173913043, epsilon = 1e-9);
    assert_relative_eq!(best.voltages[1], 3.2942725477287738, epsilon = 1e-9);
    assert_relative_eq!(best.voltages[2], 1.6906077348066333, epsilon = 1e-9);
    assert!(best.power_loss.within(config.max_power_loss_mw));
    assert_relative_eq!(best.power_loss.r0, 0.9391304347826087, epsilon = 1e-9);

    assert_eq!(optimizer.sequential().search(&candidates).unwrap(), best);
}

#[test]
fn demo_config_loads() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/twelve_volt.yaml")).unwrap();
    assert_eq!(config.node, MeasuredNode::AcrossR0);
    assert_eq!(config.targets, [3.0, 6.0, 9.0, 12.0]);
    assert_eq!(config.candidates().unwrap().len(), 98);
}
