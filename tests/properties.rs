use divider_calc::*;
use proptest::prelude::*;

fn candidate_set(values: &[f64]) -> CandidateSet {
    let mut set = CandidateSet::new(0.001).unwrap();
    for &v in values {
        set.insert_if_unique(Candidate::single(v));
    }
    set
}

fn node() -> impl Strategy<Value = MeasuredNode> {
    prop_oneof![Just(MeasuredNode::AcrossR0), Just(MeasuredNode::AcrossSwitches)]
}

fn objective() -> impl Strategy<Value = Objective> {
    prop_oneof![Just(Objective::Squared), Just(Objective::Absolute)]
}

#[test]
fn candidate_count_never_grows_with_tolerance() {
    for series in [&*E6, &*E12].iter() {
        let counts: Vec<usize> = (1..=30)
            .map(|t| {
                CandidateSet::generate(series.values(), 0..=5, t as f64 / 100.0)
                    .unwrap()
                    .len()
            })
            .collect();
        assert!(
            counts.windows(2).all(|w| w[0] >= w[1]),
            "counts {:?}",
            counts
        );
    }
}

proptest! {
    #[test]
    fn generated_values_keep_their_distance(
        series in proptest::collection::vec(1.0f64..10.0, 1..6),
        tolerance in 0.01f64..0.5,
    ) {
        let set = CandidateSet::generate(&series, 0..=2, tolerance).unwrap();
        let values = set.values();
        for (i, a) in values.iter().enumerate() {
            for b in &values[i + 1..] {
                prop_assert!((a - b).abs() / a >= tolerance);
            }
        }
    }

    #[test]
    fn equal_button_resistors_give_equal_voltages(
        r0 in 1.0f64..1e6,
        r in 1.0f64..1e6,
        ucc in 0.5f64..48.0,
        node in node(),
    ) {
        let divider = Divider::new(ucc, node, Wiring::Straight).unwrap();
        let v = divider.voltages(r0, r, r);
        prop_assert_eq!(v[1], v[2]);
    }

    #[test]
    fn result_respects_power_limit(
        values in proptest::collection::vec(10.0f64..1e5, 1..8),
        limit in 1.0f64..500.0,
        node in node(),
    ) {
        let candidates = candidate_set(&values);
        let divider = Divider::new(12.0, node, Wiring::Straight).unwrap();
        let optimizer = Optimizer::new(divider, [6.0, 4.0, 2.0, 0.0], limit).unwrap();
        if let Some(best) = optimizer.search(&candidates) {
            prop_assert!(best.power_loss.within(limit));
        }
    }

    #[test]
    fn search_matches_exhaustive_loop(
        values in proptest::collection::vec(100.0f64..1e5, 1..6),
        targets in proptest::array::uniform4(0.0f64..5.0),
        node in node(),
        objective in objective(),
    ) {
        let candidates = candidate_set(&values);
        let values = candidates.values();
        let divider = Divider::new(5.0, node, Wiring::Straight).unwrap();
        let limit = 100.0;

        let mut expected: Option<((f64, f64, f64), f64)> = None;
        for &r0 in &values {
            for &r1 in &values {
                for &r2 in &values {
                    let (v, p) = divider.evaluate(r0, r1, r2);
                    let score = objective.score(&v, &targets);
                    if p.within(limit) && expected.map_or(true, |(_, s)| score < s) {
                        expected = Some(((r0, r1, r2), score));
                    }
                }
            }
        }

        let optimizer = Optimizer::new(divider, targets, limit).unwrap().objective(objective);
        let found = optimizer.search(&candidates);
        prop_assert_eq!(found.as_ref().map(|b| b.values()), expected.map(|(r, _)| r));
        prop_assert_eq!(optimizer.sequential().search(&candidates), found);
    }
}
