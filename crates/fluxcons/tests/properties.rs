//! Property tests on random networks.
//!
//! The reference is an independent per-variable oracle: `j` is consistent iff
//! `max v_j >= ε` or `min v_j <= −ε` over the model's feasible set.

use fluxcons::api::*;
use proptest::prelude::*;

const EPS: f64 = 1e-4;

fn params(metabolites: usize, reactions: usize) -> NetworkParams {
    NetworkParams {
        metabolites,
        reactions,
        exchange_prob: 0.4,
        reversible_prob: 0.3,
        reverse_only_prob: 0.15,
        cap: 10.0,
    }
}

fn cfg(method: Method) -> ConsistencyCfg {
    ConsistencyCfg {
        epsilon: EPS,
        method,
        witnesses: true,
        print_level: PrintLevel::Silent,
    }
}

fn oracle(model: &Model) -> Vec<usize> {
    let solver = MicroLp::default();
    let lp = build_lp(model, true);
    (0..model.n_vars())
        .filter(|&j| {
            [(Direction::Maximize, 1.0), (Direction::Minimize, -1.0)]
                .into_iter()
                .any(|(dir, sign)| {
                    let mut c = vec![0.0; model.n_vars()];
                    c[j] = 1.0;
                    let out = solver.solve(&lp.with_objective(c, dir), None);
                    out.x.is_some_and(|x| sign * x[j] >= EPS)
                })
        })
        .collect()
}

fn check_report(model: &Model, report: &ConsistencyReport) {
    let n = model.n_vars();
    let mut all: Vec<usize> = report
        .consistent
        .iter()
        .chain(&report.inconsistent)
        .copied()
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..n).collect::<Vec<_>>(), "partition");

    let original = build_lp(model, true);
    for &j in &report.consistent {
        let w = &report.witnesses[report.witness_of[j].expect("witness recorded")];
        assert!(w[j].abs() >= 0.99 * EPS, "witness too small for {j}");
        assert!(original.residual(w) < 1e-6, "witness residual");
        assert!(original.bound_violation(w) < 1e-6, "witness bounds");
    }
    for j in 0..n {
        if model.lb()[j] >= 0.0 {
            assert_eq!(report.orientation[j], 1, "forward-only var {j} flipped");
        }
    }
    for pair in report.trace.windows(2) {
        assert!(pair[1].consistent >= pair[0].consistent);
        assert!(pair[1].remaining <= pair[0].remaining);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn convex_run_matches_oracle(seed in any::<u64>(), m in 2usize..7, r in 2usize..10) {
        let model = random_network(&params(m, r), seed).unwrap();
        let report = find_consistent(&model, &cfg(Method::Convex), &MicroLp::default()).unwrap();
        check_report(&model, &report);
        prop_assert_eq!(report.consistent.clone(), oracle(&model));
    }

    #[test]
    fn consistent_submodel_is_fully_consistent(seed in any::<u64>(), m in 2usize..7, r in 2usize..10) {
        let model = random_network(&params(m, r), seed).unwrap();
        let report = find_consistent(&model, &cfg(Method::Convex), &MicroLp::default()).unwrap();
        let sub = model.submodel(&report.consistent).unwrap();
        let again = find_consistent(&sub, &cfg(Method::Convex), &MicroLp::default()).unwrap();
        prop_assert_eq!(again.consistent, (0..sub.n_vars()).collect::<Vec<_>>());
        prop_assert!(again.inconsistent.is_empty());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn nonconvex_run_agrees_with_convex(seed in any::<u64>(), m in 2usize..6, r in 2usize..8) {
        let model = random_network(&params(m, r), seed).unwrap();
        let convex = find_consistent(&model, &cfg(Method::Convex), &MicroLp::default()).unwrap();
        let nonconvex =
            find_consistent(&model, &cfg(Method::Nonconvex), &MicroLp::default()).unwrap();
        check_report(&model, &nonconvex);
        prop_assert_eq!(nonconvex.consistent, convex.consistent);
    }
}
