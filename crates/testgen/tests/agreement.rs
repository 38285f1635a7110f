//! Cross-checks every search strategy against the exhaustive one on
//! randomized histories, plus the level-hierarchy monotonicity property.
//!
//! The bounded strategies are complete once their depth covers the whole
//! graph (an elementary cycle never has more edges than vertices), so at
//! that depth their verdicts must match the exhaustive ground truth
//! exactly. At the default depth they may miss long cycles but must
//! never report a violation the exhaustive strategy does not confirm.

use isocheck_core::construct::list_append;
use isocheck_core::{check_graph, IsolationLevel, Strategy};
use isocheck_testgen::generator::{generate_history, HistParams};

const LEVELS: [IsolationLevel; 5] = [
    IsolationLevel::Pl1,
    IsolationLevel::Pl2,
    IsolationLevel::ParallelSnapshotIsolation,
    IsolationLevel::SnapshotIsolation,
    IsolationLevel::Serializable,
];

fn params(seed: u64) -> HistParams {
    HistParams::builder()
        .id(seed)
        .n_txn(7)
        .n_key(2)
        .n_evt(4)
        .seed(seed)
        .build()
}

#[test]
fn full_depth_strategies_match_exhaustive() {
    for seed in 0..25 {
        let history = generate_history(&params(seed)).into_data();
        let constructed = list_append::build(history).expect("generated history is valid input");
        let full_depth = constructed.txns.vertex_count();

        for level in LEVELS {
            let exhaustive = check_graph(&constructed.txns, level, Strategy::Exhaustive);
            if let Some(witness) = &exhaustive.witness {
                assert!(level.is_violation(witness));
            }

            for strategy in [
                Strategy::Bounded {
                    max_depth: full_depth,
                },
                Strategy::BoundedRandom {
                    max_depth: full_depth,
                    seed: seed ^ 0xBEEF,
                },
                Strategy::ShortestPath,
            ] {
                let outcome = check_graph(&constructed.txns, level, strategy);
                assert_eq!(
                    outcome.is_valid, exhaustive.is_valid,
                    "{level} verdict of {strategy:?} diverges from exhaustive (seed {seed})",
                );
            }
        }
    }
}

#[test]
fn default_depth_never_reports_false_violations() {
    for seed in 0..25 {
        let history = generate_history(&params(seed)).into_data();
        let constructed = list_append::build(history).expect("generated history is valid input");

        for level in LEVELS {
            let exhaustive = check_graph(&constructed.txns, level, Strategy::Exhaustive);
            let bounded = check_graph(&constructed.txns, level, Strategy::default());

            if let Some(witness) = &bounded.witness {
                // anything the bounded search flags must be a real violation
                assert!(level.is_violation(witness));
                assert!(
                    !exhaustive.is_valid,
                    "bounded found a {level} violation exhaustive denies (seed {seed})",
                );
            }
            if let Some(witness) = &exhaustive.witness {
                // within its depth, the bounded search must see it too
                if witness.len() <= isocheck_core::isolation::DEFAULT_MAX_DEPTH {
                    assert!(
                        !bounded.is_valid,
                        "bounded missed a {}-edge {level} cycle (seed {seed})",
                        witness.len(),
                    );
                }
            }
        }
    }
}

#[test]
fn hierarchy_is_monotone() {
    for seed in 0..25 {
        let history = generate_history(&params(seed)).into_data();
        let constructed = list_append::build(history).expect("generated history is valid input");

        let verdicts: Vec<bool> = LEVELS
            .iter()
            .map(|&level| check_graph(&constructed.txns, level, Strategy::Exhaustive).is_valid)
            .collect();

        // LEVELS runs weakest to strongest; validity may only degrade
        for window in verdicts.windows(2) {
            assert!(
                window[0] || !window[1],
                "a stronger level passed where a weaker one failed (seed {seed})",
            );
        }
    }
}
