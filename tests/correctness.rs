//! Correctness and invariant tests for accumstats
//!
//! These tests verify the attach algorithm's invariants, the freshness
//! contract of derived statistics, and the numeric properties of the
//! bundled algorithms against exact reference computations. They
//! complement the unit tests in each module by focusing on properties
//! that must always hold.
//!
//! Run with: cargo test --test correctness

// Require the bundled statistics
#[cfg(not(feature = "statistics"))]
compile_error!(
    "Correctness tests require the statistics family. Run: cargo test --test correctness --features statistics"
);

use std::cell::RefCell;
use std::rc::Rc;

use accumstats::prelude::*;
use accumstats::statistics::descriptive;
use accumstats::traits::SharedAccumulator;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn feed(set: &mut AccumulatorSet, data: &[f64]) {
    for &datum in data {
        set.add(datum);
    }
}

fn float(set: &AccumulatorSet, identifier: &str) -> f64 {
    set.get(identifier)
        .unwrap()
        .as_f64()
        .unwrap_or_else(|| panic!("{} has no numeric value", identifier))
}

fn exact_mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn exact_variance(data: &[f64]) -> f64 {
    let mean = exact_mean(data);
    data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (data.len() - 1) as f64
}

fn random_stream(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-100.0..100.0)).collect()
}

// ============================================================================
// Descriptive statistics
// ============================================================================

mod descriptive_stats {
    use super::*;

    #[test]
    fn concrete_unweighted_scenario() {
        let mut stats = AccumulatorSet::new(descriptive()).unwrap();
        feed(&mut stats, &[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(stats.get("count").unwrap(), Value::Int(5));
        assert_eq!(stats.get("sum").unwrap(), Value::Float(15.0));
        assert_eq!(stats.get("min").unwrap(), Value::Float(1.0));
        assert_eq!(stats.get("max").unwrap(), Value::Float(5.0));
        assert_eq!(stats.get("range").unwrap(), Value::Float(4.0));
        assert_eq!(stats.get("mean").unwrap(), Value::Float(3.0));
        assert_eq!(stats.get("variance").unwrap(), Value::Float(2.5));
        assert!((float(&stats, "standard_deviation") - 1.5811).abs() < 1e-4);
    }

    #[test]
    fn concrete_weighted_scenario() {
        let mut stats = AccumulatorSet::new(descriptive()).unwrap();
        stats.add_weighted(10.0, 1.0);
        stats.add_weighted(20.0, 3.0);

        assert_eq!(stats.get("weight").unwrap(), Value::Float(4.0));
        assert_eq!(stats.get("weighted_sum").unwrap(), Value::Float(70.0));
        assert_eq!(stats.get("weighted_mean").unwrap(), Value::Float(17.5));
    }

    #[test]
    fn random_stream_matches_exact_references() {
        let data = random_stream(42, 1000);
        let mut stats = AccumulatorSet::new(descriptive()).unwrap();
        feed(&mut stats, &data);

        let exact_min = data.iter().cloned().fold(f64::INFINITY, f64::min);
        let exact_max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(stats.get("count").unwrap(), Value::Int(1000));
        assert_eq!(stats.get("min").unwrap(), Value::Float(exact_min));
        assert_eq!(stats.get("max").unwrap(), Value::Float(exact_max));
        assert_eq!(stats.get("range").unwrap(), Value::Float(exact_max - exact_min));

        let sum: f64 = data.iter().sum();
        assert!((float(&stats, "sum") - sum).abs() < 1e-8);
        assert!((float(&stats, "mean") - exact_mean(&data)).abs() < 1e-9);

        let exact_var = exact_variance(&data);
        assert!(
            (float(&stats, "variance") - exact_var).abs() / exact_var < 1e-9,
            "welford variance {} vs two-pass {}",
            float(&stats, "variance"),
            exact_var
        );
    }

    #[test]
    fn standard_deviation_is_sqrt_of_variance() {
        let data = random_stream(7, 500);
        let mut stats = AccumulatorSet::new(descriptive()).unwrap();
        feed(&mut stats, &data);

        assert_eq!(float(&stats, "standard_deviation"), float(&stats, "variance").sqrt());
        assert_eq!(
            float(&stats, "weighted_standard_deviation"),
            float(&stats, "weighted_variance").sqrt()
        );
    }

    #[test]
    fn weighted_stats_reduce_to_unweighted_at_weight_one() {
        let data = random_stream(99, 400);
        let mut stats = AccumulatorSet::new(descriptive()).unwrap();
        for &datum in &data {
            stats.add_weighted(datum, 1.0);
        }

        assert!((float(&stats, "weighted_mean") - float(&stats, "mean")).abs() < 1e-9);
        assert!(
            (float(&stats, "weighted_variance") - float(&stats, "variance")).abs()
                / float(&stats, "variance")
                < 1e-9
        );
        assert_eq!(float(&stats, "weight"), 400.0);
    }

    #[test]
    fn empty_stream_yields_sentinels_not_errors() {
        let stats = AccumulatorSet::new(descriptive()).unwrap();

        assert_eq!(stats.get("count").unwrap(), Value::Int(0));
        assert_eq!(stats.get("sum").unwrap(), Value::Float(0.0));
        assert_eq!(stats.get("mean").unwrap(), Value::Empty);
        assert_eq!(stats.get("range").unwrap(), Value::Empty);
        assert_eq!(stats.get("variance").unwrap(), Value::Empty);
        assert_eq!(stats.get("standard_deviation").unwrap(), Value::Empty);
        assert_eq!(stats.get("weighted_mean").unwrap(), Value::Empty);
    }

    #[test]
    fn single_observation_has_no_variance() {
        let mut stats = AccumulatorSet::new(descriptive()).unwrap();
        stats.add(42.0);

        assert_eq!(stats.get("mean").unwrap(), Value::Float(42.0));
        assert_eq!(stats.get("variance").unwrap(), Value::Empty);
        assert_eq!(stats.get("standard_deviation").unwrap(), Value::Empty);
    }
}

// ============================================================================
// Attach algorithm invariants
// ============================================================================

mod attach {
    use super::*;

    #[test]
    fn shared_primitives_are_attached_once() {
        // mean and variance both ride on count; weighted mean and
        // weighted sum both ride on weight
        let mut stats = AccumulatorSet::new([
            Spec::of::<Mean>(),
            Spec::of::<Variance>(),
            Spec::of::<WeightedMean>(),
        ])
        .unwrap();

        let names: Vec<&str> = stats.names().collect();
        assert_eq!(
            names,
            ["mean", "variance", "weighted_mean", "sum", "count", "weighted_sum", "weight"]
        );

        feed(&mut stats, &[1.0, 2.0, 3.0]);
        assert_eq!(stats.get("count").unwrap(), Value::Int(3));
    }

    #[test]
    fn attach_is_idempotent() {
        let mut stats = AccumulatorSet::new([Spec::of::<Mean>()]).unwrap();
        let before: Vec<String> = stats.names().map(str::to_string).collect();

        let attached = stats.attach([Spec::of::<Mean>(), Spec::of::<Sum>()]).unwrap();
        assert!(attached.is_empty());

        let after: Vec<String> = stats.names().map(str::to_string).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn attach_order_does_not_change_values() {
        let data = random_stream(3, 250);

        let mut forward = AccumulatorSet::new(descriptive()).unwrap();
        let mut reversed = {
            let mut specs = descriptive();
            specs.reverse();
            AccumulatorSet::new(specs).unwrap()
        };

        feed(&mut forward, &data);
        feed(&mut reversed, &data);

        for identifier in
            ["min", "max", "range", "count", "sum", "mean", "variance", "standard_deviation"]
        {
            assert_eq!(
                forward.get(identifier).unwrap(),
                reversed.get(identifier).unwrap(),
                "{} differs between attach orders",
                identifier
            );
        }
    }

    #[test]
    fn dependencies_resolve_regardless_of_registration_order() {
        // the dependent first, its dependencies auto-attached
        let mut first = AccumulatorSet::new([Spec::of::<StandardDeviation>()]).unwrap();
        // the dependencies first, the dependent deduped onto them
        let mut second =
            AccumulatorSet::new([Spec::of::<Variance>(), Spec::of::<StandardDeviation>()])
                .unwrap();

        let data = random_stream(11, 100);
        feed(&mut first, &data);
        feed(&mut second, &data);

        assert_eq!(
            first.get("standard_deviation").unwrap(),
            second.get("standard_deviation").unwrap()
        );
    }

    #[test]
    fn duplicate_identifier_is_detected_before_observation() {
        // a nested set named "std" collides with StandardDeviation's alias
        let collider = AccumulatorSet::named("std", [Spec::of::<Count>()]).unwrap();
        let err =
            AccumulatorSet::new([Spec::instance(collider), Spec::of::<StandardDeviation>()])
                .unwrap_err();

        assert_eq!(err, AttachError::DuplicateIdentifier { identifier: "std".into() });
    }

    #[test]
    fn relinking_a_shared_instance_is_detected() {
        let shared: SharedAccumulator = Rc::new(RefCell::new(Count::new()));

        let _owner = AccumulatorSet::new([Spec::shared(Rc::clone(&shared))]).unwrap();
        let err = AccumulatorSet::new([Spec::shared(shared)]).unwrap_err();

        assert_eq!(err, AttachError::AlreadyLinked { name: "count".into() });
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let stats = AccumulatorSet::new(descriptive()).unwrap();
        assert_eq!(
            stats.get("median").unwrap_err(),
            QueryError::UnknownIdentifier { identifier: "median".into() }
        );
    }
}

// ============================================================================
// Freshness of derived values
// ============================================================================

mod freshness {
    use super::*;

    #[test]
    fn derived_values_track_observations_between_reads() {
        let mut stats = AccumulatorSet::new([Spec::of::<Mean>()]).unwrap();

        stats.add(1.0);
        assert_eq!(stats.get("mean").unwrap(), Value::Float(1.0));

        stats.add(3.0);
        assert_eq!(stats.get("mean").unwrap(), Value::Float(2.0));

        // repeated reads see no drift
        assert_eq!(stats.get("mean").unwrap(), Value::Float(2.0));
    }

    #[test]
    fn snapshot_maps_every_primary_name_in_member_order() {
        let mut stats = AccumulatorSet::new([Spec::of::<Mean>()]).unwrap();
        feed(&mut stats, &[2.0, 4.0]);

        let snapshot = stats.snapshot().unwrap();
        let names: Vec<&str> = snapshot.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["mean", "sum", "count"]);

        assert_eq!(snapshot[0].1, Value::Float(3.0));
        assert_eq!(snapshot[1].1, Value::Float(6.0));
        assert_eq!(snapshot[2].1, Value::Int(2));
    }
}

// ============================================================================
// Nested composition
// ============================================================================

mod nesting {
    use super::*;

    #[test]
    fn observing_the_parent_updates_the_child() {
        let child = AccumulatorSet::named("inner", [Spec::of::<Mean>()]).unwrap();
        let mut parent =
            AccumulatorSet::new([Spec::instance(child), Spec::of::<Count>()]).unwrap();

        feed(&mut parent, &[1.0, 5.0]);

        assert_eq!(parent.get("count").unwrap(), Value::Int(2));
        let inner = parent.get("inner").unwrap();
        match inner {
            Value::Group(values) => {
                assert_eq!(values[0], ("mean".to_string(), Value::Float(3.0)));
            }
            other => panic!("expected group snapshot, got {:?}", other),
        }
    }
}

// ============================================================================
// Weighted variance corrections
// ============================================================================

mod corrections {
    use super::*;
    use accumstats::statistics::WeightedVariance;

    #[test]
    fn frequency_weights_replicate_observations() {
        // integer frequency weights must agree with literally repeating data
        let mut weighted = AccumulatorSet::new([Spec::of::<WeightedVariance>()]).unwrap();
        weighted.add_weighted(4.0, 2.0);
        weighted.add_weighted(7.0, 1.0);
        weighted.add_weighted(13.0, 3.0);

        let mut repeated = AccumulatorSet::new([Spec::of::<Variance>()]).unwrap();
        feed(&mut repeated, &[4.0, 4.0, 7.0, 13.0, 13.0, 13.0]);

        let weighted_var = float(&weighted, "weighted_variance");
        let repeated_var = float(&repeated, "variance");
        assert!(
            (weighted_var - repeated_var).abs() < 1e-9,
            "weighted {} vs repeated {}",
            weighted_var,
            repeated_var
        );
    }

    #[test]
    fn population_correction_divides_by_total_weight() {
        let mut stats = AccumulatorSet::new([Spec::factory(|| {
            WeightedVariance::with_correction(Correction::Population)
        })])
        .unwrap();

        // two points, equal weights: population variance of [1, 3] is 1
        stats.add_weighted(1.0, 1.0);
        stats.add_weighted(3.0, 1.0);

        assert_eq!(stats.get("weighted_variance").unwrap(), Value::Float(1.0));
    }
}
