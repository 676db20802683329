#![cfg(feature = "stream")]
//! Property-based tests for pipeline laws.
//!
//! ## Laws
//! - **Map Fusion**: `pipe(xs, [map(f), map(g)]) == pipe(xs, [map(g . f)])`
//! - **Filter Agreement**: a filter stage keeps exactly what `Iterator::filter` keeps
//! - **Order Preservation**: map and filter never reorder items
//! - **Reduce Agreement**: a reduce stage with initializer equals a left fold
//! - **Zip Truncation**: zip output length is the shortest operand length

use callkit::stream::{Operator, Stage, StageConfig, as_func, collect, pipe};
use callkit::{Func, Value};
use proptest::prelude::*;

fn map(name: &str, body: fn(i64) -> i64) -> Stage {
    as_func(
        Operator::Map,
        StageConfig::new().func(Func::unary(name, move |x| Ok(Value::from(body(x.try_int()?))))),
    )
    .unwrap()
}

fn values(numbers: &[i64]) -> Vec<Value> {
    numbers.iter().copied().map(Value::from).collect()
}

fn increment(n: i64) -> i64 {
    n.wrapping_add(1)
}

fn triple(n: i64) -> i64 {
    n.wrapping_mul(3)
}

// =============================================================================
// Map and Filter
// =============================================================================

proptest! {
    #[test]
    fn prop_map_fusion(numbers in prop::collection::vec(any::<i64>(), 0..32)) {
        let separate = collect(
            pipe(values(&numbers), &[map("increment", increment), map("triple", triple)]).unwrap(),
        )
        .unwrap();
        let fused = collect(
            pipe(values(&numbers), &[map("fused", |n| triple(increment(n)))]).unwrap(),
        )
        .unwrap();

        prop_assert_eq!(separate, fused);
    }

    #[test]
    fn prop_filter_agrees_with_iterator(numbers in prop::collection::vec(any::<i64>(), 0..32), modulus in 1_i64..5) {
        let stage = as_func(
            Operator::Filter,
            StageConfig::new().pred(Func::unary("divisible", move |x| {
                Ok(Value::from(x.try_int()?.rem_euclid(modulus) == 0))
            })),
        )
        .unwrap();

        let filtered = collect(pipe(values(&numbers), &[stage]).unwrap()).unwrap();
        let expected: Vec<i64> = numbers.iter().copied().filter(|n| n.rem_euclid(modulus) == 0).collect();

        prop_assert_eq!(filtered, values(&expected));
    }

    #[test]
    fn prop_map_preserves_order_and_length(numbers in prop::collection::vec(any::<i64>(), 0..32)) {
        let mapped = collect(pipe(values(&numbers), &[map("increment", increment)]).unwrap()).unwrap();
        let expected: Vec<i64> = numbers.iter().copied().map(increment).collect();

        prop_assert_eq!(mapped, values(&expected));
    }
}

// =============================================================================
// Reduce and Zip
// =============================================================================

proptest! {
    #[test]
    fn prop_reduce_is_left_fold(numbers in prop::collection::vec(any::<i64>(), 0..32), seed in any::<i64>()) {
        let subtract = Func::binary("subtract", |left, right| {
            Ok(Value::from(left.try_int()?.wrapping_sub(right.try_int()?)))
        });
        let stage = as_func(Operator::Reduce, StageConfig::new().func(subtract).arg(seed)).unwrap();

        let reduced = collect(pipe(values(&numbers), &[stage]).unwrap()).unwrap();
        let expected = numbers.iter().fold(seed, |accumulator, n| accumulator.wrapping_sub(*n));

        prop_assert_eq!(reduced, values(&[expected]));
    }

    #[test]
    fn prop_zip_truncates_to_shortest(lengths in prop::collection::vec(0_usize..8, 1..5)) {
        let operands: Vec<Value> = lengths
            .iter()
            .map(|&length| Value::list((0..length).map(|i| Value::from(i64::try_from(i).unwrap()))))
            .collect();
        let zip = as_func(Operator::Zip, StageConfig::new()).unwrap();

        let zipped = collect(pipe(operands, &[zip]).unwrap()).unwrap();

        prop_assert_eq!(zipped.len(), lengths.iter().copied().min().unwrap());
        for row in &zipped {
            prop_assert_eq!(row.len(), Some(lengths.len()));
        }
    }
}
