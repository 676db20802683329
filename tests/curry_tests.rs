//! Unit tests for curry and uncurry.
//!
//! Tests for converting functions between their multi-argument and
//! one-argument-per-stage forms.

#![cfg(feature = "curry")]

use std::cell::Cell;
use std::rc::Rc;

use callkit::curry::{curry, uncurry};
use callkit::{Error, Func, Value, args};
use rstest::rstest;

fn apply_all(curried: &Func, arguments: &[Value]) -> Value {
    arguments.iter().fold(Value::Func(curried.clone()), |stage, argument| {
        stage.try_func().unwrap().call1(argument.clone()).unwrap()
    })
}

fn concat() -> Func {
    Func::variadic("concat", |args| {
        let mut joined = String::new();
        for value in args.positional() {
            joined.push_str(value.try_str()?);
        }
        Ok(Value::from(joined))
    })
}

// =============================================================================
// curry tests
// =============================================================================

mod curry_tests {
    use super::*;

    #[rstest]
    #[case(1, &["a"], "a")]
    #[case(2, &["a", "b"], "ab")]
    #[case(3, &["a", "b", "c"], "abc")]
    #[case(5, &["h", "e", "l", "l", "o"], "hello")]
    fn test_curry_fixes_variadic_arity(
        #[case] arity: isize,
        #[case] parts: &[&str],
        #[case] expected: &str,
    ) {
        let curried = curry(concat(), arity).unwrap();
        let arguments: Vec<Value> = parts.iter().copied().map(Value::from).collect();

        assert_eq!(apply_all(&curried, &arguments), Value::from(expected));
    }

    #[rstest]
    fn test_intermediate_stages_are_functions() {
        let curried = curry(concat(), 3).unwrap();

        let first = curried.call1(Value::from("a")).unwrap();
        let second = first.try_func().unwrap().call1(Value::from("b")).unwrap();

        assert!(first.as_func().is_some());
        assert!(second.as_func().is_some());
    }

    #[rstest]
    fn test_target_runs_only_on_last_stage() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let target = Func::variadic("target", move |args| {
            counter.set(counter.get() + 1);
            Ok(Value::tuple(args.positional().iter().cloned()))
        });
        let curried = curry(target, 3).unwrap();

        let partial = curried.call1(Value::from(1)).unwrap();
        let partial = partial.try_func().unwrap().call1(Value::from(2)).unwrap();
        assert_eq!(calls.get(), 0);

        let result = partial.try_func().unwrap().call1(Value::from(3)).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(
            result,
            Value::tuple([Value::from(1), Value::from(2), Value::from(3)])
        );
    }

    #[rstest]
    fn test_zero_arity_does_not_invoke() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let target = Func::nullary("target", move || {
            counter.set(counter.get() + 1);
            Ok(Value::None)
        });

        let curried = curry(target.clone(), 0).unwrap();

        assert_eq!(curried, target);
        assert_eq!(calls.get(), 0);
    }

    #[rstest]
    #[case(args![1, 2], 2)]
    #[case(args![], 0)]
    fn test_stage_requires_exactly_one_argument(
        #[case] arguments: callkit::Args,
        #[case] actual: usize,
    ) {
        let curried = curry(concat(), 2).unwrap();

        assert_eq!(
            curried.call(arguments).unwrap_err(),
            Error::ArityMismatch {
                function: "concat".to_string(),
                expected: 1,
                actual,
            }
        );
    }

    #[rstest]
    fn test_negative_arity() {
        let error = curry(concat(), -1).unwrap_err();
        assert_eq!(error, Error::InvalidArity { arity: -1 });
        assert!(error.is_construction_error());
    }

    #[rstest]
    fn test_target_errors_propagate() {
        let curried = curry(concat(), 2).unwrap();
        let first = curried.call1(Value::from("a")).unwrap();

        let error = first.try_func().unwrap().call1(Value::from(1)).unwrap_err();
        assert!(matches!(error, Error::TypeMismatch { .. }));
    }
}

// =============================================================================
// uncurry tests
// =============================================================================

mod uncurry_tests {
    use super::*;

    #[rstest]
    fn test_uncurry_restores_multi_argument_call() {
        let uncurried = uncurry(curry(concat(), 3).unwrap(), 3).unwrap();
        assert_eq!(
            uncurried.call(args!["x", "y", "z"]).unwrap(),
            Value::from("xyz")
        );
    }

    #[rstest]
    #[case(args![1], 1)]
    #[case(args![1, 2, 3], 3)]
    fn test_wrong_count_names_expected(#[case] arguments: callkit::Args, #[case] actual: usize) {
        let uncurried = uncurry(curry(concat(), 2).unwrap(), 2).unwrap();

        let error = uncurried.call(arguments).unwrap_err();
        assert_eq!(
            error.to_string(),
            format!("concat: expected 2 arguments, got {actual}")
        );
    }

    #[rstest]
    fn test_uncurry_rejects_keywords() {
        let uncurried = uncurry(curry(concat(), 1).unwrap(), 1).unwrap();
        assert!(matches!(
            uncurried.call(args![; text = "a"]),
            Err(Error::UnexpectedKeyword { .. })
        ));
    }

    #[rstest]
    fn test_uncurry_of_hand_written_chain() {
        let adder = Func::unary("adder", |left| {
            let left = left.try_int()?;
            Ok(Value::from(Func::unary("add_left", move |right| {
                Ok(Value::from(left + right.try_int()?))
            })))
        });
        let uncurried = uncurry(adder, 2).unwrap();

        assert_eq!(uncurried.call(args![3, 4]).unwrap(), Value::from(7));
    }

    #[rstest]
    fn test_zero_arity_returns_function() {
        let target = concat();
        assert_eq!(uncurry(target.clone(), 0).unwrap(), target);
    }
}
