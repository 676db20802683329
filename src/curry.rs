//! Fixed-arity currying and uncurrying.
//!
//! [`curry`] turns a function of `n` positional arguments into a chain of
//! `n` one-argument functions; [`uncurry`] turns such a chain back into a
//! function taking all `n` arguments at once.
//!
//! ```text
//! curry(f, 3)(a)(b)(c) = f(a, b, c)
//! uncurry(curry(f, n), n)(a1, ..., an) = f(a1, ..., an)
//! ```
//!
//! Unlike the `curry2!`-style macros of statically typed libraries, the arity
//! here is a runtime value, so a variadic function can be fixed to any arity.
//!
//! # Examples
//!
//! ```rust
//! use callkit::curry::{curry, uncurry};
//! use callkit::{Func, Value, args};
//!
//! let sum = Func::variadic("sum", |args| {
//!     let total = args.positional().iter().map(Value::try_int).sum::<Result<i64, _>>()?;
//!     Ok(Value::from(total))
//! });
//!
//! let curried = curry(sum, 3).unwrap();
//! let add_one = curried.call1(Value::from(1)).unwrap();
//! let add_three = add_one.try_func().unwrap().call1(Value::from(2)).unwrap();
//! assert_eq!(add_three.try_func().unwrap().call1(Value::from(3)).unwrap(), Value::from(6));
//!
//! let uncurried = uncurry(curried, 3).unwrap();
//! assert_eq!(uncurried.call(args![1, 2, 3]).unwrap(), Value::from(6));
//! ```

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::func::{Args, Func};
use crate::value::Value;

/// Converts a signed arity into a count, rejecting negatives.
fn checked_arity(arity: isize) -> Result<usize> {
    usize::try_from(arity).map_err(|_| Error::InvalidArity { arity })
}

/// A partial application: `applied.len() < arity` always holds. Reaching
/// the arity invokes the target instead of building a longer chain.
#[derive(Clone)]
struct CurriedChain {
    target: Func,
    arity: usize,
    applied: Rc<[Value]>,
}

impl CurriedChain {
    fn start(target: Func, arity: usize) -> Self {
        Self {
            target,
            arity,
            applied: Rc::from([]),
        }
    }

    fn apply(&self, args: Args) -> Result<Value> {
        let argument = single_argument(self.target.name(), args)?;
        let applied: Vec<Value> = self
            .applied
            .iter()
            .cloned()
            .chain(std::iter::once(argument))
            .collect();

        if applied.len() == self.arity {
            tracing::trace!(
                function = self.target.name(),
                arity = self.arity,
                "curried chain complete"
            );
            self.target.call(applied.into_iter().collect())
        } else {
            let next = Self {
                target: self.target.clone(),
                arity: self.arity,
                applied: applied.into(),
            };
            Ok(Value::Func(next.into_func()))
        }
    }

    fn into_func(self) -> Func {
        let name = self.target.name().to_owned();
        Func::variadic(&name, move |args| self.apply(args))
    }
}

/// Extracts the single positional argument a curried stage accepts.
fn single_argument(function: &str, args: Args) -> Result<Value> {
    let (positional, keywords) = args.into_parts();
    if let Some((keyword, _)) = keywords.first() {
        return Err(Error::UnexpectedKeyword {
            function: function.to_string(),
            keyword: keyword.to_string(),
        });
    }
    let actual = positional.len();
    let mut positional = positional.into_iter();
    match (positional.next(), actual) {
        (Some(argument), 1) => Ok(argument),
        _ => Err(Error::ArityMismatch {
            function: function.to_string(),
            expected: 1,
            actual,
        }),
    }
}

/// Curries `func` to `arity` one-argument stages.
///
/// With `arity == 0`, `func` itself is returned and is not invoked. Otherwise
/// each stage takes exactly one positional argument; the last one calls
/// `func` with every accumulated argument and returns its result. Stages can
/// be called more than once, so partial applications are reusable.
///
/// # Errors
///
/// Returns [`Error::InvalidArity`] if `arity` is negative. Calling a stage
/// with anything but one positional argument fails with
/// [`Error::ArityMismatch`] (or [`Error::UnexpectedKeyword`]).
///
/// # Examples
///
/// ```rust
/// use callkit::curry::curry;
/// use callkit::{Error, Func, Value, args};
///
/// let pair = Func::binary("pair", |left, right| Ok(Value::tuple([left, right])));
/// let curried = curry(pair, 2).unwrap();
///
/// let first = curried.call1(Value::from("a")).unwrap();
/// let result = first.try_func().unwrap().call1(Value::from("b")).unwrap();
/// assert_eq!(result, Value::tuple([Value::from("a"), Value::from("b")]));
///
/// assert!(matches!(
///     curried.call(args![1, 2]),
///     Err(Error::ArityMismatch { expected: 1, actual: 2, .. })
/// ));
/// ```
pub fn curry(func: Func, arity: isize) -> Result<Func> {
    let arity = checked_arity(arity)?;
    if arity == 0 {
        return Ok(func);
    }
    tracing::debug!(function = func.name(), arity, "currying function");
    Ok(CurriedChain::start(func, arity).into_func())
}

/// Turns a curried chain of `arity` stages back into one function taking
/// exactly `arity` positional arguments.
///
/// With `arity == 0`, `func` itself is returned.
///
/// # Errors
///
/// Returns [`Error::InvalidArity`] if `arity` is negative. The returned
/// function fails with [`Error::ArityMismatch`] when called with a different
/// number of arguments, [`Error::UnexpectedKeyword`] when given keywords, and
/// [`Error::NotCallable`] if a stage returns a non-function before all
/// arguments are consumed.
///
/// # Examples
///
/// ```rust
/// use callkit::curry::{curry, uncurry};
/// use callkit::{Error, Func, Value, args};
///
/// let subtract = Func::binary("subtract", |left, right| {
///     Ok(Value::from(left.try_int()? - right.try_int()?))
/// });
/// let uncurried = uncurry(curry(subtract, 2).unwrap(), 2).unwrap();
///
/// assert_eq!(uncurried.call(args![10, 4]).unwrap(), Value::from(6));
/// assert_eq!(
///     uncurried.call(args![10]).unwrap_err().to_string(),
///     "subtract: expected 2 arguments, got 1"
/// );
/// ```
pub fn uncurry(func: Func, arity: isize) -> Result<Func> {
    let arity = checked_arity(arity)?;
    if arity == 0 {
        return Ok(func);
    }
    let name = func.name().to_owned();
    let function_name = name.clone();
    Ok(Func::variadic(&name, move |args| {
        let (positional, keywords) = args.into_parts();
        if let Some((keyword, _)) = keywords.first() {
            return Err(Error::UnexpectedKeyword {
                function: function_name.clone(),
                keyword: keyword.to_string(),
            });
        }
        if positional.len() != arity {
            return Err(Error::ArityMismatch {
                function: function_name.clone(),
                expected: arity,
                actual: positional.len(),
            });
        }
        positional
            .into_iter()
            .try_fold(Value::Func(func.clone()), |stage, argument| match stage {
                Value::Func(stage) => stage.call1(argument),
                other => Err(Error::NotCallable {
                    type_name: other.type_name(),
                }),
            })
    }))
}
