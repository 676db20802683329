//! Argument policies applied at call time.
//!
//! [`smart_args`] reads the [`Marker`]s of a function's declared parameters
//! once, then on every call:
//!
//! - replaces the value of each [`Isolated`] parameter (explicit or default)
//!   with a deep copy, so the caller's objects are never mutated;
//! - fills each omitted [`Evaluated`] parameter with a fresh thunk result.
//!
//! # Examples
//!
//! ```rust
//! use callkit::smart::{Evaluated, Isolated, smart_args};
//! use callkit::{Func, Parameter, Signature, Value, args};
//!
//! let signature = Signature::new()
//!     .with(Parameter::keyword_only("items").with_marker(Isolated))
//!     .with(Parameter::keyword_only("extra").with_marker(Evaluated::new(|| Ok(Value::from(4)))));
//!
//! let append = Func::declared("append", signature, |bound| {
//!     let items = bound.arg("items")?;
//!     items.push(bound.arg("extra")?)?;
//!     Ok(items)
//! });
//! let append = smart_args(append, false).unwrap();
//!
//! let original = Value::list([Value::from(1)]);
//! let result = append.call(args![; items = original.clone()]).unwrap();
//!
//! assert_eq!(result, Value::list([Value::from(1), Value::from(4)]));
//! assert_eq!(original, Value::list([Value::from(1)]));
//! ```

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::func::{Decorator, Func, Parameter, Signature};

pub use crate::func::{Evaluated, Isolated, Marker};

/// Marker classification of a signature, computed once per decoration.
#[derive(Debug)]
struct Policy {
    signature: Rc<Signature>,
    isolated: Vec<usize>,
    evaluated: Vec<(usize, Evaluated)>,
}

impl Policy {
    fn classify(signature: Rc<Signature>, pos_args: bool) -> Result<Self> {
        let mut isolated = Vec::new();
        let mut evaluated = Vec::new();
        for (index, parameter) in signature.parameters().iter().enumerate() {
            match classify_parameter(parameter, pos_args)? {
                Some(Marker::Isolated) => isolated.push(index),
                Some(Marker::Evaluated(thunk)) => evaluated.push((index, thunk)),
                None => {}
            }
        }
        Ok(Self {
            signature,
            isolated,
            evaluated,
        })
    }
}

/// The effective marker of one parameter, if any.
fn classify_parameter(parameter: &Parameter, pos_args: bool) -> Result<Option<Marker>> {
    let markers = parameter.markers();
    if markers.is_empty() {
        return Ok(None);
    }

    let isolated = markers
        .iter()
        .any(|marker| matches!(marker, Marker::Isolated));
    let mut thunks = markers.iter().filter_map(|marker| match marker {
        Marker::Evaluated(thunk) => Some(thunk),
        Marker::Isolated => None,
    });
    let thunk = thunks.next();
    if (isolated && thunk.is_some()) || thunks.next().is_some() {
        return Err(Error::ConflictingMarker {
            parameter: parameter.name().to_string(),
        });
    }

    let kind = parameter.kind();
    if !(kind.accepts_keyword() || (pos_args && kind.accepts_positional())) {
        return Err(Error::UnsupportedParameterKind {
            parameter: parameter.name().to_string(),
            kind,
        });
    }

    Ok(Some(
        thunk.map_or(Marker::Isolated, |thunk| Marker::Evaluated(thunk.clone())),
    ))
}

/// Applies the parameter markers of `func`'s declared signature on every
/// call.
///
/// A function without a declared signature has no markers; it is wrapped
/// unchanged. Markers are only honored on keyword-capable parameters, or on
/// positional-only parameters as well when `pos_args` is `true`.
///
/// # Errors
///
/// - [`Error::ConflictingMarker`] if a parameter carries both `Isolated` and
///   `Evaluated`, or more than one `Evaluated`.
/// - [`Error::UnsupportedParameterKind`] if a marker sits on a
///   positional-only parameter while `pos_args` is `false`.
///
/// The decorated function fails with [`Error::MissingArgument`] when an
/// omitted `Isolated` parameter has no plain default.
pub fn smart_args(func: Func, pos_args: bool) -> Result<Func> {
    let Some(signature) = func.shared_signature() else {
        tracing::debug!(function = func.name(), "no declared signature, passing through");
        let target = func.clone();
        return Ok(Func::wrapping(&func, move |args| target.call(args)));
    };

    let policy = Policy::classify(signature, pos_args)?;
    tracing::debug!(
        function = func.name(),
        isolated = policy.isolated.len(),
        evaluated = policy.evaluated.len(),
        pos_args,
        "smart arguments enabled"
    );

    let target = func.clone();
    Ok(Func::wrapping(&func, move |args| {
        let mut bound = policy.signature.bind_explicit(target.name(), args)?;

        for &index in &policy.isolated {
            let default = policy.signature.parameters()[index].default();
            let slot = bound.slot_mut(index);
            *slot = slot.as_ref().or(default).map(|value| value.deep_copy());
        }

        for (index, thunk) in &policy.evaluated {
            if !bound.is_explicit_at(*index) {
                tracing::trace!(function = target.name(), "evaluating default thunk");
                *bound.slot_mut(*index) = Some(thunk.evaluate()?);
            }
        }

        bound.apply_defaults();
        bound.ensure_complete()?;
        target.call(bound.into_args())
    }))
}

/// [`smart_args`] as a [`Decorator`].
///
/// # Examples
///
/// ```rust
/// use callkit::smart::{Isolated, SmartArgs};
/// use callkit::{Error, Func, Parameter, Signature, Value};
///
/// let signature = Signature::new().with(Parameter::positional_only("items").with_marker(Isolated));
/// let first = Func::declared("first", signature, |bound| {
///     Ok(bound.arg("items")?.index(0).unwrap_or_default())
/// });
///
/// assert!(matches!(
///     first.clone().decorate(&SmartArgs::new()),
///     Err(Error::UnsupportedParameterKind { .. })
/// ));
/// assert!(first.decorate(&SmartArgs::new().pos_args(true)).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmartArgs {
    pos_args: bool,
}

impl SmartArgs {
    /// A decorator honoring markers on keyword-capable parameters only.
    pub const fn new() -> Self {
        Self { pos_args: false }
    }

    /// Also honors markers on positional-only parameters.
    #[must_use]
    pub const fn pos_args(mut self, enabled: bool) -> Self {
        self.pos_args = enabled;
        self
    }
}

impl Decorator for SmartArgs {
    fn decorate(&self, func: Func) -> Result<Func> {
        smart_args(func, self.pos_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::value::Value;
    use rstest::rstest;
    use std::cell::Cell;

    fn identity(signature: Signature) -> Func {
        Func::declared("identity", signature, |bound| {
            Ok(Value::tuple(bound.iter().map(|(_, value)| value.clone())))
        })
    }

    #[rstest]
    fn test_isolated_with_evaluated_conflicts() {
        let parameter = Parameter::keyword_only("value")
            .with_marker(Isolated)
            .with_marker(Evaluated::new(|| Ok(Value::None)));
        let error = smart_args(identity(Signature::new().with(parameter)), false).unwrap_err();

        assert_eq!(
            error,
            Error::ConflictingMarker {
                parameter: "value".to_string()
            }
        );
    }

    #[rstest]
    fn test_two_evaluated_markers_conflict() {
        let parameter = Parameter::keyword_only("value")
            .with_marker(Evaluated::new(|| Ok(Value::from(1))))
            .with_marker(Evaluated::new(|| Ok(Value::from(2))));
        assert!(smart_args(identity(Signature::new().with(parameter)), true).is_err());
    }

    #[rstest]
    fn test_positional_or_keyword_allowed_without_pos_args() {
        let parameter = Parameter::positional_or_keyword("value").with_marker(Isolated);
        assert!(smart_args(identity(Signature::new().with(parameter)), false).is_ok());
    }

    #[rstest]
    #[case(false, true)]
    #[case(true, false)]
    fn test_positional_only_requires_pos_args(#[case] pos_args: bool, #[case] rejected: bool) {
        let parameter = Parameter::positional_only("value").with_marker(Isolated);
        let result = smart_args(identity(Signature::new().with(parameter)), pos_args);
        assert_eq!(result.is_err(), rejected);
    }

    #[rstest]
    fn test_isolated_default_is_copied_per_call() {
        let signature = Signature::new().with(
            Parameter::keyword_only("items")
                .with_default(Value::list([]))
                .with_marker(Isolated),
        );
        let append = Func::declared("append", signature, |bound| {
            let items = bound.arg("items")?;
            items.push(Value::from(1))?;
            Ok(items)
        });
        let append = smart_args(append, false).unwrap();

        assert_eq!(append.call0().unwrap(), Value::list([Value::from(1)]));
        assert_eq!(append.call0().unwrap(), Value::list([Value::from(1)]));
    }

    #[rstest]
    fn test_omitted_isolated_without_default_is_missing() {
        let signature = Signature::new().with(Parameter::keyword_only("items").with_marker(Isolated));
        let decorated = smart_args(identity(signature), false).unwrap();

        assert!(matches!(
            decorated.call0(),
            Err(Error::MissingArgument { .. })
        ));
    }

    #[rstest]
    fn test_evaluated_runs_only_when_omitted() {
        let calls = Rc::new(Cell::new(0_i64));
        let counter = Rc::clone(&calls);
        let thunk = Evaluated::new(move || {
            counter.set(counter.get() + 1);
            Ok(Value::from(counter.get()))
        });
        let signature = Signature::new().with(Parameter::keyword_only("value").with_marker(thunk));
        let decorated = smart_args(identity(signature), false).unwrap();

        assert_eq!(decorated.call0().unwrap(), Value::tuple([Value::from(1)]));
        assert_eq!(decorated.call0().unwrap(), Value::tuple([Value::from(2)]));
        assert_eq!(
            decorated.call(args![; value = 10]).unwrap(),
            Value::tuple([Value::from(10)])
        );
        assert_eq!(calls.get(), 2);
    }

    #[rstest]
    fn test_evaluated_beats_plain_default() {
        let parameter = Parameter::keyword_only("value")
            .with_default(0)
            .with_marker(Evaluated::new(|| Ok(Value::from(7))));
        let decorated = smart_args(identity(Signature::new().with(parameter)), false).unwrap();

        assert_eq!(decorated.call0().unwrap(), Value::tuple([Value::from(7)]));
    }

    #[rstest]
    fn test_undeclared_function_passes_through() {
        let count = Func::variadic("count", |args| {
            Ok(Value::from(i64::try_from(args.len()).unwrap_or(i64::MAX)))
        });
        let decorated = smart_args(count.clone(), false).unwrap();

        assert_ne!(decorated, count);
        assert_eq!(decorated.name(), "count");
        assert_eq!(decorated.call(args![1, 2]).unwrap(), Value::from(2));
    }
}
