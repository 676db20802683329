//! Per-parameter argument policies.
//!
//! Markers are attached to a [`Parameter`](super::Parameter) when a
//! signature is declared and are read once by
//! [`smart_args`](crate::smart::smart_args). A plain (undecorated) function
//! ignores them.

use super::Func;
use crate::error::{Error, Result};
use crate::value::Value;

/// Marks a parameter whose value is deep-copied before every call, so the
/// function body can never mutate the caller's object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Isolated;

/// Marks a parameter whose value, when the caller omits it, is produced by a
/// fresh call to a zero-argument thunk.
///
/// # Examples
///
/// ```rust
/// use callkit::{Evaluated, Func, Value};
///
/// let evaluated = Evaluated::new(|| Ok(Value::list([])));
/// assert_eq!(evaluated.evaluate().unwrap(), Value::list([]));
///
/// // A non-function is rejected.
/// assert!(Evaluated::from_value(Value::from(1)).is_err());
///
/// // So is a function that cannot be called without arguments.
/// let unary = Func::unary("double", |value| Ok(Value::from(value.try_int()? * 2)));
/// assert!(Evaluated::from_value(Value::from(unary)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Evaluated {
    thunk: Func,
}

impl Evaluated {
    /// Wraps a closure as the thunk.
    pub fn new<F>(thunk: F) -> Self
    where
        F: Fn() -> Result<Value> + 'static,
    {
        Self {
            thunk: Func::nullary("<thunk>", thunk),
        }
    }

    /// Uses an existing function value as the thunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThunk`] if `value` is not a function, or is a
    /// function whose declared signature has required parameters.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Func(thunk) => {
                let needs_arguments = thunk.signature().is_some_and(|signature| {
                    signature.parameters().iter().any(super::Parameter::is_required)
                });
                if needs_arguments {
                    Err(Error::InvalidThunk {
                        type_name: "function with required parameters",
                    })
                } else {
                    Ok(Self { thunk })
                }
            }
            other => Err(Error::InvalidThunk {
                type_name: other.type_name(),
            }),
        }
    }

    /// The wrapped thunk.
    pub const fn thunk(&self) -> &Func {
        &self.thunk
    }

    /// Calls the thunk once.
    ///
    /// # Errors
    ///
    /// Propagates whatever the thunk returns.
    pub fn evaluate(&self) -> Result<Value> {
        self.thunk.call0()
    }
}

/// A policy attached to a parameter.
#[derive(Debug, Clone)]
pub enum Marker {
    /// See [`Isolated`].
    Isolated,
    /// See [`Evaluated`].
    Evaluated(Evaluated),
}

impl From<Isolated> for Marker {
    fn from(_: Isolated) -> Self {
        Self::Isolated
    }
}

impl From<Evaluated> for Marker {
    fn from(evaluated: Evaluated) -> Self {
        Self::Evaluated(evaluated)
    }
}
