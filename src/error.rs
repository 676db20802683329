//! Error types shared by every callkit module.
//!
//! Failures fall into two groups:
//!
//! - **Construction-time** contract violations (negative arity, empty
//!   pipelines, missing stage functions, misplaced markers, bad thunks). These
//!   are reported by the constructor that received the bad input.
//! - **Call-time** violations (wrong argument count, unknown keyword, missing
//!   argument). These are reported by the single call that triggered them and
//!   leave the callable usable.
//!
//! Unhashable cache arguments are not an error for callers of a cached
//! function; [`Error::Unhashable`] only surfaces from [`crate::Value::to_key`]
//! and [`cache_keys`](crate::cache::cache_keys).
//!
//! # Examples
//!
//! ```rust
//! use callkit::Error;
//!
//! let error = Error::ArityMismatch {
//!     function: "add".to_string(),
//!     expected: 2,
//!     actual: 1,
//! };
//! assert_eq!(error.to_string(), "add: expected 2 arguments, got 1");
//! ```

use thiserror::Error;

use crate::func::ParameterKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a callkit operation can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An arity passed to `curry`/`uncurry` was negative.
    #[error("arity must be a non-negative integer, got {arity}")]
    InvalidArity {
        /// The rejected arity.
        arity: isize,
    },

    /// A fixed-arity callable was called with the wrong number of arguments.
    #[error("{function}: expected {expected} arguments, got {actual}")]
    ArityMismatch {
        /// Name of the callable.
        function: String,
        /// Number of arguments the callable takes.
        expected: usize,
        /// Number of arguments actually given.
        actual: usize,
    },

    /// A map or reduce stage was built without `func`.
    #[error("{operator} requires 'func'")]
    MissingTransform {
        /// The stage operator name.
        operator: &'static str,
    },

    /// A filter stage was built with neither `func` nor `pred`.
    #[error("filter requires 'func' or 'pred'")]
    MissingPredicate,

    /// A stage was given more extra positional arguments than it accepts.
    #[error("{operator} accepts at most {max} extra argument(s), got {actual}")]
    TooManyArguments {
        /// The stage operator name.
        operator: &'static str,
        /// Largest accepted count.
        max: usize,
        /// Count actually given.
        actual: usize,
    },

    /// `pipe` was called without any stage.
    #[error("'operators' must not be empty")]
    EmptyPipeline,

    /// A reduce stage without initializer consumed an empty stream.
    #[error("reduce of empty sequence with no initial value")]
    EmptyReduce,

    /// A value that cannot be iterated was used as a sequence.
    #[error("'{type_name}' object is not iterable")]
    NotIterable {
        /// Type of the offending value.
        type_name: &'static str,
    },

    /// A value that is not a function was called.
    #[error("'{type_name}' object is not callable")]
    NotCallable {
        /// Type of the offending value.
        type_name: &'static str,
    },

    /// A value (or a value nested in a tuple) has no hashable key.
    #[error("unhashable type: '{type_name}'")]
    Unhashable {
        /// Type of the offending value.
        type_name: &'static str,
    },

    /// A parameter carries markers that cannot be combined.
    #[error("argument '{parameter}' can't use Isolated and Evaluated together")]
    ConflictingMarker {
        /// Name of the parameter.
        parameter: String,
    },

    /// A marker sits on a parameter kind that may not carry it.
    #[error("{kind} argument '{parameter}' can't use Isolated or Evaluated unless pos_args is enabled")]
    UnsupportedParameterKind {
        /// Name of the parameter.
        parameter: String,
        /// Its declared kind.
        kind: ParameterKind,
    },

    /// `Evaluated` was given something that is not a zero-argument function.
    #[error("Evaluated requires a zero-argument callable, got '{type_name}'")]
    InvalidThunk {
        /// Type (or description) of the rejected value.
        type_name: &'static str,
    },

    /// A declared parameter received no value and has no default.
    #[error("{function}() missing required argument '{parameter}'")]
    MissingArgument {
        /// Name of the callable.
        function: String,
        /// Name of the parameter.
        parameter: String,
    },

    /// A keyword argument matched no keyword-capable parameter.
    #[error("{function}() got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword {
        /// Name of the callable.
        function: String,
        /// The keyword that was given.
        keyword: String,
    },

    /// A parameter was bound both positionally and by keyword.
    #[error("{function}() got multiple values for argument '{parameter}'")]
    DuplicateArgument {
        /// Name of the callable.
        function: String,
        /// Name of the parameter.
        parameter: String,
    },

    /// More positional arguments were given than positional parameters exist.
    #[error("{function}() takes {expected} positional arguments but {actual} were given")]
    TooManyPositional {
        /// Name of the callable.
        function: String,
        /// Number of positional-capable parameters.
        expected: usize,
        /// Number of positional arguments given.
        actual: usize,
    },

    /// A value had a different type than an operation required.
    #[error("expected {expected}, found '{found}'")]
    TypeMismatch {
        /// The required type.
        expected: &'static str,
        /// The type that was found.
        found: &'static str,
    },

    /// A user-defined function reported a failure.
    #[error("{message}")]
    Failed {
        /// Failure description.
        message: String,
    },
}

impl Error {
    /// Creates an [`Error::Failed`] from any message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use callkit::Error;
    ///
    /// let error = Error::failed("division by zero");
    /// assert_eq!(error.to_string(), "division by zero");
    /// ```
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised while constructing a stage, a curried
    /// form, or a decorator, as opposed to errors raised by a single call.
    pub const fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArity { .. }
                | Self::MissingTransform { .. }
                | Self::MissingPredicate
                | Self::TooManyArguments { .. }
                | Self::EmptyPipeline
                | Self::ConflictingMarker { .. }
                | Self::UnsupportedParameterKind { .. }
                | Self::InvalidThunk { .. }
        )
    }
}
