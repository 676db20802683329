//! Lazy stream pipelines.
//!
//! A [`Stream`] is a pull-based sequence of `Result<Value>`. [`as_func`]
//! turns an [`Operator`] and its [`StageConfig`] into a reusable [`Stage`],
//! [`pipe`] chains stages over an input without evaluating anything, and
//! [`collect`] is the single point where a pipeline is drained.
//!
//! # Examples
//!
//! ```rust
//! use callkit::stream::{Operator, StageConfig, as_func, collect, pipe};
//! use callkit::{Func, Value};
//!
//! let positive = as_func(
//!     Operator::Filter,
//!     StageConfig::new().pred(Func::unary("positive", |x| Ok(Value::from(x.try_int()? > 0)))),
//! )
//! .unwrap();
//! let double = as_func(
//!     Operator::Map,
//!     StageConfig::new().func(Func::unary("double", |x| Ok(Value::from(x.try_int()? * 2)))),
//! )
//! .unwrap();
//!
//! let input: Vec<Value> = [-2, -1, 0, 1, 2].into_iter().map(Value::from).collect();
//! let result = collect(pipe(input, &[positive, double]).unwrap()).unwrap();
//! assert_eq!(result, vec![Value::from(2), Value::from(4)]);
//! ```

mod operator;
mod source;

use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::value::{Value, ValueIter};

pub use operator::{Operator, StageConfig, StreamOperator, as_func};
pub use source::squares;

/// A lazy sequence of values. Failures raised while producing an item are
/// yielded in place of that item.
pub struct Stream {
    items: Box<dyn Iterator<Item = Result<Value>>>,
}

static_assertions::assert_not_impl_any!(Stream: Send, Sync);

impl Stream {
    /// Wraps an iterator of fallible items.
    pub fn new<I>(items: I) -> Self
    where
        I: Iterator<Item = Result<Value>> + 'static,
    {
        Self {
            items: Box::new(items),
        }
    }

    /// Wraps an iterator of plain values.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        Self::new(values.into_iter().map(Ok))
    }

    /// A stream with no items.
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl Iterator for Stream {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Stream").finish_non_exhaustive()
    }
}

impl From<Vec<Value>> for Stream {
    fn from(values: Vec<Value>) -> Self {
        Self::from_values(values)
    }
}

impl<const N: usize> From<[Value; N]> for Stream {
    fn from(values: [Value; N]) -> Self {
        Self::from_values(values)
    }
}

impl From<ValueIter> for Stream {
    fn from(values: ValueIter) -> Self {
        Self::from_values(values)
    }
}

type Transform = dyn Fn(Stream) -> Stream;

/// A configured, reusable pipeline step created by [`as_func`].
///
/// Applying a stage only builds the next lazy stream; no item is pulled.
#[derive(Clone)]
pub struct Stage {
    name: Rc<str>,
    transform: Rc<Transform>,
}

impl Stage {
    pub(crate) fn new<F>(name: &str, transform: F) -> Self
    where
        F: Fn(Stream) -> Stream + 'static,
    {
        Self {
            name: Rc::from(name),
            transform: Rc::new(transform),
        }
    }

    /// The operator name this stage was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wraps `input` in this stage.
    pub fn apply(&self, input: Stream) -> Stream {
        (self.transform)(input)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Stage")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Chains `stages` over `input`, left to right.
///
/// Nothing is evaluated: the returned stream pulls from the input only when
/// it is itself pulled, so unbounded sources are fine. Wrap a plain value
/// iterator with [`Stream::from_values`].
///
/// # Errors
///
/// Returns [`Error::EmptyPipeline`] if `stages` is empty.
///
/// # Examples
///
/// ```rust
/// use callkit::Error;
/// use callkit::stream::{Stream, pipe};
///
/// assert_eq!(pipe(Stream::empty(), &[]).unwrap_err(), Error::EmptyPipeline);
/// ```
pub fn pipe<S>(input: S, stages: &[Stage]) -> Result<Stream>
where
    S: Into<Stream>,
{
    if stages.is_empty() {
        return Err(Error::EmptyPipeline);
    }
    tracing::trace!(stages = stages.len(), "building pipeline");
    Ok(stages
        .iter()
        .fold(input.into(), |stream, stage| stage.apply(stream)))
}

/// Drains `stream` into a vector.
///
/// # Errors
///
/// Stops at and returns the first failed item.
pub fn collect(stream: Stream) -> Result<Vec<Value>> {
    stream.collect()
}
