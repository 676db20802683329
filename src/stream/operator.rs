//! Stage construction: the operator vocabulary and [`as_func`].

use std::fmt;
use std::rc::Rc;

use super::{Stage, Stream};
use crate::error::{Error, Result};
use crate::func::{Args, Func};
use crate::value::{Value, ValueIter};

/// A user-defined stream operator.
///
/// It receives the whole input stream plus the stage's extra arguments and
/// returns the output stream. Any `Fn(Stream, Args) -> Result<Stream>`
/// closure is an operator.
pub trait StreamOperator {
    /// Transforms `input`.
    ///
    /// # Errors
    ///
    /// An error is yielded as the first item of the stage's output.
    fn apply(&self, input: Stream, args: Args) -> Result<Stream>;

    /// Name used in logs and [`Stage::name`].
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> StreamOperator for F
where
    F: Fn(Stream, Args) -> Result<Stream>,
{
    fn apply(&self, input: Stream, args: Args) -> Result<Stream> {
        self(input, args)
    }
}

/// What a stage does.
#[derive(Clone)]
pub enum Operator {
    /// Yields `func(item)` for every item.
    Map,
    /// Yields the items for which the predicate result is truthy.
    Filter,
    /// Treats each item as an iterable operand and yields tuples of aligned
    /// elements, stopping at the shortest operand.
    Zip,
    /// Folds the stream with `func` into a single item.
    Reduce,
    /// Delegates to a user-defined operator.
    Custom(Rc<dyn StreamOperator>),
}

impl Operator {
    /// Wraps a user-defined operator.
    pub fn custom<O>(operator: O) -> Self
    where
        O: StreamOperator + 'static,
    {
        Self::Custom(Rc::new(operator))
    }

    /// The operator name.
    pub fn name(&self) -> &str {
        match self {
            Self::Map => "map",
            Self::Filter => "filter",
            Self::Zip => "zip",
            Self::Reduce => "reduce",
            Self::Custom(operator) => operator.name(),
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(operator) => formatter
                .debug_tuple("Custom")
                .field(&operator.name())
                .finish(),
            builtin => formatter.write_str(builtin.name()),
        }
    }
}

/// Arguments of a stage: extra positional values, `func`, `pred` and extra
/// keyword values.
///
/// # Examples
///
/// ```rust
/// use callkit::stream::StageConfig;
/// use callkit::{Func, Value};
///
/// let add = Func::binary("add", |left, right| Ok(Value::from(left.try_int()? + right.try_int()?)));
/// let config = StageConfig::new().func(add).arg(0);
///
/// assert_eq!(config.extra().positional(), &[Value::from(0)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StageConfig {
    extra: Args,
    func: Option<Func>,
    pred: Option<Func>,
}

impl StageConfig {
    /// An empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an extra positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.extra.push(value.into());
        self
    }

    /// Sets the transformation function.
    #[must_use]
    pub fn func(mut self, func: Func) -> Self {
        self.func = Some(func);
        self
    }

    /// Sets the predicate.
    #[must_use]
    pub fn pred(mut self, pred: Func) -> Self {
        self.pred = Some(pred);
        self
    }

    /// Sets an extra keyword argument.
    #[must_use]
    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extra.set_keyword(name, value.into());
        self
    }

    /// The extra positional and keyword arguments.
    pub const fn extra(&self) -> &Args {
        &self.extra
    }

    /// Arguments handed to a custom operator: the extra positional values,
    /// then `func`/`pred` as keywords, overridden by explicit keywords.
    fn custom_args(&self) -> Args {
        let (positional, keywords) = self.extra.clone().into_parts();
        let mut args: Args = positional.into_iter().collect();
        if let Some(func) = &self.func {
            args.set_keyword("func", Value::Func(func.clone()));
        }
        if let Some(pred) = &self.pred {
            args.set_keyword("pred", Value::Func(pred.clone()));
        }
        for (name, value) in keywords {
            args.set_keyword(&name, value);
        }
        args
    }
}

/// Builds a reusable stage from `operator` and its configuration.
///
/// Extra positional arguments are ignored by map, filter and zip; reduce
/// takes at most one, the initializer.
///
/// # Errors
///
/// - [`Error::MissingTransform`] for map or reduce without `func`.
/// - [`Error::MissingPredicate`] for filter with neither `func` nor `pred`.
/// - [`Error::TooManyArguments`] for reduce with more than one initializer.
///
/// # Examples
///
/// ```rust
/// use callkit::stream::{Operator, StageConfig, as_func, collect, pipe};
/// use callkit::{Error, Func, Value};
///
/// let add = Func::binary("add", |left, right| Ok(Value::from(left.try_int()? + right.try_int()?)));
///
/// let total = as_func(Operator::Reduce, StageConfig::new().func(add.clone())).unwrap();
/// let input: Vec<Value> = [1, 2, 3].into_iter().map(Value::from).collect();
/// assert_eq!(collect(pipe(input, &[total]).unwrap()).unwrap(), vec![Value::from(6)]);
///
/// let error = as_func(Operator::Reduce, StageConfig::new().func(add).arg(0).arg(1)).unwrap_err();
/// assert!(matches!(error, Error::TooManyArguments { max: 1, actual: 2, .. }));
/// ```
pub fn as_func(operator: Operator, config: StageConfig) -> Result<Stage> {
    tracing::trace!(operator = operator.name(), "building stage");
    match operator {
        Operator::Map => {
            let func = config.func.ok_or(Error::MissingTransform { operator: "map" })?;
            Ok(Stage::new("map", move |input| {
                let func = func.clone();
                Stream::new(input.map(move |item| item.and_then(|value| func.call1(value))))
            }))
        }
        Operator::Filter => {
            let predicate = config.func.or(config.pred).ok_or(Error::MissingPredicate)?;
            Ok(Stage::new("filter", move |input| {
                let predicate = predicate.clone();
                Stream::new(input.filter_map(move |item| keep(&predicate, item)))
            }))
        }
        Operator::Zip => Ok(Stage::new("zip", |input| Stream::new(ZipIter::new(input)))),
        Operator::Reduce => {
            let func = config.func.ok_or(Error::MissingTransform { operator: "reduce" })?;
            let (mut positional, _) = config.extra.into_parts();
            if positional.len() > 1 {
                return Err(Error::TooManyArguments {
                    operator: "reduce",
                    max: 1,
                    actual: positional.len(),
                });
            }
            let initializer = positional.pop();
            Ok(Stage::new("reduce", move |input| {
                let func = func.clone();
                let initializer = initializer.clone();
                Stream::new(std::iter::once_with(move || fold(input, &func, initializer)))
            }))
        }
        Operator::Custom(custom) => {
            let args = config.custom_args();
            let name = custom.name().to_owned();
            Ok(Stage::new(&name, move |input| {
                Stream::new(Deferred::Pending {
                    operator: Rc::clone(&custom),
                    input,
                    args: args.clone(),
                })
            }))
        }
    }
}

fn keep(predicate: &Func, item: Result<Value>) -> Option<Result<Value>> {
    let value = match item {
        Ok(value) => value,
        Err(error) => return Some(Err(error)),
    };
    match predicate.call1(value.clone()) {
        Ok(verdict) => verdict.is_truthy().then_some(Ok(value)),
        Err(error) => Some(Err(error)),
    }
}

fn fold(mut input: Stream, func: &Func, initializer: Option<Value>) -> Result<Value> {
    let seed = match initializer {
        Some(seed) => seed,
        None => input.next().ok_or(Error::EmptyReduce)??,
    };
    input.try_fold(seed, |accumulator, item| func.call2(accumulator, item?))
}

/// Zip over the items of the input. The operand list is materialized on the
/// first pull; each operand is then iterated lazily.
enum ZipIter {
    Pending(Stream),
    Running(Vec<ValueIter>),
    Done,
}

impl ZipIter {
    const fn new(input: Stream) -> Self {
        Self::Pending(input)
    }
}

impl Iterator for ZipIter {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(self, Self::Done) {
                Self::Pending(input) => {
                    match input
                        .map(|item| item.and_then(|operand| operand.iter()))
                        .collect::<Result<Vec<_>>>()
                    {
                        Ok(operands) => *self = Self::Running(operands),
                        Err(error) => return Some(Err(error)),
                    }
                }
                Self::Running(mut operands) => {
                    if operands.is_empty() {
                        return None;
                    }
                    let row = operands.iter_mut().map(Iterator::next).collect::<Option<Vec<_>>>()?;
                    *self = Self::Running(operands);
                    return Some(Ok(Value::tuple(row)));
                }
                Self::Done => return None,
            }
        }
    }
}

/// A custom operator's output, invoked on the first pull.
enum Deferred {
    Pending {
        operator: Rc<dyn StreamOperator>,
        input: Stream,
        args: Args,
    },
    Running(Stream),
    Done,
}

impl Iterator for Deferred {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(self, Self::Done) {
                Self::Pending {
                    operator,
                    input,
                    args,
                } => match operator.apply(input, args) {
                    Ok(output) => *self = Self::Running(output),
                    Err(error) => return Some(Err(error)),
                },
                Self::Running(mut output) => {
                    let item = output.next()?;
                    *self = Self::Running(output);
                    return Some(item);
                }
                Self::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::stream::{collect, pipe};
    use rstest::rstest;
    use std::cell::Cell;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::from).collect()
    }

    fn add() -> Func {
        Func::binary("add", |left, right| {
            Ok(Value::from(left.try_int()? + right.try_int()?))
        })
    }

    #[rstest]
    #[case(Operator::Map, Error::MissingTransform { operator: "map" })]
    #[case(Operator::Reduce, Error::MissingTransform { operator: "reduce" })]
    #[case(Operator::Filter, Error::MissingPredicate)]
    fn test_missing_function_is_rejected(#[case] operator: Operator, #[case] expected: Error) {
        assert_eq!(as_func(operator, StageConfig::new()).unwrap_err(), expected);
    }

    #[rstest]
    fn test_filter_prefers_func_over_pred() {
        let even = Func::unary("even", |x| Ok(Value::from(x.try_int()? % 2 == 0)));
        let never = Func::unary("never", |_| Ok(Value::from(false)));
        let stage = as_func(Operator::Filter, StageConfig::new().func(even).pred(never)).unwrap();

        let result = collect(pipe(ints(&[1, 2, 3, 4]), &[stage]).unwrap()).unwrap();
        assert_eq!(result, ints(&[2, 4]));
    }

    #[rstest]
    fn test_zip_truncates_to_shortest() {
        let stage = as_func(Operator::Zip, StageConfig::new()).unwrap();
        let input = vec![Value::list(ints(&[1, 2, 3])), Value::from("ab")];

        let result = collect(pipe(input, &[stage]).unwrap()).unwrap();
        assert_eq!(
            result,
            vec![
                Value::tuple([Value::from(1), Value::from("a")]),
                Value::tuple([Value::from(2), Value::from("b")]),
            ]
        );
    }

    #[rstest]
    fn test_zip_without_operands_is_empty() {
        let stage = as_func(Operator::Zip, StageConfig::new()).unwrap();
        assert!(collect(pipe(Vec::<Value>::new(), &[stage]).unwrap()).unwrap().is_empty());
    }

    #[rstest]
    fn test_zip_rejects_non_iterable_operand() {
        let stage = as_func(Operator::Zip, StageConfig::new()).unwrap();
        let error = collect(pipe(ints(&[1]), &[stage]).unwrap()).unwrap_err();
        assert_eq!(error, Error::NotIterable { type_name: "int" });
    }

    #[rstest]
    fn test_reduce_uses_initializer() {
        let stage = as_func(Operator::Reduce, StageConfig::new().func(add()).arg(0)).unwrap();

        assert_eq!(collect(stage.apply(Stream::empty())).unwrap(), ints(&[0]));
        assert_eq!(
            collect(stage.apply(Stream::from(ints(&[1, 2, 3])))).unwrap(),
            ints(&[6])
        );
    }

    #[rstest]
    fn test_reduce_of_empty_without_initializer_fails() {
        let stage = as_func(Operator::Reduce, StageConfig::new().func(add())).unwrap();
        assert_eq!(
            collect(stage.apply(Stream::empty())).unwrap_err(),
            Error::EmptyReduce
        );
    }

    #[rstest]
    fn test_custom_receives_merged_arguments() {
        let seen = Rc::new(Cell::new(false));
        let observed = Rc::clone(&seen);
        let take = move |input: Stream, args: Args| -> Result<Stream> {
            observed.set(true);
            let count = usize::try_from(args.positional()[0].try_int()?)
                .map_err(|_| Error::failed("negative count"))?;
            assert!(args.keyword("func").is_some());
            assert_eq!(args.keyword("pred"), Some(&Value::from("explicit")));
            Ok(Stream::new(input.take(count)))
        };
        let config = StageConfig::new()
            .arg(2)
            .func(add())
            .pred(add())
            .kwarg("pred", "explicit");
        let stage = as_func(Operator::custom(take), config).unwrap();

        let stream = pipe(ints(&[1, 2, 3]), &[stage]).unwrap();
        assert!(!seen.get());
        assert_eq!(collect(stream).unwrap(), ints(&[1, 2]));
        assert!(seen.get());
    }

    #[rstest]
    fn test_custom_failure_is_yielded() {
        let failing = |_: Stream, _: Args| -> Result<Stream> { Err(Error::failed("nope")) };
        let stage = as_func(Operator::custom(failing), StageConfig::new()).unwrap();

        assert_eq!(
            collect(stage.apply(Stream::empty())).unwrap_err(),
            Error::failed("nope")
        );
    }

    #[rstest]
    fn test_custom_args_order() {
        let config = StageConfig::new().arg(1).kwarg("step", 2);
        let args = config.custom_args();
        assert_eq!(args, args![1; step = 2]);
    }
}
