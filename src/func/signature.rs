//! Declared parameter lists and argument binding.
//!
//! A [`Signature`] is an ordered list of [`Parameter`]s, each with a name, a
//! [`ParameterKind`], an optional plain default, and optional [`Marker`]s.
//! It is built once, when a function is declared, and consumed on every call
//! to produce a [`BoundArguments`].

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use super::args::Args;
use super::marker::Marker;
use crate::error::{Error, Result};
use crate::value::Value;

/// How a parameter may be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Only by position.
    PositionalOnly,
    /// By position or by keyword.
    PositionalOrKeyword,
    /// Only by keyword.
    KeywordOnly,
}

impl ParameterKind {
    /// Returns `true` if the parameter can be filled by a positional argument.
    pub const fn accepts_positional(self) -> bool {
        matches!(self, Self::PositionalOnly | Self::PositionalOrKeyword)
    }

    /// Returns `true` if the parameter can be filled by a keyword argument.
    pub const fn accepts_keyword(self) -> bool {
        matches!(self, Self::PositionalOrKeyword | Self::KeywordOnly)
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::PositionalOnly => "positional-only",
            Self::PositionalOrKeyword => "positional-or-keyword",
            Self::KeywordOnly => "keyword-only",
        })
    }
}

/// One declared parameter.
///
/// # Examples
///
/// ```rust
/// use callkit::{Isolated, Parameter, ParameterKind};
///
/// let parameter = Parameter::keyword_only("config").with_marker(Isolated);
///
/// assert_eq!(parameter.name(), "config");
/// assert_eq!(parameter.kind(), ParameterKind::KeywordOnly);
/// assert!(parameter.default().is_none());
/// assert_eq!(parameter.markers().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Parameter {
    name: Rc<str>,
    kind: ParameterKind,
    default: Option<Value>,
    markers: SmallVec<[Marker; 1]>,
}

impl Parameter {
    /// Creates a parameter of the given kind, without default or markers.
    pub fn new(name: &str, kind: ParameterKind) -> Self {
        Self {
            name: Rc::from(name),
            kind,
            default: None,
            markers: SmallVec::new(),
        }
    }

    /// Creates a positional-only parameter.
    pub fn positional_only(name: &str) -> Self {
        Self::new(name, ParameterKind::PositionalOnly)
    }

    /// Creates a positional-or-keyword parameter.
    pub fn positional_or_keyword(name: &str) -> Self {
        Self::new(name, ParameterKind::PositionalOrKeyword)
    }

    /// Creates a keyword-only parameter.
    pub fn keyword_only(name: &str) -> Self {
        Self::new(name, ParameterKind::KeywordOnly)
    }

    /// Sets the plain default value.
    ///
    /// Plain defaults are shared between calls like any other `Value`, so a
    /// mutable default (list or dict) keeps mutations made by earlier calls
    /// unless the parameter is also `Isolated`.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attaches a marker. Markers only take effect under `smart_args`.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter kind.
    pub const fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// The plain default, if any.
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The attached markers, in attachment order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns `true` if the parameter has neither a plain default nor a
    /// marker, so every call must supply it.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && self.markers.is_empty()
    }
}

/// An ordered parameter list.
///
/// # Examples
///
/// ```rust
/// use callkit::{Parameter, Signature};
///
/// let signature = Signature::new()
///     .with(Parameter::positional_or_keyword("a"))
///     .with(Parameter::positional_or_keyword("b").with_default(10));
///
/// assert_eq!(signature.len(), 2);
/// assert_eq!(signature.position("b"), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// The parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Index of the parameter called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|parameter| parameter.name() == name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns `true` if the signature declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Binds `args` against the signature and applies plain defaults.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TooManyPositional`], [`Error::UnexpectedKeyword`],
    /// [`Error::DuplicateArgument`] or [`Error::MissingArgument`].
    pub fn bind(self: &Rc<Self>, function: &str, args: Args) -> Result<BoundArguments> {
        let mut bound = self.bind_explicit(function, args)?;
        bound.apply_defaults();
        bound.ensure_complete()?;
        Ok(bound)
    }

    /// Binds only the arguments actually passed; parameters that were not
    /// passed stay unbound.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TooManyPositional`], [`Error::UnexpectedKeyword`]
    /// or [`Error::DuplicateArgument`].
    pub fn bind_explicit(self: &Rc<Self>, function: &str, args: Args) -> Result<BoundArguments> {
        let (positional, keywords) = args.into_parts();
        let mut slots: Vec<Option<Value>> = vec![None; self.parameters.len()];

        let capacity = self
            .parameters
            .iter()
            .filter(|parameter| parameter.kind.accepts_positional())
            .count();
        if positional.len() > capacity {
            return Err(Error::TooManyPositional {
                function: function.to_string(),
                expected: capacity,
                actual: positional.len(),
            });
        }

        let positional_slots = self
            .parameters
            .iter()
            .enumerate()
            .filter(|(_, parameter)| parameter.kind.accepts_positional())
            .map(|(index, _)| index);
        for (index, value) in positional_slots.zip(positional) {
            slots[index] = Some(value);
        }

        for (keyword, value) in keywords {
            let index = self
                .position(&keyword)
                .filter(|&index| self.parameters[index].kind.accepts_keyword())
                .ok_or_else(|| Error::UnexpectedKeyword {
                    function: function.to_string(),
                    keyword: keyword.to_string(),
                })?;
            if slots[index].is_some() {
                return Err(Error::DuplicateArgument {
                    function: function.to_string(),
                    parameter: keyword.to_string(),
                });
            }
            slots[index] = Some(value);
        }

        let explicit = slots.iter().map(Option::is_some).collect();
        Ok(BoundArguments {
            function: Rc::from(function),
            signature: Rc::clone(self),
            slots,
            explicit,
        })
    }
}

impl FromIterator<Parameter> for Signature {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iterator: I) -> Self {
        Self {
            parameters: iterator.into_iter().collect(),
        }
    }
}

/// The per-call binding of parameter name to value.
///
/// Created fresh on every call; never shared between calls.
#[derive(Debug, Clone)]
pub struct BoundArguments {
    function: Rc<str>,
    signature: Rc<Signature>,
    slots: Vec<Option<Value>>,
    explicit: Vec<bool>,
}

impl BoundArguments {
    /// The signature this binding was made against.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The bound value of parameter `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.signature
            .position(name)
            .and_then(|index| self.slots[index].as_ref())
    }

    /// The bound value of parameter `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgument`] if the parameter is unbound or
    /// not declared.
    pub fn arg(&self, name: &str) -> Result<Value> {
        self.get(name).cloned().ok_or_else(|| Error::MissingArgument {
            function: self.function.to_string(),
            parameter: name.to_string(),
        })
    }

    /// Returns `true` if the caller supplied parameter `name` explicitly.
    pub fn is_explicit(&self, name: &str) -> bool {
        self.signature
            .position(name)
            .is_some_and(|index| self.explicit[index])
    }

    /// Iterates over `(name, value)` for every bound parameter.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.signature
            .parameters
            .iter()
            .zip(&self.slots)
            .filter_map(|(parameter, slot)| slot.as_ref().map(|value| (parameter.name(), value)))
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Option<Value> {
        &mut self.slots[index]
    }

    pub(crate) fn is_explicit_at(&self, index: usize) -> bool {
        self.explicit[index]
    }

    /// Fills unbound parameters from their plain defaults.
    pub fn apply_defaults(&mut self) {
        for (parameter, slot) in self.signature.parameters.iter().zip(&mut self.slots) {
            if slot.is_none() {
                slot.clone_from(&parameter.default);
            }
        }
    }

    /// Checks that every parameter is bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgument`] naming the first unbound parameter.
    pub fn ensure_complete(&self) -> Result<()> {
        self.signature
            .parameters
            .iter()
            .zip(&self.slots)
            .find(|(_, slot)| slot.is_none())
            .map_or(Ok(()), |(parameter, _)| {
                Err(Error::MissingArgument {
                    function: self.function.to_string(),
                    parameter: parameter.name().to_string(),
                })
            })
    }

    /// Re-expresses the binding as call arguments.
    ///
    /// Positional-capable parameters become positional arguments until the
    /// first unbound one; after that gap, positional-or-keyword parameters are
    /// passed by keyword. Keyword-only parameters are always keywords.
    pub fn into_args(self) -> Args {
        let mut args = Args::new();
        let mut gap = false;
        for (parameter, slot) in self.signature.parameters.iter().zip(self.slots) {
            let Some(value) = slot else {
                gap |= parameter.kind.accepts_positional();
                continue;
            };
            match parameter.kind {
                ParameterKind::PositionalOnly => args.push(value),
                ParameterKind::PositionalOrKeyword if !gap => args.push(value),
                ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly => {
                    args.set_keyword(parameter.name(), value);
                }
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use rstest::{fixture, rstest};

    #[fixture]
    fn signature() -> Rc<Signature> {
        Rc::new(
            Signature::new()
                .with(Parameter::positional_only("a"))
                .with(Parameter::positional_or_keyword("b").with_default(10))
                .with(Parameter::keyword_only("c").with_default("c")),
        )
    }

    #[rstest]
    fn test_bind_applies_defaults(signature: Rc<Signature>) {
        let bound = signature.bind("f", args![1]).unwrap();

        assert_eq!(bound.get("a"), Some(&Value::from(1)));
        assert_eq!(bound.get("b"), Some(&Value::from(10)));
        assert_eq!(bound.get("c"), Some(&Value::from("c")));
        assert!(bound.is_explicit("a"));
        assert!(!bound.is_explicit("b"));
    }

    #[rstest]
    fn test_bind_accepts_keywords_in_any_order(signature: Rc<Signature>) {
        let bound = signature.bind("f", args![1; c = 3, b = 2]).unwrap();

        assert_eq!(bound.arg("b").unwrap(), Value::from(2));
        assert_eq!(bound.arg("c").unwrap(), Value::from(3));
    }

    #[rstest]
    fn test_too_many_positional(signature: Rc<Signature>) {
        let error = signature.bind("f", args![1, 2, 3]).unwrap_err();
        assert_eq!(
            error,
            Error::TooManyPositional {
                function: "f".to_string(),
                expected: 2,
                actual: 3,
            }
        );
    }

    #[rstest]
    fn test_positional_only_rejects_keyword(signature: Rc<Signature>) {
        let error = signature.bind("f", args![; a = 1]).unwrap_err();
        assert!(matches!(error, Error::UnexpectedKeyword { keyword, .. } if keyword == "a"));
    }

    #[rstest]
    fn test_duplicate_argument(signature: Rc<Signature>) {
        let error = signature.bind("f", args![1, 2; b = 3]).unwrap_err();
        assert!(matches!(error, Error::DuplicateArgument { parameter, .. } if parameter == "b"));
    }

    #[rstest]
    fn test_missing_argument(signature: Rc<Signature>) {
        let error = signature.bind("f", args![; b = 3]).unwrap_err();
        assert!(matches!(error, Error::MissingArgument { parameter, .. } if parameter == "a"));
    }

    #[rstest]
    fn test_into_args_round_trips(signature: Rc<Signature>) {
        let args = signature.bind("f", args![1; c = 3]).unwrap().into_args();

        assert_eq!(args.positional(), &[Value::from(1), Value::from(10)]);
        assert_eq!(args.keyword("c"), Some(&Value::from(3)));
    }

    #[rstest]
    fn test_into_args_after_gap_uses_keywords() {
        let signature = Rc::new(
            Signature::new()
                .with(Parameter::positional_or_keyword("a"))
                .with(Parameter::positional_or_keyword("b")),
        );
        let args = signature.bind_explicit("f", args![; b = 2]).unwrap().into_args();

        assert!(args.positional().is_empty());
        assert_eq!(args.keyword("b"), Some(&Value::from(2)));
    }
}
