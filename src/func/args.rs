//! The calling convention: positional values plus keyword pairs.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::value::Value;

/// Arguments of one call.
///
/// Keyword names are unique: setting a keyword that is already present
/// replaces its value.
///
/// # Examples
///
/// ```rust
/// use callkit::{Args, Value, args};
///
/// let built = Args::new().arg(1).arg(2).kwarg("scale", 10);
/// let literal = args![1, 2; scale = 10];
///
/// assert_eq!(built, literal);
/// assert_eq!(built.positional(), &[Value::from(1), Value::from(2)]);
/// assert_eq!(built.keyword("scale"), Some(&Value::from(10)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    positional: SmallVec<[Value; 4]>,
    keywords: Vec<(Rc<str>, Value)>,
}

impl Args {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a keyword argument.
    #[must_use]
    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_keyword(name, value.into());
        self
    }

    /// Appends a positional argument in place.
    pub fn push(&mut self, value: Value) {
        self.positional.push(value);
    }

    /// Sets a keyword argument in place, replacing an existing one.
    pub fn set_keyword(&mut self, name: &str, value: Value) {
        match self.keywords.iter_mut().find(|(key, _)| &**key == name) {
            Some((_, slot)) => *slot = value,
            None => self.keywords.push((Rc::from(name), value)),
        }
    }

    /// The positional arguments in call order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// The keyword arguments in call order.
    pub fn keywords(&self) -> &[(Rc<str>, Value)] {
        &self.keywords
    }

    /// Looks up a keyword argument.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| value)
    }

    /// Total number of arguments.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    /// Returns `true` if there are no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Splits into positional values and keyword pairs.
    pub fn into_parts(self) -> (SmallVec<[Value; 4]>, Vec<(Rc<str>, Value)>) {
        (self.positional, self.keywords)
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iterator: I) -> Self {
        Self {
            positional: iterator.into_iter().collect(),
            keywords: Vec::new(),
        }
    }
}

/// Builds [`Args`] from positional expressions and `name = value` keywords.
///
/// Keywords follow a `;`. Every expression is converted with
/// `Value::from`.
///
/// # Examples
///
/// ```rust
/// use callkit::args;
///
/// let empty = args![];
/// let positional = args![1, "two"];
/// let keywords = args![; verbose = true];
/// let mixed = args![1; step = 2];
///
/// assert!(empty.is_empty());
/// assert_eq!(positional.len(), 2);
/// assert_eq!(keywords.keywords().len(), 1);
/// assert_eq!(mixed.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($positional:expr),+ $(,)?) => {
        $crate::Args::new()$(.arg($crate::Value::from($positional)))+
    };
    ($($positional:expr),* ; $($name:ident = $value:expr),+ $(,)?) => {
        $crate::Args::new()
            $(.arg($crate::Value::from($positional)))*
            $(.kwarg(stringify!($name), $crate::Value::from($value)))+
    };
}
