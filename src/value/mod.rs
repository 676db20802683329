//! The dynamic value model.
//!
//! Every callable in this crate takes and returns [`Value`]s, which is what
//! lets currying, pipelines and decorators work for any arity or signature.
//!
//! `Tuple` and `Str` are immutable. `List` and `Dict` are shared,
//! interior-mutable references: cloning a `Value` shares them, so a callee
//! that mutates a list it was given mutates the caller's list too. Use
//! [`Value::deep_copy`] (or an `Isolated` parameter) to break that sharing.
//!
//! # Examples
//!
//! ```rust
//! use callkit::Value;
//!
//! let original = Value::list([Value::from(1), Value::from(2)]);
//! let alias = original.clone();
//! let copy = original.deep_copy();
//!
//! alias.push(Value::from(3)).unwrap();
//! assert_eq!(original.len(), Some(3));
//! assert_eq!(copy.len(), Some(2));
//! ```

mod iter;
mod key;
#[cfg(feature = "serde")]
mod serialize;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::func::Func;

pub use iter::ValueIter;
pub use key::Key;

/// Shared storage behind [`Value::List`].
pub type ListRef = Rc<RefCell<Vec<Value>>>;

/// Shared storage behind [`Value::Dict`].
pub type DictRef = Rc<RefCell<BTreeMap<String, Value>>>;

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    None,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// An immutable, fixed-length sequence.
    Tuple(Rc<[Self]>),
    /// A shared, mutable sequence.
    List(ListRef),
    /// A shared, mutable string-keyed mapping.
    Dict(DictRef),
    /// A callable.
    Func(Func),
}

static_assertions::assert_not_impl_any!(Value: Send, Sync);

impl Value {
    /// Creates a string value.
    pub fn str(text: impl AsRef<str>) -> Self {
        Self::Str(Rc::from(text.as_ref()))
    }

    /// Creates a tuple from the given items.
    pub fn tuple(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// Creates a new list holding the given items.
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Creates a new dict holding the given entries.
    pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Dict(Rc::new(RefCell::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )))
    }

    /// Name of the variant, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Func(_) => "function",
        }
    }

    /// Returns `true` for `None`.
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Truthiness: `None`, `false`, zero, and empty strings or collections
    /// are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(flag) => *flag,
            Self::Int(number) => *number != 0,
            Self::Float(number) => *number != 0.0,
            Self::Str(text) => !text.is_empty(),
            Self::Tuple(items) => !items.is_empty(),
            Self::List(items) => !items.borrow().is_empty(),
            Self::Dict(entries) => !entries.borrow().is_empty(),
            Self::Func(_) => true,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the number as a float if this is an `Int` or a `Float`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(number) => Some(*number as f64),
            Self::Float(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the string slice if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the items if this is a `Tuple`.
    pub fn as_tuple(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the function if this is a `Func`.
    pub const fn as_func(&self) -> Option<&Func> {
        match self {
            Self::Func(function) => Some(function),
            _ => None,
        }
    }

    /// Like [`as_int`](Self::as_int), failing with [`Error::TypeMismatch`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not an `Int`.
    pub fn try_int(&self) -> Result<i64> {
        self.as_int().ok_or_else(|| self.mismatch("int"))
    }

    /// Like [`as_float`](Self::as_float), failing with [`Error::TypeMismatch`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not a number.
    pub fn try_float(&self) -> Result<f64> {
        self.as_float().ok_or_else(|| self.mismatch("float"))
    }

    /// Like [`as_str`](Self::as_str), failing with [`Error::TypeMismatch`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not a `Str`.
    pub fn try_str(&self) -> Result<&str> {
        match self {
            Self::Str(text) => Ok(text),
            other => Err(other.mismatch("str")),
        }
    }

    /// Like [`as_func`](Self::as_func), failing with [`Error::NotCallable`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotCallable`] if the value is not a `Func`.
    pub fn try_func(&self) -> Result<&Func> {
        self.as_func().ok_or(Error::NotCallable {
            type_name: self.type_name(),
        })
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    /// Number of items in a string, tuple, list or dict.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Str(text) => Some(text.chars().count()),
            Self::Tuple(items) => Some(items.len()),
            Self::List(items) => Some(items.borrow().len()),
            Self::Dict(entries) => Some(entries.borrow().len()),
            _ => None,
        }
    }

    /// Returns `Some(true)` for empty collections and `None` for scalars.
    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|length| length == 0)
    }

    /// Appends to a list in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not a `List`.
    pub fn push(&self, item: Self) -> Result<()> {
        match self {
            Self::List(items) => {
                items.borrow_mut().push(item);
                Ok(())
            }
            other => Err(other.mismatch("list")),
        }
    }

    /// Returns the item at `index` of a tuple or list.
    pub fn index(&self, index: usize) -> Option<Self> {
        match self {
            Self::Tuple(items) => items.get(index).cloned(),
            Self::List(items) => items.borrow().get(index).cloned(),
            _ => None,
        }
    }

    /// Looks up `key` in a dict.
    pub fn get(&self, key: &str) -> Option<Self> {
        match self {
            Self::Dict(entries) => entries.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Inserts into a dict in place, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value is not a `Dict`.
    pub fn insert(&self, key: impl Into<String>, value: Self) -> Result<Option<Self>> {
        match self {
            Self::Dict(entries) => Ok(entries.borrow_mut().insert(key.into(), value)),
            other => Err(other.mismatch("dict")),
        }
    }

    /// Returns a structurally independent copy.
    ///
    /// Lists and dicts are copied recursively; aliasing inside the copied
    /// structure is preserved (two references to one list in the original
    /// become two references to one new list), and reference cycles are
    /// reproduced instead of recursing forever. Functions are shared.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use callkit::Value;
    ///
    /// let inner = Value::dict([("value", Value::from(1))]);
    /// let outer = Value::dict([("nested", inner.clone())]);
    ///
    /// let copy = outer.deep_copy();
    /// copy.get("nested").unwrap().insert("value", Value::from(999)).unwrap();
    ///
    /// assert_eq!(inner.get("value"), Some(Value::from(1)));
    /// ```
    pub fn deep_copy(&self) -> Self {
        self.deep_copy_with(&mut HashMap::new())
    }

    fn deep_copy_with(&self, copies: &mut HashMap<usize, Self>) -> Self {
        match self {
            Self::Tuple(items) => Self::Tuple(
                items
                    .iter()
                    .map(|item| item.deep_copy_with(copies))
                    .collect(),
            ),
            Self::List(items) => {
                let key = address(items);
                if let Some(copy) = copies.get(&key) {
                    return copy.clone();
                }
                let target: ListRef = Rc::new(RefCell::new(Vec::new()));
                copies.insert(key, Self::List(Rc::clone(&target)));
                let snapshot = items.borrow().clone();
                let copied: Vec<Self> = snapshot
                    .iter()
                    .map(|item| item.deep_copy_with(copies))
                    .collect();
                *target.borrow_mut() = copied;
                Self::List(target)
            }
            Self::Dict(entries) => {
                let key = address(entries);
                if let Some(copy) = copies.get(&key) {
                    return copy.clone();
                }
                let target: DictRef = Rc::new(RefCell::new(BTreeMap::new()));
                copies.insert(key, Self::Dict(Rc::clone(&target)));
                let snapshot = entries.borrow().clone();
                let copied: BTreeMap<String, Self> = snapshot
                    .iter()
                    .map(|(key, value)| (key.clone(), value.deep_copy_with(copies)))
                    .collect();
                *target.borrow_mut() = copied;
                Self::Dict(target)
            }
            scalar => scalar.clone(),
        }
    }

    /// Returns `true` if both values are the same shared list, dict or
    /// function.
    pub fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(left), Self::List(right)) => Rc::ptr_eq(left, right),
            (Self::Dict(left), Self::Dict(right)) => Rc::ptr_eq(left, right),
            (Self::Func(left), Self::Func(right)) => left == right,
            _ => false,
        }
    }

    /// Projects the value onto its hashable [`Key`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unhashable`] for lists and dicts, including ones
    /// nested inside tuples.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use callkit::{Key, Value};
    ///
    /// assert_eq!(Value::from(2.0).to_key().unwrap(), Key::Int(2));
    /// assert!(Value::list([]).to_key().is_err());
    /// ```
    pub fn to_key(&self) -> Result<Key> {
        Key::try_from(self)
    }

    /// Iterates the items of a string (one-character strings), tuple, list or
    /// the keys of a dict.
    ///
    /// List iteration is live: items appended while iterating are visited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotIterable`] for every other variant.
    pub fn iter(&self) -> Result<ValueIter> {
        ValueIter::new(self)
    }
}

/// Returns the integer a float equals exactly, if there is one.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
pub(crate) fn exact_integer(number: f64) -> Option<i64> {
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then(|| number as i64)
}

fn address<T: ?Sized>(shared: &Rc<T>) -> usize {
    Rc::as_ptr(shared).cast::<()>() as usize
}

impl Value {
    /// Structural equality that treats a pair of containers already under
    /// comparison as equal, so cyclic values terminate.
    fn eq_with(&self, other: &Self, open: &mut Vec<(usize, usize)>) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Int(left), Self::Float(right)) | (Self::Float(right), Self::Int(left)) => {
                exact_integer(*right) == Some(*left)
            }
            (Self::Str(left), Self::Str(right)) => left == right,
            (Self::Tuple(left), Self::Tuple(right)) => {
                left.len() == right.len()
                    && left
                        .iter()
                        .zip(right.iter())
                        .all(|(left, right)| left.eq_with(right, open))
            }
            (Self::List(left), Self::List(right)) => {
                if Rc::ptr_eq(left, right) {
                    return true;
                }
                let pair = (address(left), address(right));
                if open.contains(&pair) {
                    return true;
                }
                let (Ok(left), Ok(right)) = (left.try_borrow(), right.try_borrow()) else {
                    return false;
                };
                open.push(pair);
                let equal = left.len() == right.len()
                    && left
                        .iter()
                        .zip(right.iter())
                        .all(|(left, right)| left.eq_with(right, open));
                open.pop();
                equal
            }
            (Self::Dict(left), Self::Dict(right)) => {
                if Rc::ptr_eq(left, right) {
                    return true;
                }
                let pair = (address(left), address(right));
                if open.contains(&pair) {
                    return true;
                }
                let (Ok(left), Ok(right)) = (left.try_borrow(), right.try_borrow()) else {
                    return false;
                };
                open.push(pair);
                let equal = left.len() == right.len()
                    && left.iter().zip(right.iter()).all(|((lk, lv), (rk, rv))| {
                        lk == rk && lv.eq_with(rv, open)
                    });
                open.pop();
                equal
            }
            (Self::Func(left), Self::Func(right)) => left == right,
            _ => false,
        }
    }

    /// Writes the repr form, printing `[...]` / `{...}` for a container that
    /// is already open higher up.
    fn write_repr(
        &self,
        formatter: &mut fmt::Formatter<'_>,
        open: &mut Vec<usize>,
    ) -> fmt::Result {
        fn join(
            formatter: &mut fmt::Formatter<'_>,
            items: &[Value],
            open: &mut Vec<usize>,
        ) -> fmt::Result {
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    formatter.write_str(", ")?;
                }
                item.write_repr(formatter, open)?;
            }
            Ok(())
        }

        match self {
            Self::None => formatter.write_str("None"),
            Self::Bool(true) => formatter.write_str("True"),
            Self::Bool(false) => formatter.write_str("False"),
            Self::Int(number) => write!(formatter, "{number}"),
            Self::Float(number) => write!(formatter, "{number:?}"),
            Self::Str(text) => write!(formatter, "'{text}'"),
            Self::Tuple(items) => {
                formatter.write_str("(")?;
                join(formatter, items, open)?;
                if items.len() == 1 {
                    formatter.write_str(",")?;
                }
                formatter.write_str(")")
            }
            Self::List(items) => {
                let key = address(items);
                let borrowed = match items.try_borrow() {
                    Ok(borrowed) if !open.contains(&key) => borrowed,
                    _ => return formatter.write_str("[...]"),
                };
                open.push(key);
                formatter.write_str("[")?;
                join(formatter, &borrowed, open)?;
                open.pop();
                formatter.write_str("]")
            }
            Self::Dict(entries) => {
                let key = address(entries);
                let borrowed = match entries.try_borrow() {
                    Ok(borrowed) if !open.contains(&key) => borrowed,
                    _ => return formatter.write_str("{...}"),
                };
                open.push(key);
                formatter.write_str("{")?;
                for (index, (name, value)) in borrowed.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "'{name}': ")?;
                    value.write_repr(formatter, open)?;
                }
                open.pop();
                formatter.write_str("}")
            }
            Self::Func(function) => write!(formatter, "<function {}>", function.name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, formatter)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_repr(formatter, &mut Vec::new())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Int(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Int(i64::from(number))
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::str(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Str(Rc::from(text))
    }
}

impl From<Func> for Value {
    fn from(function: Func) -> Self {
        Self::Func(function)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(items)))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}
