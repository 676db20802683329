//! Hashable projection of [`Value`].

use std::rc::Rc;

use super::{Value, exact_integer};
use crate::error::{Error, Result};
use crate::func::Func;

/// The hashable form of a [`Value`].
///
/// Numbers that compare equal project onto equal keys: an integral float
/// becomes [`Key::Int`]. Functions hash by identity. Lists and dicts have no
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Key of `Value::None`.
    None,
    /// Key of a boolean.
    Bool(bool),
    /// Key of an integer or an integral float.
    Int(i64),
    /// Bit pattern of a non-integral float.
    Float(u64),
    /// Key of a string.
    Str(Rc<str>),
    /// Key of a tuple whose items are all hashable.
    Tuple(Box<[Self]>),
    /// Identity of a function.
    Func(Func),
}

impl Key {
    fn from_float(number: f64) -> Self {
        exact_integer(number).map_or_else(|| Self::Float(number.to_bits()), Self::Int)
    }
}

impl TryFrom<&Value> for Key {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::None => Ok(Self::None),
            Value::Bool(flag) => Ok(Self::Bool(*flag)),
            Value::Int(number) => Ok(Self::Int(*number)),
            Value::Float(number) => Ok(Self::from_float(*number)),
            Value::Str(text) => Ok(Self::Str(Rc::clone(text))),
            Value::Tuple(items) => items
                .iter()
                .map(Self::try_from)
                .collect::<Result<Box<[_]>>>()
                .map(Self::Tuple),
            Value::Func(function) => Ok(Self::Func(function.clone())),
            Value::List(_) | Value::Dict(_) => Err(Error::Unhashable {
                type_name: value.type_name(),
            }),
        }
    }
}
