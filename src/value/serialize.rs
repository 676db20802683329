//! `serde::Serialize` for [`Value`] (requires the `serde` feature).
//!
//! Values serialize as their natural data shape: tuples and lists as
//! sequences, dicts as maps. Functions and self-referential containers have
//! no data form and fail to serialize.

use std::cell::RefCell;
use std::rc::Rc;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::Value;

/// A value paired with the containers currently being serialized above it.
struct Tracked<'a> {
    value: &'a Value,
    open: &'a RefCell<Vec<usize>>,
}

impl Tracked<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> Tracked<'b> {
        Tracked {
            value,
            open: self.open,
        }
    }

    fn enter<E: serde::ser::Error>(&self, address: usize) -> Result<(), E> {
        let mut open = self.open.borrow_mut();
        if open.contains(&address) {
            return Err(E::custom("cyclic value cannot be serialized"));
        }
        open.push(address);
        Ok(())
    }

    fn leave(&self) {
        self.open.borrow_mut().pop();
    }
}

impl Serialize for Tracked<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::None => serializer.serialize_none(),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::Int(number) => serializer.serialize_i64(*number),
            Value::Float(number) => serializer.serialize_f64(*number),
            Value::Str(text) => serializer.serialize_str(text),
            Value::Tuple(items) => {
                let mut sequence = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    sequence.serialize_element(&self.child(item))?;
                }
                sequence.end()
            }
            Value::List(shared) => {
                let items = shared
                    .try_borrow()
                    .map_err(|_| S::Error::custom("list is being mutated"))?;
                self.enter::<S::Error>(Rc::as_ptr(shared).cast::<()>() as usize)?;
                let mut sequence = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    sequence.serialize_element(&self.child(item))?;
                }
                self.leave();
                sequence.end()
            }
            Value::Dict(shared) => {
                let entries = shared
                    .try_borrow()
                    .map_err(|_| S::Error::custom("dict is being mutated"))?;
                self.enter::<S::Error>(Rc::as_ptr(shared).cast::<()>() as usize)?;
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    map.serialize_entry(key, &self.child(value))?;
                }
                self.leave();
                map.end()
            }
            Value::Func(function) => Err(S::Error::custom(format!(
                "function '{}' cannot be serialized",
                function.name()
            ))),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let open = RefCell::new(Vec::new());
        Tracked { value: self, open: &open }.serialize(serializer)
    }
}
