//! Iteration over sequence-like values.

use std::rc::Rc;

use super::{ListRef, Value};
use crate::error::{Error, Result};

/// Iterator over the items of a [`Value`], created by [`Value::iter`].
#[derive(Debug, Clone)]
pub struct ValueIter {
    source: Source,
    position: usize,
}

#[derive(Debug, Clone)]
enum Source {
    Items(Rc<[Value]>),
    List(ListRef),
}

impl ValueIter {
    pub(super) fn new(value: &Value) -> Result<Self> {
        let source = match value {
            Value::Tuple(items) => Source::Items(Rc::clone(items)),
            Value::List(items) => Source::List(Rc::clone(items)),
            Value::Str(text) => Source::Items(text.chars().map(|c| Value::str(c.to_string())).collect()),
            Value::Dict(entries) => {
                Source::Items(entries.borrow().keys().map(Value::str).collect())
            }
            other => {
                return Err(Error::NotIterable {
                    type_name: other.type_name(),
                });
            }
        };
        Ok(Self {
            source,
            position: 0,
        })
    }
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let item = match &self.source {
            Source::Items(items) => items.get(self.position).cloned(),
            Source::List(items) => items.borrow().get(self.position).cloned(),
        }?;
        self.position += 1;
        Some(item)
    }
}
