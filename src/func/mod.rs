//! Callables with an explicit calling convention.
//!
//! A [`Func`] is a reference-counted callable taking [`Args`] and returning
//! a [`Value`]. It may carry a declared [`Signature`], which is what the
//! argument-aware decorators inspect instead of runtime reflection.
//!
//! # Examples
//!
//! ```rust
//! use callkit::{Func, Parameter, Signature, Value, args};
//!
//! let signature = Signature::new()
//!     .with(Parameter::positional_or_keyword("base"))
//!     .with(Parameter::keyword_only("step").with_default(1));
//!
//! let advance = Func::declared("advance", signature, |bound| {
//!     Ok(Value::from(bound.arg("base")?.try_int()? + bound.arg("step")?.try_int()?))
//! });
//!
//! assert_eq!(advance.call(args![10]).unwrap(), Value::from(11));
//! assert_eq!(advance.call(args![10; step = 5]).unwrap(), Value::from(15));
//! ```

mod args;
mod marker;
mod signature;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::Result;
use crate::value::Value;

pub use args::Args;
pub use marker::{Evaluated, Isolated, Marker};
pub use signature::{BoundArguments, Parameter, ParameterKind, Signature};

type Body = dyn Fn(Args) -> Result<Value>;

struct Inner {
    name: Rc<str>,
    signature: Option<Rc<Signature>>,
    body: Box<Body>,
}

/// A shareable callable.
///
/// Cloning is cheap and yields the same function: equality and hashing are
/// by identity.
#[derive(Clone)]
pub struct Func {
    inner: Rc<Inner>,
}

static_assertions::assert_not_impl_any!(Func: Send, Sync);

impl Func {
    /// Creates a function without a declared signature; it receives the raw
    /// [`Args`] of each call.
    pub fn variadic<F>(name: &str, body: F) -> Self
    where
        F: Fn(Args) -> Result<Value> + 'static,
    {
        Self::from_parts(Rc::from(name), None, body)
    }

    /// Creates a function with a declared signature. Each call is bound
    /// against the signature (plain defaults applied) before `body` runs.
    pub fn declared<F>(name: &str, signature: Signature, body: F) -> Self
    where
        F: Fn(BoundArguments) -> Result<Value> + 'static,
    {
        let name: Rc<str> = Rc::from(name);
        let signature = Rc::new(signature);
        let binding_name = Rc::clone(&name);
        let binding = Rc::clone(&signature);
        Self::from_parts(name, Some(signature), move |args| {
            body(binding.bind(&binding_name, args)?)
        })
    }

    /// Creates a function taking no arguments.
    pub fn nullary<F>(name: &str, body: F) -> Self
    where
        F: Fn() -> Result<Value> + 'static,
    {
        Self::declared(name, Signature::new(), move |_| body())
    }

    /// Creates a function taking one positional-or-keyword argument `value`.
    pub fn unary<F>(name: &str, body: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + 'static,
    {
        let signature = Signature::new().with(Parameter::positional_or_keyword("value"));
        Self::declared(name, signature, move |bound| body(bound.arg("value")?))
    }

    /// Creates a function taking two positional-or-keyword arguments `left`
    /// and `right`.
    pub fn binary<F>(name: &str, body: F) -> Self
    where
        F: Fn(Value, Value) -> Result<Value> + 'static,
    {
        let signature = Signature::new()
            .with(Parameter::positional_or_keyword("left"))
            .with(Parameter::positional_or_keyword("right"));
        Self::declared(name, signature, move |bound| {
            body(bound.arg("left")?, bound.arg("right")?)
        })
    }

    /// Creates a wrapper that keeps `wrapped`'s name and signature but runs
    /// `body` on each call. Decorators build their result with this.
    pub fn wrapping<F>(wrapped: &Self, body: F) -> Self
    where
        F: Fn(Args) -> Result<Value> + 'static,
    {
        Self::from_parts(
            Rc::clone(&wrapped.inner.name),
            wrapped.inner.signature.clone(),
            body,
        )
    }

    fn from_parts<F>(name: Rc<str>, signature: Option<Rc<Signature>>, body: F) -> Self
    where
        F: Fn(Args) -> Result<Value> + 'static,
    {
        Self {
            inner: Rc::new(Inner {
                name,
                signature,
                body: Box::new(body),
            }),
        }
    }

    /// The function name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The declared signature, if any.
    pub fn signature(&self) -> Option<&Signature> {
        self.inner.signature.as_deref()
    }

    pub(crate) fn shared_signature(&self) -> Option<Rc<Signature>> {
        self.inner.signature.clone()
    }

    /// Calls the function.
    ///
    /// # Errors
    ///
    /// Propagates binding errors and whatever the body returns.
    pub fn call(&self, args: Args) -> Result<Value> {
        (self.inner.body)(args)
    }

    /// Calls the function without arguments.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn call0(&self) -> Result<Value> {
        self.call(Args::new())
    }

    /// Calls the function with one positional argument.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn call1(&self, argument: Value) -> Result<Value> {
        self.call(Args::new().arg(argument))
    }

    /// Calls the function with two positional arguments.
    ///
    /// # Errors
    ///
    /// See [`call`](Self::call).
    pub fn call2(&self, first: Value, second: Value) -> Result<Value> {
        self.call(Args::new().arg(first).arg(second))
    }

    /// Applies a decorator, returning the decorated function.
    ///
    /// Stacking reads inside-out, like decorator syntax read bottom-up:
    /// `f.decorate(&inner)?.decorate(&outer)?`.
    ///
    /// # Errors
    ///
    /// Propagates the decorator's construction-time errors.
    pub fn decorate<D>(self, decorator: &D) -> Result<Self>
    where
        D: Decorator + ?Sized,
    {
        decorator.decorate(self)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Func {}

impl Hash for Func {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Func")
            .field("name", &self.name())
            .field("declared", &self.inner.signature.is_some())
            .finish_non_exhaustive()
    }
}

/// Turns a function into a decorated function.
///
/// Closures `Fn(Func) -> Result<Func>` are decorators too.
pub trait Decorator {
    /// Decorates `func`.
    ///
    /// # Errors
    ///
    /// Reports construction-time contract violations.
    fn decorate(&self, func: Func) -> Result<Func>;
}

impl<F> Decorator for F
where
    F: Fn(Func) -> Result<Func>,
{
    fn decorate(&self, func: Func) -> Result<Func> {
        self(func)
    }
}
