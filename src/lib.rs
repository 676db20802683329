//! # callkit
//!
//! Higher-order utilities over dynamically typed callables: currying,
//! lazy stream pipelines, bounded memoization and call-time argument
//! policies.
//!
//! ## Overview
//!
//! Every utility works on [`Func`], a shareable callable taking [`Args`]
//! (positional values plus keyword pairs) and returning a [`Value`]. A
//! function may declare a [`Signature`]; argument-aware decorators read it
//! instead of reflecting on the function at runtime.
//!
//! - **Currying**: `curry` / `uncurry` with a runtime arity
//! - **Streams**: `as_func` / `pipe` / `collect` over lazy [`stream::Stream`]s
//! - **Caching**: `cache_func` with a bounded FIFO store
//! - **Smart arguments**: `smart_args` with `Isolated` and `Evaluated` markers
//!
//! ## Feature Flags
//!
//! - `curry`: Currying and uncurrying
//! - `stream`: Stream stages and pipelines
//! - `cache`: Bounded memoization
//! - `smart`: Argument markers
//! - `full`: Enable all features
//! - `serde`: `Serialize` for [`Value`]
//! - `fxhash` / `ahash`: Faster hasher for the cache store
//!
//! ## Example
//!
//! ```rust
//! use callkit::prelude::*;
//!
//! let add = Func::binary("add", |left, right| Ok(Value::from(left.try_int()? + right.try_int()?)));
//! let add = cache_func(add, 32);
//!
//! let add_one = curry(add, 2).unwrap().call1(Value::from(1)).unwrap();
//! assert_eq!(add_one.try_func().unwrap().call1(Value::from(2)).unwrap(), Value::from(3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types, traits and functions.
///
/// # Usage
///
/// ```rust
/// use callkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::args;
    pub use crate::error::{Error, Result};
    pub use crate::func::{Args, Decorator, Func, Parameter, ParameterKind, Signature};
    pub use crate::value::{Key, Value};

    #[cfg(feature = "curry")]
    pub use crate::curry::{curry, uncurry};

    #[cfg(feature = "stream")]
    pub use crate::stream::{Operator, Stage, StageConfig, Stream, as_func, collect, pipe, squares};

    #[cfg(feature = "cache")]
    pub use crate::cache::{CacheFunc, cache_func, cache_keys};

    #[cfg(feature = "smart")]
    pub use crate::smart::{Evaluated, Isolated, SmartArgs, smart_args};
}

pub mod error;
pub mod func;
pub mod value;

#[cfg(feature = "curry")]
pub mod curry;

#[cfg(feature = "stream")]
pub mod stream;

#[cfg(feature = "cache")]
pub mod cache;

#[cfg(feature = "smart")]
pub mod smart;

pub use error::{Error, Result};
pub use func::{
    Args, BoundArguments, Decorator, Evaluated, Func, Isolated, Marker, Parameter, ParameterKind,
    Signature,
};
pub use value::{Key, Value};
