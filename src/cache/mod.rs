//! Bounded memoization.
//!
//! [`cache_func`] wraps a function with a private store of at most `maxsize`
//! results, keyed by the canonical form of the call arguments
//! ([`cache_keys`]). Eviction is first-in-first-out: a hit does not refresh
//! an entry.
//!
//! # Examples
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use callkit::cache::cache_func;
//! use callkit::{Func, Value, args};
//!
//! let calls = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&calls);
//! let add = Func::binary("add", move |left, right| {
//!     counter.set(counter.get() + 1);
//!     Ok(Value::from(left.try_int()? + right.try_int()?))
//! });
//!
//! let cached = cache_func(add, 2);
//! for args in [args![1, 2], args![1, 2], args![3, 4], args![5, 6], args![1, 2]] {
//!     cached.call(args).unwrap();
//! }
//! assert_eq!(calls.get(), 4);
//! ```

mod key;
mod store;

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::func::{Decorator, Func};

pub use key::{CacheKey, cache_keys};
use store::FifoStore;

/// Wraps `func` with a FIFO cache of `maxsize` entries.
///
/// With `maxsize <= 0`, `func` itself is returned. Calls whose arguments have
/// no key (lists, dicts) go straight to `func`. Failed calls are not stored.
/// The wrapper keeps `func`'s name and signature.
pub fn cache_func(func: Func, maxsize: isize) -> Func {
    let capacity = match usize::try_from(maxsize) {
        Ok(capacity) if capacity > 0 => capacity,
        _ => {
            tracing::debug!(function = func.name(), maxsize, "caching disabled");
            return func;
        }
    };
    tracing::debug!(function = func.name(), capacity, "caching enabled");

    let store = Rc::new(RefCell::new(FifoStore::new(capacity)));
    let target = func.clone();
    Func::wrapping(&func, move |args| {
        let key = match cache_keys(&args) {
            Ok(key) => key,
            Err(error) => {
                tracing::trace!(function = target.name(), %error, "cache bypass");
                return target.call(args);
            }
        };

        let cached = store.borrow().get(&key);
        if let Some(value) = cached {
            tracing::trace!(function = target.name(), "cache hit");
            return Ok(value);
        }

        tracing::trace!(function = target.name(), "cache miss");
        let value = target.call(args)?;
        let mut entries = store.borrow_mut();
        if let Some(evicted) = entries.insert(key, value.clone()) {
            tracing::trace!(
                function = target.name(),
                ?evicted,
                size = entries.len(),
                "cache eviction"
            );
        }
        drop(entries);
        Ok(value)
    })
}

/// [`cache_func`] as a [`Decorator`].
///
/// The default (`maxsize` 0) leaves functions undecorated.
///
/// # Examples
///
/// ```rust
/// use callkit::cache::CacheFunc;
/// use callkit::{Func, Value};
///
/// let square = Func::unary("square", |x| Ok(Value::from(x.try_int()? * x.try_int()?)))
///     .decorate(&CacheFunc::new(16))
///     .unwrap();
/// assert_eq!(square.call1(Value::from(4)).unwrap(), Value::from(16));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheFunc {
    maxsize: isize,
}

impl CacheFunc {
    /// A decorator caching up to `maxsize` results.
    pub const fn new(maxsize: isize) -> Self {
        Self { maxsize }
    }

    /// The configured capacity.
    pub const fn maxsize(&self) -> isize {
        self.maxsize
    }
}

impl Decorator for CacheFunc {
    fn decorate(&self, func: Func) -> Result<Func> {
        Ok(cache_func(func, self.maxsize))
    }
}
