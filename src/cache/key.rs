//! Cache keys derived from call arguments.

use std::rc::Rc;

use crate::error::Result;
use crate::func::Args;
use crate::value::Key;

/// The canonical key of one call: positional keys in order, keyword keys
/// sorted by name.
///
/// Two calls that differ only in keyword order share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    positional: Box<[Key]>,
    keywords: Box<[(Rc<str>, Key)]>,
}

impl CacheKey {
    /// Positional part of the key.
    pub fn positional(&self) -> &[Key] {
        &self.positional
    }

    /// Keyword part of the key, sorted by name.
    pub fn keywords(&self) -> &[(Rc<str>, Key)] {
        &self.keywords
    }
}

/// Computes the canonical cache key of `args`.
///
/// # Errors
///
/// Returns [`Error::Unhashable`](crate::Error::Unhashable) if any positional
/// or keyword value (or an item nested in a tuple) is a list or a dict.
///
/// # Examples
///
/// ```rust
/// use callkit::cache::cache_keys;
/// use callkit::{Value, args};
///
/// let first = cache_keys(&args![1; a = 2, b = 3]).unwrap();
/// let second = cache_keys(&args![1; b = 3, a = 2]).unwrap();
/// assert_eq!(first, second);
///
/// assert!(cache_keys(&args![Value::list([])]).is_err());
/// ```
pub fn cache_keys(args: &Args) -> Result<CacheKey> {
    let positional = args
        .positional()
        .iter()
        .map(Key::try_from)
        .collect::<Result<Box<[_]>>>()?;
    let mut keywords = args
        .keywords()
        .iter()
        .map(|(name, value)| -> Result<(Rc<str>, Key)> {
            Ok((Rc::clone(name), Key::try_from(value)?))
        })
        .collect::<Result<Vec<_>>>()?;
    keywords.sort_by(|(left, _), (right, _)| left.cmp(right));
    Ok(CacheKey {
        positional,
        keywords: keywords.into_boxed_slice(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::error::Error;
    use crate::value::Value;
    use rstest::rstest;

    #[rstest]
    fn test_positional_order_matters() {
        assert_ne!(
            cache_keys(&args![1, 2]).unwrap(),
            cache_keys(&args![2, 1]).unwrap()
        );
    }

    #[rstest]
    fn test_positional_and_keyword_are_distinct() {
        assert_ne!(
            cache_keys(&args![1]).unwrap(),
            cache_keys(&args![; value = 1]).unwrap()
        );
    }

    #[rstest]
    fn test_equal_numbers_share_a_key() {
        assert_eq!(
            cache_keys(&args![1]).unwrap(),
            cache_keys(&args![1.0]).unwrap()
        );
    }

    #[rstest]
    #[case(args![Value::list([])], "list")]
    #[case(args![; options = Value::dict::<&str>([])], "dict")]
    #[case(args![Value::tuple([Value::from(1), Value::list([])])], "list")]
    fn test_unhashable_arguments(#[case] args: Args, #[case] type_name: &'static str) {
        assert_eq!(cache_keys(&args).unwrap_err(), Error::Unhashable { type_name });
    }

    #[rstest]
    fn test_keywords_are_sorted() {
        let key = cache_keys(&args![; z = 1, a = 2]).unwrap();
        let names: Vec<&str> = key.keywords().iter().map(|(name, _)| &**name).collect();
        assert_eq!(names, vec!["a", "z"]);
    }
}
