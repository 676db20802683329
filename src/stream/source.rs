//! Stream sources.

use super::Stream;
use crate::error::Error;
use crate::value::Value;

/// Yields `i * i` for every `i` in `start..=finish`, lazily.
///
/// The stream is empty when `start > finish`. A square that overflows `i64`
/// is yielded as a failure.
///
/// # Examples
///
/// ```rust
/// use callkit::stream::{collect, squares};
/// use callkit::Value;
///
/// assert_eq!(
///     collect(squares(1, 3)).unwrap(),
///     vec![Value::from(1), Value::from(4), Value::from(9)]
/// );
/// assert!(collect(squares(2, 1)).unwrap().is_empty());
/// ```
pub fn squares(start: i64, finish: i64) -> Stream {
    Stream::new((start..=finish).map(|number| {
        number
            .checked_mul(number)
            .map(Value::from)
            .ok_or_else(|| Error::failed(format!("square of {number} overflows")))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::collect;
    use rstest::rstest;

    #[rstest]
    #[case(1, 3, vec![1, 4, 9])]
    #[case(-2, 1, vec![4, 1, 0, 1])]
    #[case(5, 5, vec![25])]
    #[case(2, 1, vec![])]
    fn test_squares(#[case] start: i64, #[case] finish: i64, #[case] expected: Vec<i64>) {
        let expected: Vec<Value> = expected.into_iter().map(Value::from).collect();
        assert_eq!(collect(squares(start, finish)).unwrap(), expected);
    }

    #[rstest]
    fn test_overflow_is_reported() {
        let mut stream = squares(i64::MAX, i64::MAX);
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
    }
}
