//! Shared scalar types.

/// Opaque identifier for a user or an item
///
/// Users and items share the identifier space, but a single vector is always
/// keyed by one kind only.
pub type Id = u64;

/// Score recorded for a candidate whose similarity could not be computed
///
/// This is a literal NaN, so it never compares equal to anything (itself
/// included). Test for it with [`is_undefined`].
pub const UNDEFINED_SCORE: f64 = f64::NAN;

/// Returns `true` if `score` is the undefined sentinel
#[inline]
pub fn is_undefined(score: f64) -> bool {
    score.is_nan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_is_not_zero() {
        assert!(is_undefined(UNDEFINED_SCORE));
        assert!(!is_undefined(0.0));
        assert!(!is_undefined(-1.0));
        assert!(UNDEFINED_SCORE.partial_cmp(&UNDEFINED_SCORE).is_none());
    }
}
