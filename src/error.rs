//! Error types.
//!
//! The cache hot path never returns errors — misses are `None`, zero
//! capacity discards, and removal is best-effort. The two types here cover
//! the edges of that surface:
//!
//! - [`ConfigError`]: user-supplied construction parameters that make no
//!   sense (a zero admission threshold, a zero aging trigger). Returned by
//!   the fallible `try_with_*` constructors; the infallible constructors
//!   coerce to documented defaults instead.
//! - [`InvariantError`]: an internal bookkeeping contradiction. These are
//!   programmer bugs, not runtime conditions — the debug-build
//!   `debug_validate_invariants` methods panic on them, while
//!   [`ArcCache::check_invariants`](crate::policy::arc::ArcCache::check_invariants)
//!   reports them in this type for release-build tooling.

use std::fmt;

/// Error returned when cache construction parameters are invalid.
///
/// # Example
///
/// ```
/// use polycache::policy::lru_k::LruKCache;
///
/// let err = LruKCache::<u64, u64>::try_with_params(16, 16, 0).unwrap_err();
/// assert!(err.to_string().contains("threshold"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Error describing a violated internal invariant.
///
/// # Example
///
/// ```
/// use polycache::policy::arc::ArcCache;
/// use polycache::traits::CoreCache;
///
/// let mut cache = ArcCache::new(8);
/// cache.insert(1, "a");
/// assert!(cache.check_invariants().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates an `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_and_accessor() {
        let err = ConfigError::new("capacity must be positive");
        assert_eq!(err.to_string(), "capacity must be positive");
        assert_eq!(err.message(), "capacity must be positive");
    }

    #[test]
    fn invariant_error_display_and_accessor() {
        let err = InvariantError::new("index and list disagree");
        assert_eq!(err.to_string(), "index and list disagree");
        assert_eq!(err.message(), "index and list disagree");
    }

    #[test]
    fn both_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
        assert_error::<InvariantError>();
    }

    #[test]
    fn clone_and_eq() {
        let err = ConfigError::new("x");
        assert_eq!(err.clone(), err);
    }
}
