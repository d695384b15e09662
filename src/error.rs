//! Error types for building and training networks.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when building, running or training a network.
///
/// Every failure is detected before any weight is touched, so a network that
/// returned an error is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A vector did not have the length the network topology requires.
    #[error("{context}: expected length {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A layer size, learning rate, epoch count or dataset was unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Returns a `DimensionMismatch` unless `actual == expected`.
pub(crate) fn check_len(
    context: &'static str,
    expected: usize,
    actual: usize,
) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            context,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_lengths_pass() {
        assert_eq!(check_len("inputs", 3, 3), Ok(()));
    }

    #[test]
    fn mismatch_reports_both_lengths() {
        let err = check_len("targets", 2, 5).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                context: "targets",
                expected: 2,
                actual: 5,
            }
        );
        assert_eq!(err.to_string(), "targets: expected length 2, got 5");
    }
}
