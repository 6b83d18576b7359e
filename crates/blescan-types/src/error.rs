//! Error types for value parsing in blescan-types.

use thiserror::Error;

/// Errors that can occur when parsing blescan values from text.
///
/// Classification itself never fails; these errors only cover user-supplied
/// input such as a `--min-signal` flag or a config file entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The string does not name one of the five signal tiers.
    #[error("Invalid signal tier '{0}' (expected very-strong, strong, medium, weak or very-weak)")]
    InvalidSignalTier(String),
}
