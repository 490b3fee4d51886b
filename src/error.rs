//! Error types shared across the crate.

use thiserror::Error;

/// Errors raised by shape validation, configuration checks and oracles.
///
/// Search engines never produce these for well-formed input: a poor
/// selection is still a selection. Infeasibility reported by an oracle is
/// not an error either; see [`SolveOutcome::Infeasible`](crate::solver::SolveOutcome).
#[derive(Debug, Error)]
pub enum Error {
    /// A matrix row does not have as many entries as the matrix has rows.
    #[error("QUBO matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Entries found in that row.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },

    /// Two index-aligned collections disagree on their length.
    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Which collection was checked.
        what: &'static str,
        /// Length required by the reference collection.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// An engine that works on site attributes was given a bare matrix.
    #[error("solver `{solver}` needs the site catalog")]
    CatalogRequired {
        /// Solver name.
        solver: String,
    },

    /// An external oracle could not be invoked or crashed.
    #[error("oracle `{oracle}` failed: {reason}")]
    OracleFailed {
        /// Oracle name.
        oracle: String,
        /// Failure description.
        reason: String,
    },

    /// Reading or writing an exchange record failed.
    #[cfg(feature = "serde")]
    #[error("exchange format error")]
    Exchange(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Fails with [`Error::DimensionMismatch`] unless `found == expected`.
    pub(crate) fn ensure_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                what,
                expected,
                found,
            })
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
