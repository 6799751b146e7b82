use std::fmt::{Display, Formatter};
use std::num::{IntErrorKind, NonZeroUsize};
use std::str::FromStr;

use suppressor_core::{AppError, AppResult};

/// Upper bound on the number of suppressions processed in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionLimit {
    /// Process every suppression. Parsed from `0`.
    #[default]
    Unlimited,
    /// Process at most this many suppressions.
    AtMost(NonZeroUsize),
}

impl DeletionLimit {
    /// Builds a limit from a count where `0` means unlimited.
    #[must_use]
    pub fn from_count(count: usize) -> Self {
        NonZeroUsize::new(count).map_or(Self::Unlimited, Self::AtMost)
    }

    /// Returns the prefix of `items` this limit selects, preserving order.
    #[must_use]
    pub fn select<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        match self {
            Self::Unlimited => items,
            Self::AtMost(count) => &items[..count.get().min(items.len())],
        }
    }
}

impl FromStr for DeletionLimit {
    type Err = AppError;

    /// Counts beyond `usize::MAX` are still valid integers and cover the
    /// whole list.
    fn from_str(value: &str) -> AppResult<Self> {
        let trimmed = value.trim();
        match trimmed.parse::<usize>() {
            Ok(count) => Ok(Self::from_count(count)),
            Err(error) if *error.kind() == IntErrorKind::PosOverflow => {
                Ok(Self::AtMost(NonZeroUsize::MAX))
            }
            Err(error) => Err(AppError::Validation(format!(
                "limit must be a non-negative integer, got '{trimmed}': {error}"
            ))),
        }
    }
}

impl Display for DeletionLimit {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unlimited => formatter.write_str("unlimited"),
            Self::AtMost(count) => write!(formatter, "{count}"),
        }
    }
}
