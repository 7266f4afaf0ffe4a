//! Business day adjustment conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Business day adjustment conventions.
///
/// These conventions specify how to move a date that falls on a
/// non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// No adjustment - use the date as-is even if not a business day.
    #[default]
    Unadjusted,

    /// Move to the following business day.
    Following,

    /// Move to the preceding business day.
    Preceding,

    /// Move to the following business day, unless it crosses a month
    /// boundary, in which case move to the preceding business day.
    ModifiedFollowing,
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BusinessDayConvention::Unadjusted => "unadjusted",
            BusinessDayConvention::Following => "following",
            BusinessDayConvention::Preceding => "preceding",
            BusinessDayConvention::ModifiedFollowing => "modified following",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BusinessDayConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unadjusted" => Ok(Self::Unadjusted),
            "following" => Ok(Self::Following),
            "preceding" => Ok(Self::Preceding),
            "modified following" | "modified_following" => Ok(Self::ModifiedFollowing),
            _ => Err(CoreError::format(s, "business day convention")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conventions() {
        assert_eq!(
            "modified following".parse::<BusinessDayConvention>().unwrap(),
            BusinessDayConvention::ModifiedFollowing
        );
        assert!("backward".parse::<BusinessDayConvention>().is_err());
    }

    #[test]
    fn test_default_is_unadjusted() {
        assert_eq!(
            BusinessDayConvention::default(),
            BusinessDayConvention::Unadjusted
        );
    }
}
