// SPDX-License-Identifier: MIT
// Shared value types: scorer selector, extraction result, partial alignment.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::FuzzError;

/// Selects the scoring algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RatioKind {
    Ratio,
    PartialRatio,
    TokenSortRatio,
    PartialTokenSortRatio,
    TokenSetRatio,
    PartialTokenSetRatio,
    TokenRatio,
    PartialTokenRatio,
    #[default]
    WeightedRatio,
    QuickRatio,
}

impl RatioKind {
    pub const ALL: [RatioKind; 10] = [
        RatioKind::Ratio,
        RatioKind::PartialRatio,
        RatioKind::TokenSortRatio,
        RatioKind::PartialTokenSortRatio,
        RatioKind::TokenSetRatio,
        RatioKind::PartialTokenSetRatio,
        RatioKind::TokenRatio,
        RatioKind::PartialTokenRatio,
        RatioKind::WeightedRatio,
        RatioKind::QuickRatio,
    ];

    /// Snake-case scorer name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            RatioKind::Ratio => "ratio",
            RatioKind::PartialRatio => "partial_ratio",
            RatioKind::TokenSortRatio => "token_sort_ratio",
            RatioKind::PartialTokenSortRatio => "partial_token_sort_ratio",
            RatioKind::TokenSetRatio => "token_set_ratio",
            RatioKind::PartialTokenSetRatio => "partial_token_set_ratio",
            RatioKind::TokenRatio => "token_ratio",
            RatioKind::PartialTokenRatio => "partial_token_ratio",
            RatioKind::WeightedRatio => "wratio",
            RatioKind::QuickRatio => "qratio",
        }
    }

    /// Legacy integer code (1..=10).
    pub fn code(self) -> i32 {
        match self {
            RatioKind::Ratio => 1,
            RatioKind::PartialRatio => 2,
            RatioKind::TokenSortRatio => 3,
            RatioKind::PartialTokenSortRatio => 4,
            RatioKind::TokenSetRatio => 5,
            RatioKind::PartialTokenSetRatio => 6,
            RatioKind::TokenRatio => 7,
            RatioKind::PartialTokenRatio => 8,
            RatioKind::WeightedRatio => 9,
            RatioKind::QuickRatio => 10,
        }
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RatioKind {
    type Err = FuzzError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "ratio" => Ok(RatioKind::Ratio),
            "partial_ratio" => Ok(RatioKind::PartialRatio),
            "token_sort_ratio" => Ok(RatioKind::TokenSortRatio),
            "partial_token_sort_ratio" => Ok(RatioKind::PartialTokenSortRatio),
            "token_set_ratio" => Ok(RatioKind::TokenSetRatio),
            "partial_token_set_ratio" => Ok(RatioKind::PartialTokenSetRatio),
            "token_ratio" => Ok(RatioKind::TokenRatio),
            "partial_token_ratio" => Ok(RatioKind::PartialTokenRatio),
            "wratio" | "weighted_ratio" => Ok(RatioKind::WeightedRatio),
            "qratio" | "quick_ratio" => Ok(RatioKind::QuickRatio),
            _ => Err(FuzzError::UnknownRatioKind(name.to_string())),
        }
    }
}

impl TryFrom<i32> for RatioKind {
    type Error = FuzzError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        RatioKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(FuzzError::UnknownRatioCode(code))
    }
}

/// One retained candidate of an extraction pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Match<T> {
    /// The caller's element, as yielded by the input iterator
    pub choice: T,
    pub score: f64,
    /// Position of `choice` in the input iteration order
    pub index: usize,
}

impl<T> Match<T> {
    pub fn new(choice: T, score: f64, index: usize) -> Self {
        Match { choice, score, index }
    }

    /// Orders by score only.
    pub fn cmp_score(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Match<U> {
        Match { choice: f(self.choice), score: self.score, index: self.index }
    }
}

/// Best window found by a partial comparison. Positions count chars:
/// `src_*` index the first argument, `dest_*` the second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreAlignment {
    pub score: f64,
    pub src_start: usize,
    pub src_end: usize,
    pub dest_start: usize,
    pub dest_end: usize,
}

impl ScoreAlignment {
    pub(crate) fn swapped(self) -> Self {
        ScoreAlignment {
            score: self.score,
            src_start: self.dest_start,
            src_end: self.dest_end,
            dest_start: self.src_start,
            dest_end: self.src_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name_and_code() {
        for kind in RatioKind::ALL {
            assert_eq!(kind.name().parse::<RatioKind>(), Ok(kind));
            assert_eq!(RatioKind::try_from(kind.code()), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_kind_is_usage_fault() {
        assert_eq!(
            "levenshtein".parse::<RatioKind>(),
            Err(FuzzError::UnknownRatioKind("levenshtein".to_string()))
        );
        assert_eq!(RatioKind::try_from(0), Err(FuzzError::UnknownRatioCode(0)));
        assert_eq!(RatioKind::try_from(11).unwrap_err().to_string(), "unknown ratio type code: 11");
    }

    #[test]
    fn test_default_kind_is_weighted() {
        assert_eq!(RatioKind::default(), RatioKind::WeightedRatio);
    }

    #[test]
    fn test_match_orders_by_score() {
        let a = Match::new("a", 50.0, 0);
        let b = Match::new("b", 75.0, 1);
        assert_eq!(a.cmp_score(&b), Ordering::Less);
        assert_eq!(b.map(str::len), Match::new(1, 75.0, 1));
    }
}
