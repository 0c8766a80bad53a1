// SPDX-License-Identifier: MIT
// Query-side preprocessing reused across many choices.

use tracing::trace;

use crate::algorithms::IndelScorer;
use crate::fuzz::{self, PartialScorer, WeightedScorer};
use crate::tokens::SortedTokens;
use crate::types::RatioKind;

#[derive(Clone, Debug)]
enum QueryState {
    /// Ratio and QuickRatio
    Raw(IndelScorer<char>),
    Partial(PartialScorer),
    TokenSort(IndelScorer<char>),
    PartialTokenSort(PartialScorer),
    TokenSet(SortedTokens),
    PartialTokenSet(SortedTokens),
    Token { tokens: SortedTokens, sorted: IndelScorer<char> },
    PartialToken { tokens: SortedTokens, sorted: PartialScorer },
    Weighted(WeightedScorer),
}

/// A query string prepared once for one [`RatioKind`].
///
/// Construction builds every derived form the kind needs (sorted tokens,
/// pattern tables, char sets). [`ratio`](CachedQuery::ratio) only reads that
/// state, so one instance can serve many threads at once. Scores are
/// identical to [`fuzz::ratio_with_kind`] on the same inputs.
///
/// ```
/// use fuzzratio::{CachedQuery, RatioKind};
///
/// let query = CachedQuery::new("new york", RatioKind::TokenSortRatio);
/// assert_eq!(query.ratio("york new", None), 100.0);
/// query.release();
/// ```
#[derive(Clone, Debug)]
pub struct CachedQuery {
    kind: RatioKind,
    query_len: usize,
    state: QueryState,
}

impl CachedQuery {
    pub fn new(query: &str, kind: RatioKind) -> Self {
        let chars: Vec<char> = query.chars().collect();
        let state = match kind {
            RatioKind::Ratio | RatioKind::QuickRatio => QueryState::Raw(IndelScorer::new(&chars)),
            RatioKind::PartialRatio => QueryState::Partial(PartialScorer::new(&chars)),
            RatioKind::TokenSortRatio => {
                QueryState::TokenSort(IndelScorer::new(&SortedTokens::split(query).join_chars()))
            }
            RatioKind::PartialTokenSortRatio => {
                QueryState::PartialTokenSort(PartialScorer::new(&SortedTokens::split(query).join_chars()))
            }
            RatioKind::TokenSetRatio => QueryState::TokenSet(SortedTokens::split(query)),
            RatioKind::PartialTokenSetRatio => QueryState::PartialTokenSet(SortedTokens::split(query)),
            RatioKind::TokenRatio => {
                let tokens = SortedTokens::split(query);
                let sorted = IndelScorer::new(&tokens.join_chars());
                QueryState::Token { tokens, sorted }
            }
            RatioKind::PartialTokenRatio => {
                let tokens = SortedTokens::split(query);
                let sorted = PartialScorer::new(&tokens.join_chars());
                QueryState::PartialToken { tokens, sorted }
            }
            RatioKind::WeightedRatio => QueryState::Weighted(WeightedScorer::new(query)),
        };

        trace!(%kind, query_len = chars.len(), "cached query ready");
        CachedQuery { kind, query_len: chars.len(), state }
    }

    pub fn kind(&self) -> RatioKind {
        self.kind
    }

    /// Scores `choice` against the prepared query; 0 when below `score_cutoff`.
    pub fn ratio(&self, choice: &str, score_cutoff: Option<f64>) -> f64 {
        let score_cutoff = fuzz::cutoff(score_cutoff);

        match &self.state {
            QueryState::Raw(scorer) => {
                if self.kind == RatioKind::QuickRatio && (self.query_len == 0 || choice.is_empty()) {
                    return 0.0;
                }
                scorer.normalized_similarity(&choice.chars().collect::<Vec<_>>(), score_cutoff)
            }
            QueryState::Partial(scorer) => scorer.score(&choice.chars().collect::<Vec<_>>(), score_cutoff),
            QueryState::TokenSort(scorer) => {
                scorer.normalized_similarity(&SortedTokens::split(choice).join_chars(), score_cutoff)
            }
            QueryState::PartialTokenSort(scorer) => {
                scorer.score(&SortedTokens::split(choice).join_chars(), score_cutoff)
            }
            QueryState::TokenSet(tokens) => {
                fuzz::token_set_ratio_with(tokens, &SortedTokens::split(choice), score_cutoff)
            }
            QueryState::PartialTokenSet(tokens) => {
                fuzz::partial_token_set_ratio_with(tokens, &SortedTokens::split(choice), score_cutoff)
            }
            QueryState::Token { tokens, sorted } => {
                fuzz::token_ratio_with(tokens, sorted, &SortedTokens::split(choice), score_cutoff)
            }
            QueryState::PartialToken { tokens, sorted } => {
                fuzz::partial_token_ratio_with(tokens, sorted, &SortedTokens::split(choice), score_cutoff)
            }
            QueryState::Weighted(scorer) => scorer.score(choice, score_cutoff),
        }
    }

    /// Frees the prepared state. Consuming `self` rules out use after
    /// release and double release; dropping the value has the same effect.
    pub fn release(self) {
        trace!(kind = %self.kind, "cached query released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHOICES: &[&str] = &[
        "",
        "new york",
        "New York",
        "the wonderful new york mets",
        "york new",
        "new york mets vs atlanta braves",
        "atlanta braves vs new york mets",
        "yankees",
        "a{",
        "{b",
        "   ",
        "this is a test!",
        "ünïcödé test strïng",
    ];

    const QUERIES: &[&str] = &[
        "new york mets",
        "",
        "this is a test",
        "york",
        "a b c d e f g h i j k l m n o p q r s t u v w x y z 0 1 2 3 4 5 6 7 8 9",
    ];

    #[test]
    fn test_matches_uncached_scores() {
        for &query in QUERIES {
            for kind in RatioKind::ALL {
                let cached = CachedQuery::new(query, kind);
                for &choice in CHOICES {
                    for cutoff in [None, Some(50.0), Some(90.0)] {
                        assert_eq!(
                            cached.ratio(choice, cutoff),
                            fuzz::ratio_with_kind(query, choice, kind, cutoff),
                            "kind={kind} query={query:?} choice={choice:?} cutoff={cutoff:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_reuse_does_not_change_scores() {
        let cached = CachedQuery::new("fuzzy wuzzy was a bear", RatioKind::WeightedRatio);
        let first = cached.ratio("wuzzy fuzzy was a bear", None);
        cached.ratio("something else entirely", Some(20.0));
        assert_eq!(cached.ratio("wuzzy fuzzy was a bear", None), first);
    }

    #[test]
    fn test_kind_and_release() {
        let cached = CachedQuery::new("abc", RatioKind::QuickRatio);
        assert_eq!(cached.kind(), RatioKind::QuickRatio);
        assert_eq!(cached.ratio("", None), 0.0);
        cached.release();
    }

    #[test]
    fn test_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CachedQuery>();

        let cached = CachedQuery::new("new york", RatioKind::Ratio);
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| cached.ratio("new york", None))).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 100.0);
            }
        });
    }
}
