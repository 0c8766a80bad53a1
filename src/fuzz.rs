// SPDX-License-Identifier: MIT
// Fuzz scorers: ratio, partial_ratio, token variants, WRatio, QRatio.
// Every scorer returns a value in 0..=100 and 0 when the score cutoff is not
// met. The `*_with` helpers take the first string already prepared so the
// cached query can reuse that work across many choices.

use rustc_hash::FxHashSet;

use crate::algorithms::{self as alg, IndelScorer};
use crate::tokens::{set_decomposition, SortedTokens};
use crate::types::{RatioKind, ScoreAlignment};

const UNBASE_SCALE: f64 = 0.95;

/// `None` means no cutoff; negative cutoffs behave like 0.
#[inline]
pub(crate) fn cutoff(score_cutoff: Option<f64>) -> f64 {
    score_cutoff.unwrap_or(0.0).max(0.0)
}

#[inline]
fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[inline]
fn score_cutoff_check(score: f64, score_cutoff: f64) -> f64 {
    if score >= score_cutoff { score } else { 0.0 }
}

// ===========================================================================
// ratio: normalized Indel similarity × 100
// ===========================================================================

pub(crate) fn indel_ratio(s1: &[char], s2: &[char], score_cutoff: f64) -> f64 {
    if score_cutoff > 100.0 {
        return 0.0;
    }
    let lensum = s1.len() + s2.len();
    if lensum == 0 {
        return 100.0;
    }
    let max_dist = alg::score_cutoff_to_distance(score_cutoff, lensum);
    match alg::indel_distance(s1, s2, Some(max_dist)) {
        Some(dist) => alg::norm_distance(dist, lensum, score_cutoff),
        None => 0.0,
    }
}

/// Normalized Indel similarity.
///
/// ```
/// let score = fuzzratio::fuzz::ratio("this is a test", "this is a test!", None);
/// assert!((score - 96.55).abs() < 0.01);
/// ```
pub fn ratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    indel_ratio(&chars(s1), &chars(s2), cutoff(score_cutoff))
}

// ===========================================================================
// partial_ratio
// ===========================================================================

/// Needle side of a partial comparison: the sequence, its Indel pattern
/// table and the set of chars it contains.
#[derive(Clone, Debug)]
pub(crate) struct PartialScorer {
    indel: IndelScorer<char>,
    char_set: FxHashSet<char>,
}

impl PartialScorer {
    pub(crate) fn new(s1: &[char]) -> Self {
        PartialScorer {
            indel: IndelScorer::new(s1),
            char_set: s1.iter().copied().collect(),
        }
    }

    pub(crate) fn indel(&self) -> &IndelScorer<char> {
        &self.indel
    }

    fn sequence(&self) -> &[char] {
        self.indel.sequence()
    }

    /// Best window of `s2` for the prepared `s1`, either side may be longer.
    pub(crate) fn alignment(&self, s2: &[char], score_cutoff: f64) -> ScoreAlignment {
        let s1 = self.sequence();
        let (len1, len2) = (s1.len(), s2.len());
        let empty = ScoreAlignment { score: 0.0, src_start: 0, src_end: len1, dest_start: 0, dest_end: len2 };

        if score_cutoff > 100.0 {
            return empty;
        }
        if len1 == 0 || len2 == 0 {
            let score = if len1 == len2 { 100.0 } else { 0.0 };
            return ScoreAlignment { score: score_cutoff_check(score, score_cutoff), ..empty };
        }

        let mut res = if len1 <= len2 {
            partial_ratio_short_long(self, s2, score_cutoff)
        } else {
            partial_ratio_short_long(&PartialScorer::new(s2), s1, score_cutoff).swapped()
        };

        // Equal lengths: the roles of needle and haystack are interchangeable.
        if res.score != 100.0 && len1 == len2 {
            let cutoff2 = score_cutoff.max(res.score);
            let res2 = partial_ratio_short_long(&PartialScorer::new(s2), s1, cutoff2);
            if res2.score > res.score {
                res = res2.swapped();
            }
        }

        if res.score < score_cutoff {
            res.score = 0.0;
        }
        res
    }

    pub(crate) fn score(&self, s2: &[char], score_cutoff: f64) -> f64 {
        self.alignment(s2, score_cutoff).score
    }
}

/// Slides the needle over the haystack, `needle.len() <= haystack.len()`:
///   1. prefix overhangs  haystack[..i]            for 1 <= i < len1
///   2. full windows      haystack[i..i + len1]
///   3. suffix overhangs  haystack[i..]            for i > len2 - len1
/// Overhangs whose boundary char is missing from the needle are skipped: a
/// shorter overhang already scored at least as well.
fn partial_ratio_short_long(needle: &PartialScorer, haystack: &[char], mut score_cutoff: f64) -> ScoreAlignment {
    let len1 = needle.sequence().len();
    let len2 = haystack.len();
    debug_assert!(len1 > 0 && len1 <= len2);

    let mut res = ScoreAlignment { score: 0.0, src_start: 0, src_end: len1, dest_start: 0, dest_end: len1 };

    let consider = |res: &mut ScoreAlignment, cutoff: &mut f64, start: usize, end: usize| -> bool {
        let score = needle.indel.normalized_similarity(&haystack[start..end], *cutoff);
        if score > res.score {
            *cutoff = score;
            res.score = score;
            res.dest_start = start;
            res.dest_end = end;
        }
        res.score == 100.0
    };

    for i in 1..len1 {
        if !needle.char_set.contains(&haystack[i - 1]) {
            continue;
        }
        if consider(&mut res, &mut score_cutoff, 0, i) {
            return res;
        }
    }

    for start in 0..=(len2 - len1) {
        if consider(&mut res, &mut score_cutoff, start, start + len1) {
            return res;
        }
    }

    for start in (len2 - len1 + 1)..len2 {
        if !needle.char_set.contains(&haystack[start]) {
            continue;
        }
        if consider(&mut res, &mut score_cutoff, start, len2) {
            return res;
        }
    }

    res
}

/// Ratio of the best-matching window of the longer string against the
/// shorter one.
pub fn partial_ratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    let (a, b) = (chars(s1), chars(s2));
    PartialScorer::new(&a).score(&b, cutoff(score_cutoff))
}

/// Same search as [`partial_ratio`], also reporting where the best window
/// lies. `None` when the score is below the cutoff.
pub fn partial_ratio_alignment(s1: &str, s2: &str, score_cutoff: Option<f64>) -> Option<ScoreAlignment> {
    let (a, b) = (chars(s1), chars(s2));
    let c = cutoff(score_cutoff);
    if c > 100.0 {
        return None;
    }
    let res = PartialScorer::new(&a).alignment(&b, c);
    if res.score < c {
        return None;
    }
    Some(res)
}

// ===========================================================================
// token_sort_ratio / partial_token_sort_ratio
// ===========================================================================

pub fn token_sort_ratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    let sorted1 = SortedTokens::split(s1).join_chars();
    let sorted2 = SortedTokens::split(s2).join_chars();
    indel_ratio(&sorted1, &sorted2, cutoff(score_cutoff))
}

pub fn partial_token_sort_ratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    let sorted1 = SortedTokens::split(s1).join_chars();
    let sorted2 = SortedTokens::split(s2).join_chars();
    PartialScorer::new(&sorted1).score(&sorted2, cutoff(score_cutoff))
}

// ===========================================================================
// token_set_ratio
// ===========================================================================

/// Token-set sub-scores once the intersection shortcut does not apply.
/// With `sect`, `ab`, `ba` the joined lengths of intersection and both
/// differences, the candidates are:
///   sect + ab  <->  sect + ba   (only the differences differ)
///   sect       <->  sect + ab   (distance is the separator plus ab)
///   sect       <->  sect + ba
fn token_set_sub_scores(diff_ab: &SortedTokens, diff_ba: &SortedTokens, sect_len: usize, score_cutoff: f64) -> f64 {
    let diff_ab_joined = diff_ab.join_chars();
    let diff_ba_joined = diff_ba.join_chars();
    let ab_len = diff_ab_joined.len();
    let ba_len = diff_ba_joined.len();

    let sep = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + sep + ab_len;
    let sect_ba_len = sect_len + sep + ba_len;
    let lensum = sect_ab_len + sect_ba_len;

    let mut result = 0.0;
    let cutoff_distance = alg::score_cutoff_to_distance(score_cutoff, lensum);
    if let Some(dist) = alg::indel_distance(&diff_ab_joined, &diff_ba_joined, Some(cutoff_distance)) {
        result = alg::norm_distance(dist, lensum, score_cutoff);
    }

    if sect_len == 0 {
        return result;
    }

    let sect_ab_ratio = alg::norm_distance(sep + ab_len, sect_len + sect_ab_len, score_cutoff);
    let sect_ba_ratio = alg::norm_distance(sep + ba_len, sect_len + sect_ba_len, score_cutoff);
    result.max(sect_ab_ratio).max(sect_ba_ratio)
}

pub(crate) fn token_set_ratio_with(tokens_a: &SortedTokens, tokens_b: &SortedTokens, score_cutoff: f64) -> f64 {
    if score_cutoff > 100.0 {
        return 0.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let dec = set_decomposition(tokens_a, tokens_b);
    // one sentence is part of the other one
    if !dec.intersection.is_empty() && (dec.difference_ab.is_empty() || dec.difference_ba.is_empty()) {
        return 100.0;
    }

    token_set_sub_scores(&dec.difference_ab, &dec.difference_ba, dec.intersection.char_len(), score_cutoff)
}

pub fn token_set_ratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    token_set_ratio_with(&SortedTokens::split(s1), &SortedTokens::split(s2), cutoff(score_cutoff))
}

// ===========================================================================
// partial_token_set_ratio
// ===========================================================================

pub(crate) fn partial_token_set_ratio_with(tokens_a: &SortedTokens, tokens_b: &SortedTokens, score_cutoff: f64) -> f64 {
    if score_cutoff > 100.0 {
        return 0.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let dec = set_decomposition(tokens_a, tokens_b);
    // exit early when there is a common word in both sequences
    if !dec.intersection.is_empty() {
        return 100.0;
    }

    let diff_ab = dec.difference_ab.join_chars();
    let diff_ba = dec.difference_ba.join_chars();
    PartialScorer::new(&diff_ab).score(&diff_ba, score_cutoff)
}

pub fn partial_token_set_ratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    partial_token_set_ratio_with(&SortedTokens::split(s1), &SortedTokens::split(s2), cutoff(score_cutoff))
}

// ===========================================================================
// token_ratio: max(token_sort_ratio, token_set_ratio), one tokenization
// ===========================================================================

/// `sorted_a` must hold the joined `tokens_a`.
pub(crate) fn token_ratio_with(
    tokens_a: &SortedTokens,
    sorted_a: &IndelScorer<char>,
    tokens_b: &SortedTokens,
    score_cutoff: f64,
) -> f64 {
    if score_cutoff > 100.0 {
        return 0.0;
    }

    let dec = set_decomposition(tokens_a, tokens_b);
    if !dec.intersection.is_empty() && (dec.difference_ab.is_empty() || dec.difference_ba.is_empty()) {
        return 100.0;
    }

    let sorted_b = tokens_b.join_chars();
    let result = sorted_a.normalized_similarity(&sorted_b, score_cutoff);

    // token_set_ratio reports 0 for an empty side; its sub-scores would not
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return result;
    }

    let set_score = token_set_sub_scores(&dec.difference_ab, &dec.difference_ba, dec.intersection.char_len(), score_cutoff);
    result.max(set_score)
}

pub fn token_ratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    let tokens_a = SortedTokens::split(s1);
    let sorted_a = IndelScorer::new(&tokens_a.join_chars());
    token_ratio_with(&tokens_a, &sorted_a, &SortedTokens::split(s2), cutoff(score_cutoff))
}

// ===========================================================================
// partial_token_ratio
// ===========================================================================

/// `sorted_a` must hold the joined `tokens_a`.
pub(crate) fn partial_token_ratio_with(
    tokens_a: &SortedTokens,
    sorted_a: &PartialScorer,
    tokens_b: &SortedTokens,
    score_cutoff: f64,
) -> f64 {
    if score_cutoff > 100.0 {
        return 0.0;
    }

    let dec = set_decomposition(tokens_a, tokens_b);
    // exit early when there is a common word in both sequences
    if !dec.intersection.is_empty() {
        return 100.0;
    }

    let result = sorted_a.score(&tokens_b.join_chars(), score_cutoff);

    // differences equal the full token lists: same comparison as above
    if tokens_a.word_count() == dec.difference_ab.word_count()
        && tokens_b.word_count() == dec.difference_ba.word_count()
    {
        return result;
    }

    let cutoff2 = score_cutoff.max(result);
    let diff_ab = dec.difference_ab.join_chars();
    let diff_ba = dec.difference_ba.join_chars();
    result.max(PartialScorer::new(&diff_ab).score(&diff_ba, cutoff2))
}

pub fn partial_token_ratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    let tokens_a = SortedTokens::split(s1);
    let sorted_a = PartialScorer::new(&tokens_a.join_chars());
    partial_token_ratio_with(&tokens_a, &sorted_a, &SortedTokens::split(s2), cutoff(score_cutoff))
}

// ===========================================================================
// WRatio
// ===========================================================================

/// Query-side state of the weighted ratio: raw form and sorted-token form,
/// each prepared for partial comparisons.
#[derive(Clone, Debug)]
pub(crate) struct WeightedScorer {
    raw: PartialScorer,
    tokens: SortedTokens,
    sorted: PartialScorer,
}

impl WeightedScorer {
    pub(crate) fn new(s1: &str) -> Self {
        let tokens = SortedTokens::split(s1);
        WeightedScorer {
            raw: PartialScorer::new(&chars(s1)),
            sorted: PartialScorer::new(&tokens.join_chars()),
            tokens,
        }
    }

    pub(crate) fn score(&self, s2: &str, score_cutoff: f64) -> f64 {
        if score_cutoff > 100.0 {
            return 0.0;
        }

        let s2_chars = chars(s2);
        let len1 = self.raw.sequence().len();
        let len2 = s2_chars.len();
        if len1 == 0 || len2 == 0 {
            return 0.0;
        }

        let len_ratio = if len1 > len2 {
            len1 as f64 / len2 as f64
        } else {
            len2 as f64 / len1 as f64
        };

        let mut end_ratio = self.raw.indel().normalized_similarity(&s2_chars, score_cutoff);
        let tokens_b = SortedTokens::split(s2);

        if len_ratio < 1.5 {
            let cutoff2 = score_cutoff.max(end_ratio) / UNBASE_SCALE;
            let tr = token_ratio_with(&self.tokens, self.sorted.indel(), &tokens_b, cutoff2);
            end_ratio = end_ratio.max(tr * UNBASE_SCALE);
            return score_cutoff_check(end_ratio, score_cutoff);
        }

        let partial_scale = if len_ratio <= 8.0 { 0.9 } else { 0.6 };

        let cutoff2 = score_cutoff.max(end_ratio) / partial_scale;
        end_ratio = end_ratio.max(self.raw.score(&s2_chars, cutoff2) * partial_scale);

        let cutoff3 = cutoff2.max(end_ratio) / UNBASE_SCALE;
        let ptr = partial_token_ratio_with(&self.tokens, &self.sorted, &tokens_b, cutoff3);
        end_ratio = end_ratio.max(ptr * UNBASE_SCALE * partial_scale);

        score_cutoff_check(end_ratio, score_cutoff)
    }
}

/// Weighted blend of ratio, partial and token scores, scaled by how much
/// the lengths differ. Either string empty scores 0.
pub fn wratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    WeightedScorer::new(s1).score(s2, cutoff(score_cutoff))
}

// ===========================================================================
// QRatio (same as ratio but returns 0 for empty strings)
// ===========================================================================

pub fn qratio(s1: &str, s2: &str, score_cutoff: Option<f64>) -> f64 {
    if s1.is_empty() || s2.is_empty() {
        return 0.0;
    }
    ratio(s1, s2, score_cutoff)
}

// ===========================================================================
// Dispatch
// ===========================================================================

/// Scores `s1` against `s2` with the algorithm selected by `kind`.
pub fn ratio_with_kind(s1: &str, s2: &str, kind: RatioKind, score_cutoff: Option<f64>) -> f64 {
    match kind {
        RatioKind::Ratio => ratio(s1, s2, score_cutoff),
        RatioKind::PartialRatio => partial_ratio(s1, s2, score_cutoff),
        RatioKind::TokenSortRatio => token_sort_ratio(s1, s2, score_cutoff),
        RatioKind::PartialTokenSortRatio => partial_token_sort_ratio(s1, s2, score_cutoff),
        RatioKind::TokenSetRatio => token_set_ratio(s1, s2, score_cutoff),
        RatioKind::PartialTokenSetRatio => partial_token_set_ratio(s1, s2, score_cutoff),
        RatioKind::TokenRatio => token_ratio(s1, s2, score_cutoff),
        RatioKind::PartialTokenRatio => partial_token_ratio(s1, s2, score_cutoff),
        RatioKind::WeightedRatio => wratio(s1, s2, score_cutoff),
        RatioKind::QuickRatio => qratio(s1, s2, score_cutoff),
    }
}
