// SPDX-License-Identifier: MIT
// Batch extraction: score one query against a collection of candidates.

use std::borrow::Cow;
use std::convert::Infallible;

use tracing::debug;

use crate::cached::CachedQuery;
use crate::fuzz;
use crate::types::{Match, RatioKind};

/// One or more strings produced from a candidate. A candidate scores the
/// maximum over all of them; producing none scores 0.
pub trait Choices {
    fn for_each_choice(&self, visit: &mut dyn FnMut(&str));
}

impl Choices for str {
    fn for_each_choice(&self, visit: &mut dyn FnMut(&str)) {
        visit(self)
    }
}

impl Choices for String {
    fn for_each_choice(&self, visit: &mut dyn FnMut(&str)) {
        visit(self)
    }
}

impl Choices for Cow<'_, str> {
    fn for_each_choice(&self, visit: &mut dyn FnMut(&str)) {
        visit(self)
    }
}

impl<C: Choices + ?Sized> Choices for &C {
    fn for_each_choice(&self, visit: &mut dyn FnMut(&str)) {
        (**self).for_each_choice(visit)
    }
}

impl<S: AsRef<str>> Choices for [S] {
    fn for_each_choice(&self, visit: &mut dyn FnMut(&str)) {
        for s in self {
            visit(s.as_ref());
        }
    }
}

impl<S: AsRef<str>> Choices for Vec<S> {
    fn for_each_choice(&self, visit: &mut dyn FnMut(&str)) {
        self.as_slice().for_each_choice(visit)
    }
}

impl<S: AsRef<str>, const N: usize> Choices for [S; N] {
    fn for_each_choice(&self, visit: &mut dyn FnMut(&str)) {
        self.as_slice().for_each_choice(visit)
    }
}

/// Best score over every string of `choices`. Strings below the cutoff or
/// the running best score 0 and never lower the result.
fn best_score<C: Choices + ?Sized>(query: &CachedQuery, choices: &C, score_cutoff: f64) -> f64 {
    let mut best = 0.0_f64;
    choices.for_each_choice(&mut |choice| {
        let score = query.ratio(choice, Some(score_cutoff.max(best)));
        if score > best {
            best = score;
        }
    });
    best
}

fn never<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

// ===========================================================================
// extract_all
// ===========================================================================

/// Every candidate scoring at least `score_cutoff`, in input order.
///
/// ```
/// use fuzzratio::{process, RatioKind};
///
/// let matches = process::extract_all("York", ["New York", "NYC"], RatioKind::WeightedRatio, Some(50.0));
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].choice, "New York");
/// ```
pub fn extract_all<I>(query: &str, choices: I, kind: RatioKind, score_cutoff: Option<f64>) -> Vec<Match<I::Item>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    never(try_extract_all_by(query, choices, kind, score_cutoff, |cached, choice, cutoff| {
        Ok(best_score::<str>(cached, choice.as_ref(), cutoff))
    }))
}

/// Like [`extract_all`], scoring each candidate through `generator`: one
/// string per candidate, or several of which the best counts.
pub fn extract_all_with<I, C, F>(
    query: &str,
    choices: I,
    kind: RatioKind,
    score_cutoff: Option<f64>,
    mut generator: F,
) -> Vec<Match<I::Item>>
where
    I: IntoIterator,
    C: Choices,
    F: FnMut(&I::Item) -> C,
{
    never(try_extract_all_by(query, choices, kind, score_cutoff, |cached, choice, cutoff| {
        Ok(best_score(cached, &generator(choice), cutoff))
    }))
}

/// Fallible generator variant; the first error aborts the whole pass.
pub fn try_extract_all_with<I, C, E, F>(
    query: &str,
    choices: I,
    kind: RatioKind,
    score_cutoff: Option<f64>,
    mut generator: F,
) -> Result<Vec<Match<I::Item>>, E>
where
    I: IntoIterator,
    C: Choices,
    F: FnMut(&I::Item) -> Result<C, E>,
{
    try_extract_all_by(query, choices, kind, score_cutoff, |cached, choice, cutoff| {
        Ok(best_score(cached, &generator(choice)?, cutoff))
    })
}

fn try_extract_all_by<I, E, S>(
    query: &str,
    choices: I,
    kind: RatioKind,
    score_cutoff: Option<f64>,
    mut score: S,
) -> Result<Vec<Match<I::Item>>, E>
where
    I: IntoIterator,
    S: FnMut(&CachedQuery, &I::Item, f64) -> Result<f64, E>,
{
    let score_cutoff = fuzz::cutoff(score_cutoff);
    debug!(%kind, score_cutoff, "extract_all started");
    let cached = CachedQuery::new(query, kind);

    let mut results = Vec::new();
    let mut scanned = 0usize;
    for (index, choice) in choices.into_iter().enumerate() {
        scanned += 1;
        let s = score(&cached, &choice, score_cutoff)?;
        if s >= score_cutoff {
            results.push(Match::new(choice, s, index));
        }
    }

    debug!(%kind, scanned, retained = results.len(), "extract_all finished");
    Ok(results)
}

// ===========================================================================
// extract_one
// ===========================================================================

/// Best candidate scoring at least `score_cutoff`. Ties keep the earliest.
pub fn extract_one<I>(query: &str, choices: I, kind: RatioKind, score_cutoff: Option<f64>) -> Option<Match<I::Item>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    never(try_extract_one_by(query, choices, kind, score_cutoff, |cached, choice, cutoff| {
        Ok(best_score::<str>(cached, choice.as_ref(), cutoff))
    }))
}

pub fn extract_one_with<I, C, F>(
    query: &str,
    choices: I,
    kind: RatioKind,
    score_cutoff: Option<f64>,
    mut generator: F,
) -> Option<Match<I::Item>>
where
    I: IntoIterator,
    C: Choices,
    F: FnMut(&I::Item) -> C,
{
    never(try_extract_one_by(query, choices, kind, score_cutoff, |cached, choice, cutoff| {
        Ok(best_score(cached, &generator(choice), cutoff))
    }))
}

pub fn try_extract_one_with<I, C, E, F>(
    query: &str,
    choices: I,
    kind: RatioKind,
    score_cutoff: Option<f64>,
    mut generator: F,
) -> Result<Option<Match<I::Item>>, E>
where
    I: IntoIterator,
    C: Choices,
    F: FnMut(&I::Item) -> Result<C, E>,
{
    try_extract_one_by(query, choices, kind, score_cutoff, |cached, choice, cutoff| {
        Ok(best_score(cached, &generator(choice)?, cutoff))
    })
}

fn try_extract_one_by<I, E, S>(
    query: &str,
    choices: I,
    kind: RatioKind,
    score_cutoff: Option<f64>,
    mut score: S,
) -> Result<Option<Match<I::Item>>, E>
where
    I: IntoIterator,
    S: FnMut(&CachedQuery, &I::Item, f64) -> Result<f64, E>,
{
    let score_cutoff = fuzz::cutoff(score_cutoff);
    debug!(%kind, score_cutoff, "extract_one started");
    let cached = CachedQuery::new(query, kind);

    let mut scanned = 0usize;
    let mut best: Option<Match<I::Item>> = None;
    for (index, choice) in choices.into_iter().enumerate() {
        scanned += 1;
        // the running best doubles as cutoff: anything below it scores 0
        let threshold = best.as_ref().map_or(score_cutoff, |m| m.score);
        let s = score(&cached, &choice, threshold)?;
        let better = match &best {
            Some(current) => s > current.score,
            None => s >= score_cutoff,
        };
        if better {
            best = Some(Match::new(choice, s, index));
        }
    }

    debug!(%kind, scanned, found = best.is_some(), "extract_one finished");
    Ok(best)
}

// ===========================================================================
// extract: ranked, limited
// ===========================================================================

/// Options for [`extract`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractOptions {
    pub kind: RatioKind,
    pub score_cutoff: Option<f64>,
    /// Maximum number of results; `None` keeps all
    pub limit: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { kind: RatioKind::WeightedRatio, score_cutoff: None, limit: Some(5) }
    }
}

/// Best matches ordered by descending score, equal scores in input order,
/// truncated to `options.limit`.
pub fn extract<I>(query: &str, choices: I, options: &ExtractOptions) -> Vec<Match<I::Item>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut results = extract_all(query, choices, options.kind, options.score_cutoff);
    results.sort_by(|a, b| b.cmp_score(a));
    if let Some(l) = options.limit {
        results.truncate(l);
    }
    results
}

// ===========================================================================
// Parallel
// ===========================================================================

/// [`extract_all`] over a slice on the rayon pool. One cached query is
/// shared by all workers; results come back in input order.
#[cfg(feature = "parallel")]
pub fn extract_all_par<'a, T>(
    query: &str,
    choices: &'a [T],
    kind: RatioKind,
    score_cutoff: Option<f64>,
) -> Vec<Match<&'a T>>
where
    T: AsRef<str> + Sync,
{
    use rayon::prelude::*;

    let score_cutoff = fuzz::cutoff(score_cutoff);
    let cached = CachedQuery::new(query, kind);

    let results: Vec<Match<&'a T>> = choices
        .par_iter()
        .enumerate()
        .filter_map(|(index, choice)| {
            let s = cached.ratio(choice.as_ref(), Some(score_cutoff));
            (s >= score_cutoff).then(|| Match::new(choice, s, index))
        })
        .collect();

    debug!(%kind, scanned = choices.len(), retained = results.len(), "extract_all_par finished");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: [&str; 4] = ["New York", "Yorkshire", "NYC", "Cork"];

    macro_rules! assert_delta {
        ($x:expr, $y:expr) => {
            assert!(($x - $y).abs() < 0.01, "{} != {}", $x, $y);
        };
    }

    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        aliases: Vec<String>,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Robert Smith".into(), aliases: vec!["Bob".into(), "Bobby".into()] },
            Person { name: "Elizabeth Jones".into(), aliases: vec!["Liz".into(), "Beth".into()] },
            Person { name: "Nobody".into(), aliases: vec![] },
        ]
    }

    #[test]
    fn test_extract_all_keeps_input_order() {
        let matches = extract_all("York", CITIES, RatioKind::WeightedRatio, None);
        let names: Vec<_> = matches.iter().map(|m| m.choice).collect();
        assert_eq!(names, CITIES);
        assert_eq!(matches.iter().map(|m| m.index).collect::<Vec<_>>(), [0, 1, 2, 3]);
        assert_delta!(matches[0].score, 90.0);
        assert_delta!(matches[1].score, 90.0);
        assert_delta!(matches[2].score, 28.57);
        assert_delta!(matches[3].score, 75.0);
    }

    #[test]
    fn test_extract_all_cutoff_filters() {
        let matches = extract_all("York", CITIES, RatioKind::WeightedRatio, Some(80.0));
        assert_eq!(matches.iter().map(|m| m.choice).collect::<Vec<_>>(), ["New York", "Yorkshire"]);
        assert!(extract_all("York", CITIES, RatioKind::WeightedRatio, Some(100.5)).is_empty());
    }

    #[test]
    fn test_extract_all_empty() {
        let empty: Vec<String> = Vec::new();
        assert!(extract_all("York", &empty, RatioKind::Ratio, None).is_empty());
    }

    #[test]
    fn test_extract_one_ties_keep_first() {
        let best = extract_one("York", CITIES, RatioKind::WeightedRatio, None).unwrap();
        assert_eq!(best.choice, "New York");
        assert_eq!(best.index, 0);

        let reversed = ["Yorkshire", "New York"];
        let best = extract_one("York", reversed, RatioKind::WeightedRatio, None).unwrap();
        assert_eq!(best.choice, "Yorkshire");
    }

    #[test]
    fn test_extract_one_empty_and_cutoff() {
        let empty: [&str; 0] = [];
        assert!(extract_one("York", empty, RatioKind::WeightedRatio, None).is_none());
        assert!(extract_one("York", CITIES, RatioKind::WeightedRatio, Some(95.0)).is_none());
    }

    #[test]
    fn test_extract_one_later_strictly_better_wins() {
        let best = extract_one("york", ["cork", "yorks", "york"], RatioKind::Ratio, None).unwrap();
        assert_eq!(best.choice, "york");
        assert_eq!(best.score, 100.0);
    }

    #[test]
    fn test_one_to_one_generator() {
        let people = people();
        let best = extract_one_with("elizabeth", people.iter(), RatioKind::PartialRatio, None, |p| p.name.as_str())
            .unwrap();
        assert_eq!(best.choice.name, "Elizabeth Jones");
        assert_eq!(best.index, 1);
    }

    #[test]
    fn test_one_to_many_generator_takes_max() {
        let people = people();
        let matches = extract_all_with("Bobby", &people, RatioKind::Ratio, Some(90.0), |p| p.aliases.clone());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].choice.name, "Robert Smith");
        assert_eq!(matches[0].score, 100.0);

        // no generated strings: score 0, kept only without a cutoff
        let all = extract_all_with("Bobby", &people, RatioKind::Ratio, None, |p| p.aliases.clone());
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].score, 0.0);
    }

    #[test]
    fn test_generator_error_aborts_pass() {
        let mut calls = 0;
        let result: Result<Vec<_>, String> =
            try_extract_all_with("york", ["york", "bad", "new york"], RatioKind::Ratio, None, |c| {
                calls += 1;
                if *c == "bad" { Err(format!("cannot map {c}")) } else { Ok(*c) }
            });
        assert_eq!(result, Err("cannot map bad".to_string()));
        assert_eq!(calls, 2);

        let ok: Result<_, String> = try_extract_one_with("york", ["cork", "york"], RatioKind::Ratio, None, |c| Ok(*c));
        assert_eq!(ok.unwrap().map(|m| m.index), Some(1));
    }

    #[test]
    fn test_extract_ranks_and_limits() {
        let options = ExtractOptions { limit: Some(3), ..ExtractOptions::default() };
        let ranked = extract("York", CITIES, &options);
        assert_eq!(ranked.iter().map(|m| m.choice).collect::<Vec<_>>(), ["New York", "Yorkshire", "Cork"]);

        let all = extract("York", CITIES, &ExtractOptions { limit: None, ..ExtractOptions::default() });
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].choice, "NYC");
    }

    #[test]
    fn test_extract_options_default() {
        let options = ExtractOptions::default();
        assert_eq!(options.kind, RatioKind::WeightedRatio);
        assert_eq!(options.score_cutoff, None);
        assert_eq!(options.limit, Some(5));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let choices: Vec<String> = (0..200).map(|i| format!("choice number {i} york")).collect();
        let sequential = extract_all("number 42 york", &choices, RatioKind::WeightedRatio, Some(60.0));
        let parallel = extract_all_par("number 42 york", &choices, RatioKind::WeightedRatio, Some(60.0));
        assert_eq!(parallel.len(), sequential.len());
        for (p, s) in parallel.iter().zip(&sequential) {
            assert_eq!(p.index, s.index);
            assert_eq!(p.score, s.score);
        }
    }
}
