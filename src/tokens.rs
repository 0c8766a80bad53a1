// SPDX-License-Identifier: MIT
// Whitespace tokenizer with sorted and set (deduplicated) forms.

/// Tokens of a sentence in ascending lexicographic order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedTokens {
    tokens: Vec<String>,
}

impl SortedTokens {
    /// Splits on runs of whitespace; leading and trailing whitespace yields
    /// no empty tokens.
    pub fn split(s: &str) -> Self {
        let mut tokens: Vec<String> = s.split_whitespace().map(str::to_string).collect();
        tokens.sort();
        SortedTokens { tokens }
    }

    fn from_sorted(tokens: Vec<String>) -> Self {
        SortedTokens { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens rejoined with single spaces.
    pub fn join(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn join_chars(&self) -> Vec<char> {
        let mut out = Vec::with_capacity(self.char_len());
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.extend(token.chars());
        }
        out
    }

    /// Char count of `join()`.
    pub fn char_len(&self) -> usize {
        let chars: usize = self.tokens.iter().map(|t| t.chars().count()).sum();
        chars + self.tokens.len().saturating_sub(1)
    }

    /// Same tokens with exact duplicates removed.
    pub fn dedup(&self) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.dedup();
        SortedTokens { tokens }
    }
}

/// Token-set split of two sentences, every part sorted and deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetDecomposition {
    pub intersection: SortedTokens,
    pub difference_ab: SortedTokens,
    pub difference_ba: SortedTokens,
}

pub fn set_decomposition(a: &SortedTokens, b: &SortedTokens) -> SetDecomposition {
    let a = a.dedup();
    let b = b.dedup();

    let mut intersection = Vec::new();
    let mut difference_ab = Vec::new();
    let mut difference_ba = Vec::new();

    // Merge walk over two sorted, deduplicated lists.
    let (mut i, mut j) = (0, 0);
    while i < a.tokens.len() && j < b.tokens.len() {
        match a.tokens[i].cmp(&b.tokens[j]) {
            std::cmp::Ordering::Equal => {
                intersection.push(a.tokens[i].clone());
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                difference_ab.push(a.tokens[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                difference_ba.push(b.tokens[j].clone());
                j += 1;
            }
        }
    }
    difference_ab.extend(a.tokens[i..].iter().cloned());
    difference_ba.extend(b.tokens[j..].iter().cloned());

    SetDecomposition {
        intersection: SortedTokens::from_sorted(intersection),
        difference_ab: SortedTokens::from_sorted(difference_ab),
        difference_ba: SortedTokens::from_sorted(difference_ba),
    }
}

/// Sentence with its tokens sorted and rejoined.
pub fn token_sort(s: &str) -> String {
    SortedTokens::split(s).join()
}

/// Sentence with its tokens sorted, deduplicated and rejoined.
pub fn token_set(s: &str) -> String {
    SortedTokens::split(s).dedup().join()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_collapses_whitespace() {
        let tokens = SortedTokens::split("  new\tyork \n mets  ");
        assert_eq!(tokens.tokens(), ["mets", "new", "york"]);
        assert_eq!(tokens.word_count(), 3);
        assert!(SortedTokens::split(" \t ").is_empty());
    }

    #[test]
    fn test_token_sort_and_set() {
        assert_eq!(token_sort("fuzzy wuzzy was a bear"), "a bear fuzzy was wuzzy");
        assert_eq!(token_sort("fuzzy fuzzy was a bear"), "a bear fuzzy fuzzy was");
        assert_eq!(token_set("fuzzy fuzzy was a bear"), "a bear fuzzy was");
        assert_eq!(token_sort(""), "");
    }

    #[test]
    fn test_sort_is_by_code_point() {
        assert_eq!(token_sort("b B a A é"), "A B a b é");
    }

    #[test]
    fn test_join_chars_and_len() {
        let tokens = SortedTokens::split("ünï côdé x");
        assert_eq!(tokens.join_chars(), tokens.join().chars().collect::<Vec<_>>());
        assert_eq!(tokens.char_len(), tokens.join().chars().count());
        assert_eq!(SortedTokens::default().char_len(), 0);
    }

    #[test]
    fn test_set_decomposition() {
        let a = SortedTokens::split("new york mets vs atlanta braves braves");
        let b = SortedTokens::split("atlanta braves vs new york yankees");
        let dec = set_decomposition(&a, &b);
        assert_eq!(dec.intersection.join(), "atlanta braves new vs york");
        assert_eq!(dec.difference_ab.join(), "mets");
        assert_eq!(dec.difference_ba.join(), "yankees");
    }

    #[test]
    fn test_set_decomposition_disjoint() {
        let dec = set_decomposition(&SortedTokens::split("a{"), &SortedTokens::split("{b"));
        assert!(dec.intersection.is_empty());
        assert_eq!(dec.difference_ab.join(), "a{");
        assert_eq!(dec.difference_ba.join(), "{b");
    }
}
