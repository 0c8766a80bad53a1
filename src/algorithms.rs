// SPDX-License-Identifier: MIT
// Edit-distance core.
// Bit-parallel LCS (Hyyrö) for Indel, Myers/Hyyrö bit-parallel for uniform
// Levenshtein. Both have a single-word (<= 64) path and a multi-word path.

use rustc_hash::FxHashMap;

pub trait HashableChar: Copy + Eq + std::hash::Hash + Ord {
    fn as_usize(&self) -> Option<usize>;
}
impl HashableChar for u8 {
    #[inline] fn as_usize(&self) -> Option<usize> { Some(*self as usize) }
}
impl HashableChar for u32 {
    #[inline] fn as_usize(&self) -> Option<usize> { if *self < 256 { Some(*self as usize) } else { None } }
}
impl HashableChar for char {
    #[inline] fn as_usize(&self) -> Option<usize> { let c = *self as u32; if c < 256 { Some(c as usize) } else { None } }
}

// ---------------------------------------------------------------------------
// Pattern match table
// ---------------------------------------------------------------------------

/// Per-character occurrence bit vectors of one sequence, split into 64-bit
/// words. Characters below 256 live in a flat table, everything else in a
/// hash map.
#[derive(Clone, Debug)]
pub struct BlockPattern<T: HashableChar> {
    len: usize,
    words: usize,
    ascii: Vec<u64>,
    extended: FxHashMap<T, Vec<u64>>,
}

impl<T: HashableChar> BlockPattern<T> {
    pub fn new(s: &[T]) -> Self {
        let words = s.len().div_ceil(64).max(1);
        let mut pm = BlockPattern {
            len: s.len(),
            words,
            ascii: vec![0u64; 256 * words],
            extended: FxHashMap::default(),
        };
        for (i, &c) in s.iter().enumerate() {
            pm.set_bit(c, i / 64, i % 64);
        }
        pm
    }

    #[inline(always)]
    fn set_bit(&mut self, c: T, word: usize, bit: usize) {
        if let Some(idx) = c.as_usize() {
            self.ascii[idx * self.words + word] |= 1u64 << bit;
        } else {
            let words = self.words;
            let entry = self.extended.entry(c).or_insert_with(|| vec![0u64; words]);
            entry[word] |= 1u64 << bit;
        }
    }

    #[inline(always)]
    pub fn get(&self, word: usize, c: T) -> u64 {
        if let Some(idx) = c.as_usize() {
            self.ascii[idx * self.words + word]
        } else {
            self.extended.get(&c).map_or(0, |v| v[word])
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn words(&self) -> usize {
        self.words
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[inline]
pub fn common_prefix<T: HashableChar>(s1: &[T], s2: &[T]) -> usize {
    s1.iter().zip(s2.iter()).take_while(|(a, b)| a == b).count()
}

#[inline]
pub fn common_suffix<T: HashableChar>(s1: &[T], s2: &[T]) -> usize {
    s1.iter()
        .rev()
        .zip(s2.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Strips the shared prefix and suffix; neither affects Indel or Levenshtein.
#[inline]
fn remove_common_affix<'a, T: HashableChar>(s1: &'a [T], s2: &'a [T]) -> (&'a [T], &'a [T]) {
    let pfx = common_prefix(s1, s2);
    let (s1, s2) = (&s1[pfx..], &s2[pfx..]);
    let sfx = common_suffix(s1, s2);
    (&s1[..s1.len() - sfx], &s2[..s2.len() - sfx])
}

/// Largest Indel distance that can still reach `score_cutoff` (0..=100).
#[inline]
pub fn score_cutoff_to_distance(score_cutoff: f64, lensum: usize) -> usize {
    (lensum as f64 * (1.0 - score_cutoff / 100.0)).max(0.0).ceil() as usize
}

/// Normalized similarity in 0..=100, or 0 when it falls below `score_cutoff`.
#[inline]
pub fn norm_distance(dist: usize, lensum: usize, score_cutoff: f64) -> f64 {
    let score = if lensum > 0 {
        100.0 * (1.0 - dist as f64 / lensum as f64)
    } else {
        100.0
    };
    if score >= score_cutoff { score } else { 0.0 }
}

// ---------------------------------------------------------------------------
// LCS (Hyyrö bit-parallel)
// ---------------------------------------------------------------------------

/// Minimum LCS that keeps `len1 + len2 - 2 * lcs <= max_dist`.
#[inline]
fn required_lcs(len1: usize, len2: usize, max_dist: Option<usize>) -> usize {
    match max_dist {
        Some(d) => {
            let lensum = len1 + len2;
            if lensum <= d { 0 } else { (lensum - d).div_ceil(2) }
        }
        None => 0,
    }
}

/// LCS of the pattern's sequence against `s2`. Returns 0 as soon as the scan
/// proves the LCS cannot reach `min_lcs`.
pub fn lcs_with_pattern<T: HashableChar>(pm: &BlockPattern<T>, s2: &[T], min_lcs: usize) -> usize {
    let m = pm.len();
    let n = s2.len();
    if m == 0 || n == 0 {
        return 0;
    }
    if min_lcs > m.min(n) {
        return 0;
    }
    if pm.words() == 1 {
        lcs_single_word(pm, s2, min_lcs)
    } else {
        lcs_multi_word(pm, s2, min_lcs)
    }
}

fn lcs_single_word<T: HashableChar>(pm: &BlockPattern<T>, s2: &[T], min_lcs: usize) -> usize {
    let m = pm.len();
    let n = s2.len();
    let mask = if m == 64 { !0u64 } else { (1u64 << m) - 1 };
    let mut v = !0u64;

    for (i, &c) in s2.iter().enumerate() {
        let x = pm.get(0, c);
        let u = v & x;
        v = v.wrapping_add(u) | (v & !x);
        if min_lcs > 0 {
            let current = (!v & mask).count_ones() as usize;
            let remaining = n - 1 - i;
            if current + remaining < min_lcs {
                return 0;
            }
        }
    }
    (!v & mask).count_ones() as usize
}

fn lcs_multi_word<T: HashableChar>(pm: &BlockPattern<T>, s2: &[T], min_lcs: usize) -> usize {
    let m = pm.len();
    let n = s2.len();
    let words = pm.words();
    let last_bits = if m % 64 == 0 { 64 } else { m % 64 };
    let mask = if last_bits == 64 { !0u64 } else { (1u64 << last_bits) - 1 };

    let count = |v: &[u64]| -> usize {
        let mut zeros = 0;
        for word in &v[..words - 1] {
            zeros += (!word).count_ones() as usize;
        }
        zeros + (!v[words - 1] & mask).count_ones() as usize
    };

    let mut v = vec![!0u64; words];
    for (i, &c) in s2.iter().enumerate() {
        let mut carry = 0u64;
        for (w, vw) in v.iter_mut().enumerate() {
            let x = pm.get(w, c);
            let u = *vw & x;
            let (t, c1) = vw.overflowing_add(u);
            let (sum, c2) = t.overflowing_add(carry);
            carry = (c1 | c2) as u64;
            *vw = sum | (*vw & !x);
        }
        if min_lcs > 0 {
            let remaining = n - 1 - i;
            if count(&v) + remaining < min_lcs {
                return 0;
            }
        }
    }
    count(&v)
}

/// Length of the longest common subsequence of `s1` and `s2`.
pub fn lcs_length<T: HashableChar>(s1: &[T], s2: &[T]) -> usize {
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }
    let (s1, s2) = if s1.len() <= s2.len() { (s1, s2) } else { (s2, s1) };
    lcs_with_pattern(&BlockPattern::new(s1), s2, 0)
}

// ---------------------------------------------------------------------------
// Indel
// ---------------------------------------------------------------------------

/// Insert/delete distance (`len1 + len2 - 2 * LCS`). Returns `None` when the
/// distance exceeds `max_dist`, possibly without finishing the scan.
pub fn indel_distance<T: HashableChar>(s1: &[T], s2: &[T], max_dist: Option<usize>) -> Option<usize> {
    if let Some(max) = max_dist {
        if s1.len().abs_diff(s2.len()) > max {
            return None;
        }
    }

    let (s1, s2) = remove_common_affix(s1, s2);
    // Pattern over the shorter side keeps the word count minimal.
    let (s1, s2) = if s1.len() <= s2.len() { (s1, s2) } else { (s2, s1) };
    let lcs = if s1.is_empty() {
        0
    } else {
        let min_lcs = required_lcs(s1.len(), s2.len(), max_dist);
        lcs_with_pattern(&BlockPattern::new(s1), s2, min_lcs)
    };
    let dist = s1.len() + s2.len() - 2 * lcs;
    match max_dist {
        Some(max) if dist > max => None,
        _ => Some(dist),
    }
}

/// Indel comparisons of one fixed sequence against many others. The pattern
/// table is built once in `new` and only read afterwards.
#[derive(Clone, Debug)]
pub struct IndelScorer<T: HashableChar = char> {
    s1: Vec<T>,
    pattern: BlockPattern<T>,
}

impl<T: HashableChar> IndelScorer<T> {
    pub fn new(s1: &[T]) -> Self {
        IndelScorer { s1: s1.to_vec(), pattern: BlockPattern::new(s1) }
    }

    pub fn len(&self) -> usize {
        self.s1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s1.is_empty()
    }

    pub fn sequence(&self) -> &[T] {
        &self.s1
    }

    pub fn distance(&self, s2: &[T], max_dist: Option<usize>) -> Option<usize> {
        let len1 = self.s1.len();
        if let Some(max) = max_dist {
            if len1.abs_diff(s2.len()) > max {
                return None;
            }
        }
        let min_lcs = required_lcs(len1, s2.len(), max_dist);
        let lcs = lcs_with_pattern(&self.pattern, s2, min_lcs);
        let dist = len1 + s2.len() - 2 * lcs;
        match max_dist {
            Some(max) if dist > max => None,
            _ => Some(dist),
        }
    }

    /// Similarity in 0..=100; 0 when below `score_cutoff`.
    pub fn normalized_similarity(&self, s2: &[T], score_cutoff: f64) -> f64 {
        if score_cutoff > 100.0 {
            return 0.0;
        }
        let lensum = self.s1.len() + s2.len();
        if lensum == 0 {
            return 100.0;
        }
        let max_dist = score_cutoff_to_distance(score_cutoff, lensum);
        match self.distance(s2, Some(max_dist)) {
            Some(dist) => norm_distance(dist, lensum, score_cutoff),
            None => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Levenshtein (uniform weights)
// ---------------------------------------------------------------------------

fn myers_single_word<T: HashableChar>(pm: &BlockPattern<T>, s2: &[T]) -> usize {
    let len1 = pm.len();
    let mut vp: u64 = !0u64;
    let mut vn: u64 = 0;
    let mut dist = len1;
    let last: u64 = 1u64 << (len1 - 1);

    for &c in s2 {
        let pm_j = pm.get(0, c);
        let x = pm_j | vn;
        let d0 = (((pm_j & vp).wrapping_add(vp)) ^ vp) | x;
        let hp = vn | !(d0 | vp);
        let hn = d0 & vp;
        if hp & last != 0 {
            dist += 1;
        }
        if hn & last != 0 {
            dist -= 1;
        }
        let hp = (hp << 1) | 1;
        let hn = hn << 1;
        vp = hn | !(d0 | hp);
        vn = hp & d0;
    }
    dist
}

fn myers_multi_word<T: HashableChar>(pm: &BlockPattern<T>, s2: &[T]) -> usize {
    let len1 = pm.len();
    let words = pm.words();
    let last_bits = if len1 % 64 == 0 { 64 } else { len1 % 64 };
    let valid_mask: u64 = if last_bits == 64 { !0u64 } else { (1u64 << last_bits) - 1 };
    let last: u64 = 1u64 << (last_bits - 1);

    let mut vp = vec![!0u64; words];
    let mut vn = vec![0u64; words];
    vp[words - 1] = valid_mask;
    let mut dist = len1;

    for &c in s2 {
        let mut add_carry = 0u64;
        let mut hp_carry = 1u64;
        let mut hn_carry = 0u64;

        for w in 0..words {
            let pm_j = pm.get(w, c);
            let pv = vp[w];
            let nv = vn[w];

            let (t, c1) = (pm_j & pv).overflowing_add(add_carry);
            let (sum, c2) = t.overflowing_add(pv);
            add_carry = (c1 | c2) as u64;
            let d0 = (sum ^ pv) | pm_j | nv;

            let hp = nv | !(d0 | pv);
            let hn = d0 & pv;

            if w == words - 1 {
                if hp & last != 0 {
                    dist += 1;
                }
                if hn & last != 0 {
                    dist -= 1;
                }
            }

            let hp_shifted = (hp << 1) | hp_carry;
            let hn_shifted = (hn << 1) | hn_carry;
            hp_carry = hp >> 63;
            hn_carry = hn >> 63;
            vp[w] = hn_shifted | !(d0 | hp_shifted);
            vn[w] = hp_shifted & d0;
        }
        vp[words - 1] &= valid_mask;
        vn[words - 1] &= valid_mask;
    }
    dist
}

/// Minimum number of single-character insertions, deletions and
/// substitutions turning `s1` into `s2`. `None` when above `max_dist`.
pub fn levenshtein_distance<T: HashableChar>(s1: &[T], s2: &[T], max_dist: Option<usize>) -> Option<usize> {
    if let Some(max) = max_dist {
        if s1.len().abs_diff(s2.len()) > max {
            return None;
        }
    }

    let (s1, s2) = remove_common_affix(s1, s2);
    let (s1, s2) = if s1.len() <= s2.len() { (s1, s2) } else { (s2, s1) };
    let dist = if s1.is_empty() {
        s2.len()
    } else {
        let pm = BlockPattern::new(s1);
        if pm.words() == 1 { myers_single_word(&pm, s2) } else { myers_multi_word(&pm, s2) }
    };
    match max_dist {
        Some(max) if dist > max => None,
        _ => Some(dist),
    }
}
