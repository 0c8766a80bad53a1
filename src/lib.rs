// SPDX-License-Identifier: MIT
//! Fuzzy string similarity
//!
//! Edit-distance based ratios in the 0..=100 range, token-aware variants,
//! a weighted combiner, reusable cached queries and batch extraction.
//!
//! # Features
//!
//! - `parallel` - Parallel extraction over slices via rayon
//!
//! # Example
//!
//! ```rust
//! use fuzzratio::{fuzz, process, RatioKind};
//!
//! assert_eq!(fuzz::token_sort_ratio("fuzzy wuzzy was a bear", "wuzzy fuzzy was a bear", None), 100.0);
//!
//! let best = process::extract_one("York", ["New York", "Yorkshire", "NYC", "Cork"], RatioKind::WeightedRatio, None);
//! assert_eq!(best.map(|m| m.choice), Some("New York"));
//! ```

pub mod algorithms;
pub mod cached;
pub mod error;
pub mod fuzz;
pub mod process;
pub mod tokens;
pub mod types;
pub mod utils;

// Re-export main types at crate root
pub use cached::CachedQuery;
pub use error::{FuzzError, Result};
pub use fuzz::{
    partial_ratio, partial_ratio_alignment, partial_token_ratio, partial_token_set_ratio,
    partial_token_sort_ratio, qratio, ratio, ratio_with_kind, token_ratio, token_set_ratio,
    token_sort_ratio, wratio,
};
pub use process::{extract, extract_all, extract_one, Choices, ExtractOptions};
pub use types::{Match, RatioKind, ScoreAlignment};
pub use utils::default_process;
