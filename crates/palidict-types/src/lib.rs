//! Shared normalization primitives for the palidict crates.
//!
//! Dictionary headwords and query words meet in a normalized space:
//! case-folded, or case-folded with combining marks removed after canonical
//! decomposition. [`fold`] and [`strip_marks`] define that space;
//! [`MatchTier`] records which normalization a successful lookup went
//! through, so callers can tell an exact hit from a stemmed or
//! diacritic-folded one.
//!
//! ```rust
//! use palidict_types::{MatchTier, fold, strip_marks};
//!
//! assert_eq!(fold("Dhammaṃ"), "dhammaṃ");
//! assert_eq!(strip_marks("dhammā"), "dhamma");
//! assert_eq!(MatchTier::Stemmed { suffix: "ssa" }.to_string(), "stemmed(-ssa)");
//! ```

use std::fmt;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Which step of the fallback chain produced a matching key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MatchTier {
    /// The case-folded surface form matched as-is.
    Exact,
    /// The folded form matched after one inflectional ending was removed.
    Stemmed { suffix: &'static str },
    /// The folded form matched once combining marks were stripped.
    Unmarked,
    /// Mark-stripped and stemmed; the last resort.
    UnmarkedStemmed { suffix: &'static str },
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Exact => f.write_str("exact"),
            MatchTier::Stemmed { suffix } => write!(f, "stemmed(-{suffix})"),
            MatchTier::Unmarked => f.write_str("unmarked"),
            MatchTier::UnmarkedStemmed { suffix } => write!(f, "unmarked-stemmed(-{suffix})"),
        }
    }
}

/// Case-fold a word for index keys and queries.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Remove combining marks after compatibility decomposition.
///
/// `dhammā` becomes `dhamma`, `ṃ` becomes `m`; text without marks passes
/// through unchanged.
pub fn strip_marks(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}
