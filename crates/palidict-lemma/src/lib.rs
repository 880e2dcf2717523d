//! Approximate lemmatization for Pali word forms.
//!
//! No morphological analysis happens here: a fixed table of inflectional
//! endings is stripped off the query, longest ending first, and every
//! candidate key is offered to a caller-provided lookup. The crate is
//! intentionally decoupled from any particular index; it only sees the
//! callback you supply.
//!
//! # The fallback chain
//! 1. The case-folded form, exact.
//! 2. The folded form with one table ending removed, longest ending first;
//!    a candidate is only produced when the remaining stem is longer than
//!    one character.
//! 3. The folded form with combining marks stripped, exact.
//! 4. The mark-stripped form under the same ending rule.
//!
//! The first candidate the lookup accepts wins, and the winner carries
//! [`MatchTier`] provenance.
//!
//! # Example
//! ```no_run
//! use palidict_index::GlossIndex;
//! use palidict_lemma::resolve;
//!
//! # fn main() -> anyhow::Result<()> {
//! let index = GlossIndex::load("pali_dictionary.json")?;
//! if let Some(hit) = resolve("Dhammassa", |key| index.first(key)) {
//!     println!("{} via {}: {}", hit.key, hit.tier, hit.value.gloss);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see
//! `cargo run -p palidict-lemma --example resolve -- <dict.json> <word>`.

use std::cmp::Reverse;
use std::collections::HashSet;

use palidict_types::{MatchTier, fold, strip_marks};

/// Inflectional endings stripped during lookup, in declaration order.
///
/// Equal-length endings keep table order when ranked; that ordering is
/// carried over from the original word list, not a linguistic claim.
pub const SUFFIXES: [&str; 21] = [
    "ssa", "nnaṃ", "naṃ", "hi", "su", "ṃ", "o", "aṃ", "ā", "a", "i", "e", "u", "yo", "ya", "ena",
    "āya", "ato", "amhākaṃ", "ttha", "nti",
];

/// A normalized key to try against an index, with its provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LookupCandidate {
    pub key: String,
    pub tier: MatchTier,
}

/// A successful resolution: the accepted value, the key that matched, and
/// the tier that produced it.
#[derive(Clone, Debug)]
pub struct Resolution<T> {
    pub value: T,
    pub key: String,
    pub tier: MatchTier,
}

/// Stems obtained by removing one table ending, longest ending first.
///
/// Stems of one character or less are never produced; they would match far
/// too much of the dictionary.
pub fn stem_candidates(word: &str) -> Vec<(String, &'static str)> {
    let word_len = word.chars().count();
    let mut out = Vec::new();
    for suffix in ranked_suffixes() {
        if word_len > suffix.chars().count() + 1
            && let Some(stem) = word.strip_suffix(suffix)
        {
            out.push((stem.to_string(), suffix));
        }
    }
    out
}

fn ranked_suffixes() -> Vec<&'static str> {
    let mut ranked = SUFFIXES.to_vec();
    // Stable sort: equal lengths keep table order.
    ranked.sort_by_key(|suffix| Reverse(suffix.chars().count()));
    ranked
}

/// All keys to try for a surface form, in fallback-chain order.
///
/// Candidates deduplicate on the key, keeping the earliest tier, so a form
/// without combining marks does not retry its own keys in the mark-stripped
/// tiers.
pub fn candidates(core: &str) -> Vec<LookupCandidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<LookupCandidate> = Vec::new();

    let folded = fold(core);
    let bare = strip_marks(&folded);

    push_unique(&mut out, &mut seen, folded.clone(), MatchTier::Exact);
    for (stem, suffix) in stem_candidates(&folded) {
        push_unique(&mut out, &mut seen, stem, MatchTier::Stemmed { suffix });
    }
    push_unique(&mut out, &mut seen, bare.clone(), MatchTier::Unmarked);
    for (stem, suffix) in stem_candidates(&bare) {
        push_unique(&mut out, &mut seen, stem, MatchTier::UnmarkedStemmed {
            suffix,
        });
    }

    out
}

fn push_unique(
    out: &mut Vec<LookupCandidate>,
    seen: &mut HashSet<String>,
    key: String,
    tier: MatchTier,
) {
    if seen.insert(key.clone()) {
        out.push(LookupCandidate { key, tier });
    }
}

/// Walk the fallback chain, returning the first candidate the lookup accepts.
///
/// The lookup typically delegates to `GlossIndex::first`, keeping this crate
/// ignorant of any concrete index layout. Resolution is deterministic: the
/// same core against the same lookup always yields the same result.
pub fn resolve<T, F>(core: &str, mut lookup: F) -> Option<Resolution<T>>
where
    F: FnMut(&str) -> Option<T>,
{
    for candidate in candidates(core) {
        if let Some(value) = lookup(&candidate.key) {
            return Some(Resolution {
                value,
                key: candidate.key,
                tier: candidate.tier,
            });
        }
    }
    None
}
