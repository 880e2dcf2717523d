//! Normalized lookup index over an offline word→gloss dictionary.
//!
//! The source dictionary is a flat JSON object mapping headwords to short
//! target-language glosses, with mixed casing and full diacritics across
//! keys. The index rekeys every entry twice: under the case-folded headword
//! and under the folded headword with combining marks stripped. Buckets
//! append, so several headwords collapsing to one normalized key are all
//! retained in source order, and a lookup that finds nothing returns an
//! empty slice rather than an error.
//!
//! The index is built once and read-only thereafter; it can be shared across
//! threads without synchronization.
//!
//! # Example
//! ```no_run
//! use palidict_index::GlossIndex;
//!
//! # fn main() -> anyhow::Result<()> {
//! let index = GlossIndex::load("pali_dictionary.json")?;
//! if let Some(entry) = index.first("buddho") {
//!     println!("{} -> {}", entry.headword, entry.gloss);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p palidict-index --example stats -- <dict.json>`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use palidict_types::{fold, strip_marks};

/// A source dictionary pair: the headword as written, and its gloss.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlossEntry {
    pub headword: String,
    pub gloss: String,
}

/// Read-only index from normalized keys to insertion-ordered entries.
#[derive(Debug)]
pub struct GlossIndex {
    buckets: HashMap<String, Vec<GlossEntry>>,
    entry_count: usize,
}

impl GlossIndex {
    /// Build the index from `(headword, gloss)` pairs in source order.
    pub fn build<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut buckets: HashMap<String, Vec<GlossEntry>> = HashMap::new();
        let mut entry_count = 0usize;
        for (headword, gloss) in pairs {
            let entry = GlossEntry { headword, gloss };
            let folded = fold(&entry.headword);
            let bare = strip_marks(&folded);
            if bare != folded {
                buckets.entry(bare).or_default().push(entry.clone());
            }
            buckets.entry(folded).or_default().push(entry);
            entry_count += 1;
        }
        Self {
            buckets,
            entry_count,
        }
    }

    /// Parse a JSON dictionary object into an index.
    ///
    /// Fails if the document is not an object or any value is not a string;
    /// a malformed dictionary is fatal here, before any lookup runs.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(raw).context("dictionary is not a JSON object")?;
        let mut pairs = Vec::with_capacity(map.len());
        for (headword, value) in map {
            match value {
                serde_json::Value::String(gloss) => pairs.push((headword, gloss)),
                other => {
                    bail!("dictionary entry {headword:?} must map to a string gloss, got {other}")
                }
            }
        }
        Ok(Self::build(pairs))
    }

    /// Load and parse a dictionary file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read dictionary {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parse dictionary {}", path.display()))
    }

    /// All entries bucketed under a normalized key, in source order.
    pub fn entries(&self, key: &str) -> &[GlossEntry] {
        static EMPTY: [GlossEntry; 0] = [];
        self.buckets
            .get(key)
            .map(|v| v.as_slice())
            .unwrap_or(&EMPTY)
    }

    /// The first entry for a normalized key; the one every lookup tier applies.
    pub fn first(&self, key: &str) -> Option<&GlossEntry> {
        self.buckets.get(key).and_then(|bucket| bucket.first())
    }

    /// Whether any entry is bucketed under the key.
    pub fn contains(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    /// Number of source dictionary pairs indexed.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Number of distinct normalized keys.
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }
}
