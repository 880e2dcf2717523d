//! The per-line drafting engine.
//!
//! Each line is tokenized, every word core is resolved through the fallback
//! chain, and the processed tokens are reassembled into an output line.
//! Usage counts and unknown words accumulate as explicit per-line partial
//! results absorbed in input order, never as ambient shared state, so the
//! sequential and parallel passes produce identical reports.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use palidict_index::GlossIndex;
use palidict_lemma::resolve;
use palidict_types::fold;
use rayon::prelude::*;
use tracing::debug;

use crate::tokenize::{EDGE_PUNCT, Token, tokenize};

/// Knobs for a drafting run.
#[derive(Clone, Debug)]
pub struct DraftOptions {
    /// Keep unresolved cores visible as `<core>` instead of leaving them bare.
    pub keep_unknown: bool,
    /// Lowercase substituted glosses; line-start capitalization still applies
    /// afterwards.
    pub lower_gloss: bool,
    /// Characters stripped from word edges before lookup.
    pub edge_punct: String,
}

impl Default for DraftOptions {
    fn default() -> Self {
        Self {
            keep_unknown: false,
            lower_gloss: false,
            edge_punct: EDGE_PUNCT.to_string(),
        }
    }
}

/// One processed line plus its contribution to the run accumulators.
#[derive(Clone, Debug)]
pub struct LineDraft {
    /// The reassembled output line.
    pub text: String,
    /// `(headword, gloss)` per successful resolution, in token order.
    hits: Vec<(String, String)>,
    /// Folded cores that failed every tier.
    misses: Vec<String>,
}

/// A usage-table row: dictionary headword, last applied gloss, hit count.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UsageRow {
    pub headword: String,
    pub gloss: String,
    pub count: u64,
}

/// Everything a drafting run produces.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DraftReport {
    /// One entry per input line; order and blank lines preserved.
    pub lines: Vec<String>,
    /// Headwords by descending hit count, ties by first appearance.
    pub usage: Vec<UsageRow>,
    /// Sorted folded cores that never resolved.
    pub unknown: Vec<String>,
}

/// Draft a single line against the index.
///
/// Lookup misses are a normal outcome: the core stays in place (optionally
/// wrapped) and is reported through the returned partial result.
pub fn draft_line(line: &str, index: &GlossIndex, opts: &DraftOptions) -> LineDraft {
    let mut out = String::with_capacity(line.len());
    let mut hits = Vec::new();
    let mut misses = Vec::new();

    for token in tokenize(line, &opts.edge_punct) {
        match token {
            Token::Whitespace(run) => out.push_str(run),
            Token::Word(word) => {
                out.push_str(word.prefix);
                if word.core.is_empty() {
                    // Punctuation-only run; nothing to look up.
                } else if let Some(hit) = resolve(word.core, |key| index.first(key)) {
                    if opts.lower_gloss {
                        out.push_str(&hit.value.gloss.to_lowercase());
                    } else {
                        out.push_str(&hit.value.gloss);
                    }
                    hits.push((hit.value.headword.clone(), hit.value.gloss.clone()));
                } else {
                    if opts.keep_unknown {
                        out.push('<');
                        out.push_str(word.core);
                        out.push('>');
                    } else {
                        out.push_str(word.core);
                    }
                    misses.push(fold(word.core));
                }
                out.push_str(word.suffix);
            }
        }
    }

    LineDraft {
        text: finish_line(&out),
        hits,
        misses,
    }
}

/// Draft every line in order.
pub fn draft_lines<S: AsRef<str>>(
    lines: &[S],
    index: &GlossIndex,
    opts: &DraftOptions,
) -> DraftReport {
    assemble(
        lines
            .iter()
            .map(|line| draft_line(line.as_ref(), index, opts))
            .collect(),
    )
}

/// Draft lines across threads.
///
/// Lines are independent and the index is read-only; per-line partial
/// results are absorbed in input order afterwards, so the report is
/// identical to [`draft_lines`].
pub fn draft_lines_parallel<S: AsRef<str> + Sync>(
    lines: &[S],
    index: &GlossIndex,
    opts: &DraftOptions,
) -> DraftReport {
    assemble(
        lines
            .par_iter()
            .map(|line| draft_line(line.as_ref(), index, opts))
            .collect(),
    )
}

fn assemble(drafts: Vec<LineDraft>) -> DraftReport {
    let mut tally = UsageTally::default();
    let mut unknown = BTreeSet::new();
    let mut lines = Vec::with_capacity(drafts.len());
    for draft in drafts {
        lines.push(draft.text);
        for (headword, gloss) in draft.hits {
            tally.record(headword, gloss);
        }
        for miss in draft.misses {
            unknown.insert(miss);
        }
    }
    let usage = tally.into_rows();
    debug!(
        lines = lines.len(),
        glossed = usage.len(),
        unknown = unknown.len(),
        "draft assembled"
    );
    DraftReport {
        lines,
        usage,
        unknown: unknown.into_iter().collect(),
    }
}

/// Trim the assembled line and uppercase its first character only.
fn finish_line(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Default)]
struct UsageTally {
    cells: HashMap<String, TallyCell>,
    next_rank: u64,
}

struct TallyCell {
    count: u64,
    first_seen: u64,
    gloss: String,
}

impl UsageTally {
    fn record(&mut self, headword: String, gloss: String) {
        match self.cells.entry(headword) {
            Entry::Occupied(mut cell) => {
                let cell = cell.get_mut();
                cell.count += 1;
                cell.gloss = gloss;
            }
            Entry::Vacant(slot) => {
                slot.insert(TallyCell {
                    count: 1,
                    first_seen: self.next_rank,
                    gloss,
                });
                self.next_rank += 1;
            }
        }
    }

    fn into_rows(self) -> Vec<UsageRow> {
        let mut cells: Vec<(String, TallyCell)> = self.cells.into_iter().collect();
        cells.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then(a.first_seen.cmp(&b.first_seen))
        });
        cells
            .into_iter()
            .map(|(headword, cell)| UsageRow {
                headword,
                gloss: cell.gloss,
                count: cell.count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> GlossIndex {
        GlossIndex::build(
            [
                ("buddho", "the awakened one"),
                ("dhammaṃ", "the teaching"),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn drafts_known_words_and_tracks_unknowns() {
        let report = draft_lines(
            &["Buddho dhammaṃ deseti."],
            &sample_index(),
            &DraftOptions::default(),
        );
        assert_eq!(report.lines, vec![
            "The awakened one the teaching deseti.".to_string()
        ]);
        assert_eq!(report.unknown, vec!["deseti".to_string()]);
        assert_eq!(report.usage.len(), 2);
    }

    #[test]
    fn keep_unknown_wraps_misses_inside_their_punctuation() {
        let opts = DraftOptions {
            keep_unknown: true,
            ..DraftOptions::default()
        };
        let report = draft_lines(&["Buddho dhammaṃ deseti."], &sample_index(), &opts);
        assert_eq!(report.lines, vec![
            "The awakened one the teaching <deseti>.".to_string()
        ]);
    }

    #[test]
    fn lower_gloss_applies_before_line_start_capitalization() {
        let index = GlossIndex::build([
            ("buddho".to_string(), "The Awakened One".to_string()),
            ("dhammaṃ".to_string(), "the teaching".to_string()),
        ]);
        let opts = DraftOptions {
            lower_gloss: true,
            ..DraftOptions::default()
        };
        let report = draft_lines(&["dhammaṃ buddho."], &index, &opts);
        assert_eq!(report.lines, vec![
            "The teaching the awakened one.".to_string()
        ]);
        // The raw gloss, not the lowercased rendering, lands in the table.
        let row = report.usage.iter().find(|r| r.headword == "buddho").unwrap();
        assert_eq!(row.gloss, "The Awakened One");
    }

    #[test]
    fn usage_orders_by_count_then_first_seen() {
        let index = GlossIndex::build(
            [("aa", "1"), ("bb", "2"), ("cc", "3")]
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        // First seen: aa, cc, bb; counts: aa 3, bb 3, cc 1.
        let report = draft_lines(
            &["aa cc bb", "aa bb aa bb"],
            &index,
            &DraftOptions::default(),
        );
        let order: Vec<&str> = report.usage.iter().map(|r| r.headword.as_str()).collect();
        assert_eq!(order, vec!["aa", "bb", "cc"]);
        assert_eq!(report.usage[0].count, 3);
        assert_eq!(report.usage[2].count, 1);
    }

    #[test]
    fn different_surface_forms_aggregate_on_one_headword() {
        let index = GlossIndex::build([("dhammaṃ".to_string(), "the teaching".to_string())]);
        let report = draft_lines(
            &["dhammaṃ DHAMMAṂ dhammam"],
            &index,
            &DraftOptions::default(),
        );
        assert_eq!(report.usage, vec![UsageRow {
            headword: "dhammaṃ".to_string(),
            gloss: "the teaching".to_string(),
            count: 3,
        }]);
        assert!(report.unknown.is_empty());
    }

    #[test]
    fn parallel_report_matches_sequential() {
        let index = sample_index();
        let lines = [
            "Buddho dhammaṃ deseti.",
            "",
            "Namo tassa bhagavato buddho!",
            "  dhammaṃ   dhammaṃ  ",
        ];
        let opts = DraftOptions {
            keep_unknown: true,
            ..DraftOptions::default()
        };
        assert_eq!(
            draft_lines(&lines, &index, &opts),
            draft_lines_parallel(&lines, &index, &opts)
        );
    }

    #[test]
    fn empty_input_yields_an_empty_report() {
        let report = draft_lines::<&str>(&[], &sample_index(), &DraftOptions::default());
        assert!(report.lines.is_empty());
        assert!(report.usage.is_empty());
        assert!(report.unknown.is_empty());
    }

    #[test]
    fn blank_lines_are_preserved() {
        let report = draft_lines(
            &["buddho", "", "   ", "buddho"],
            &sample_index(),
            &DraftOptions::default(),
        );
        assert_eq!(report.lines.len(), 4);
        assert_eq!(report.lines[1], "");
        assert_eq!(report.lines[2], "", "whitespace-only lines trim to empty");
    }

    #[test]
    fn unknown_words_are_folded_and_deduplicated() {
        let report = draft_lines(
            &["Deseti deseti DESETI", "zzz deseti"],
            &sample_index(),
            &DraftOptions::default(),
        );
        assert_eq!(report.unknown, vec![
            "deseti".to_string(),
            "zzz".to_string()
        ]);
    }
}
