//! Translation-bundle documents and their Markdown rendering.
//!
//! A bundle pairs source and draft lines with optional footnotes and a
//! glossary. Rendering numbers `{{fn:ID}}` markers in order of first sight,
//! links each glossary term at its first occurrence only, and produces the
//! Markdown page, cleaned CSV lines, and a standalone footnote listing.
//!
//! Both substitution passes are explicit forward scans: the footnote pass
//! collects `(span, replacement)` edits and applies them afterwards, and the
//! glossary pass keeps a visited set of already-linked terms. Nothing
//! depends on callback evaluation order inside a regex engine.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use palidict_types::strip_marks;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A translation bundle document, the shape written as `my_input.json`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BundleDoc {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub pali: Vec<String>,
    #[serde(default)]
    pub english: Vec<String>,
    #[serde(default)]
    pub footnotes: BTreeMap<String, String>,
    #[serde(default)]
    pub glossary: BTreeMap<String, String>,
}

fn default_title() -> String {
    "Untitled".to_string()
}

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to read bundle: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse bundle: {0}")]
    Json(#[from] serde_json::Error),
}

impl BundleDoc {
    /// Read one bundle document from a JSON file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Rendered artifacts for one bundle document.
#[derive(Clone, Debug)]
pub struct RenderedBundle {
    /// Slug derived from the title; the base name for output files.
    pub slug: String,
    /// The Markdown page.
    pub markdown: String,
    /// Rendered lines with Markdown stripped, for the CSV column.
    pub csv_lines: Vec<String>,
    /// Standalone footnote listing, present when any footnote was referenced.
    pub footnotes_markdown: Option<String>,
}

/// Render one bundle document.
pub fn render(doc: &BundleDoc) -> RenderedBundle {
    let mut numbering = FootnoteNumbering::default();
    let mut linker = GlossaryLinker::new(&doc.glossary);

    let mut out_lines = Vec::with_capacity(doc.english.len());
    for line in &doc.english {
        let stripped = line.trim_start();
        let is_verse = stripped.starts_with("~ ");
        let mut body = if is_verse {
            stripped[2..].to_string()
        } else {
            line.clone()
        };
        body = linker.link_once(&body);
        body = numbering.apply(&body);
        if is_verse {
            body = format!("*{}*", body.trim());
        }
        out_lines.push(body);
    }

    let slug = match slugify(&doc.title) {
        s if s.is_empty() => "output".to_string(),
        s => s,
    };

    let mut parts: Vec<String> = vec![format!("# {}\n", doc.title)];
    parts.extend(out_lines.iter().filter(|l| !l.trim().is_empty()).cloned());
    parts.push(String::new());

    if !numbering.is_empty() {
        parts.push("## Footnotes\n".to_string());
        for (number, id) in numbering.in_order() {
            parts.push(format!("[{number}] {}", note_text(doc, id)));
        }
        parts.push(String::new());
    }

    if !doc.glossary.is_empty() {
        parts.push("## Glossary\n".to_string());
        let mut terms: Vec<&String> = doc.glossary.keys().collect();
        terms.sort_by_key(|term| slugify(term));
        for term in terms {
            parts.push(format!("<a id=\"glossary-{}\"></a>", slugify(term)));
            parts.push(format!("**{}** — {}\n", term, doc.glossary[term.as_str()]));
        }
    }

    let markdown = format!("{}\n", parts.join("\n").trim());
    let csv_lines = out_lines.iter().map(|line| strip_markdown(line)).collect();

    let footnotes_markdown = (!numbering.is_empty()).then(|| {
        let mut parts = vec![format!("# Footnotes for “{}”\n", doc.title)];
        for (number, id) in numbering.in_order() {
            parts.push(format!("[{number}] {}", note_text(doc, id)));
        }
        parts.push(String::new());
        parts.join("\n")
    });

    RenderedBundle {
        slug,
        markdown,
        csv_lines,
        footnotes_markdown,
    }
}

fn note_text<'a>(doc: &'a BundleDoc, id: &str) -> &'a str {
    doc.footnotes
        .get(id)
        .map(String::as_str)
        .unwrap_or("(Missing note)")
}

/// Lowercased ASCII slug: marks stripped, non-alphanumeric runs collapsed to
/// single dashes, edges trimmed.
pub fn slugify(text: &str) -> String {
    let bare = strip_marks(text);
    let mut slug = String::with_capacity(bare.len());
    let mut pending_dash = false;
    for c in bare.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Assigns footnote numbers in order of first sight across a document.
#[derive(Default)]
struct FootnoteNumbering {
    numbers: HashMap<String, usize>,
    order: Vec<String>,
}

impl FootnoteNumbering {
    /// Replace `{{fn:ID}}` markers with `[n]`, assigning numbers on first
    /// sight. One forward scan collects the edits; application follows.
    fn apply(&mut self, line: &str) -> String {
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        for caps in marker_pattern().captures_iter(line) {
            let whole = caps.get(0).expect("whole match always present");
            let id = &caps[1];
            let number = match self.numbers.get(id) {
                Some(number) => *number,
                None => {
                    let number = self.order.len() + 1;
                    self.numbers.insert(id.to_string(), number);
                    self.order.push(id.to_string());
                    number
                }
            };
            edits.push((whole.range(), format!("[{number}]")));
        }
        apply_edits(line, edits)
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(number, id)` pairs in numbering order.
    fn in_order(&self) -> impl Iterator<Item = (usize, &str)> {
        self.order
            .iter()
            .enumerate()
            .map(|(idx, id)| (idx + 1, id.as_str()))
    }
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{fn:([A-Za-z0-9_\-]+)\}\}").expect("static pattern"))
}

/// Apply non-overlapping `(span, replacement)` edits collected by a scan.
fn apply_edits(line: &str, edits: Vec<(Range<usize>, String)>) -> String {
    if edits.is_empty() {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for (span, replacement) in edits {
        out.push_str(&line[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&line[cursor..]);
    out
}

/// Links each glossary term at its first occurrence across a document.
struct GlossaryLinker {
    terms: Vec<LinkTerm>,
    visited: HashSet<usize>,
}

struct LinkTerm {
    slug: String,
    pattern: Regex,
}

impl GlossaryLinker {
    fn new(glossary: &BTreeMap<String, String>) -> Self {
        let mut ordered: Vec<&String> = glossary.keys().collect();
        // Longest first so "dhamma wheel" wins over "dhamma".
        ordered.sort_by_key(|term| Reverse(term.chars().count()));
        let terms = ordered
            .into_iter()
            .map(|term| LinkTerm {
                slug: slugify(term),
                pattern: RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
                    .case_insensitive(true)
                    .build()
                    .expect("escaped term is a valid pattern"),
            })
            .collect();
        Self {
            terms,
            visited: HashSet::new(),
        }
    }

    /// Link every not-yet-visited term at its first match in `line`.
    ///
    /// All terms are matched against the unedited line and claim
    /// non-overlapping spans, longest term first; the edits are applied in
    /// one pass afterwards, so a replacement is never re-scanned. A match
    /// directly preceded by `[` is already link text and is skipped.
    fn link_once(&mut self, line: &str) -> String {
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        let mut claimed: Vec<Range<usize>> = Vec::new();
        for idx in 0..self.terms.len() {
            if self.visited.contains(&idx) {
                continue;
            }
            let term = &self.terms[idx];
            let found = term.pattern.find_iter(line).find(|m| {
                !preceded_by_bracket(line, m.start())
                    && !claimed.iter().any(|span| overlaps(span, &m.range()))
            });
            if let Some(m) = found {
                claimed.push(m.range());
                edits.push((
                    m.range(),
                    format!("[{}](#glossary-{})", m.as_str(), term.slug),
                ));
                self.visited.insert(idx);
            }
        }
        edits.sort_by_key(|(span, _)| span.start);
        apply_edits(line, edits)
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn preceded_by_bracket(text: &str, at: usize) -> bool {
    text[..at].chars().next_back() == Some('[')
}

/// Strip rendered Markdown for the CSV column: footnote references, link
/// syntax, the verse marker, and emphasis asterisks.
fn strip_markdown(line: &str) -> String {
    static FOOTNOTE_REF: OnceLock<Regex> = OnceLock::new();
    static LINK: OnceLock<Regex> = OnceLock::new();
    let footnote_ref =
        FOOTNOTE_REF.get_or_init(|| Regex::new(r"\[(\d+)\]").expect("static pattern"));
    let link = LINK.get_or_init(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("static pattern"));

    let without_refs = footnote_ref.replace_all(line, "");
    let without_links = link.replace_all(&without_refs, "$1");
    let trimmed = without_links.trim_start();
    let trimmed = trimmed.strip_prefix("~ ").unwrap_or(trimmed);
    trimmed.replace('*', "").trim().to_string()
}
