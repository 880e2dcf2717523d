//! Lossless line tokenization.
//!
//! A line splits into maximal whitespace and non-whitespace runs; each
//! non-whitespace run further splits into leading edge punctuation, a core,
//! and trailing edge punctuation. Concatenating the pieces of every token in
//! order reproduces the line byte for byte; the drafting pass relies on that
//! to reattach punctuation around substituted glosses.

/// Edge punctuation stripped from word boundaries by default.
pub const EDGE_PUNCT: &str = ".,;:!?—–-()[]{}\"'“”‘’…·|/\\«»‹›";

/// One maximal run of a line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token<'a> {
    /// A whitespace run, passed through untouched.
    Whitespace(&'a str),
    /// A non-whitespace run, split around its core.
    Word(WordToken<'a>),
}

/// A non-whitespace run. `prefix` and `suffix` hold stripped edge
/// punctuation; `core` is the remaining inner text. A run of nothing but
/// edge punctuation keeps the whole run in `prefix` with an empty core.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordToken<'a> {
    pub prefix: &'a str,
    pub core: &'a str,
    pub suffix: &'a str,
}

impl Token<'_> {
    /// The exact source text this token covers.
    pub fn source(&self) -> String {
        match self {
            Token::Whitespace(run) => (*run).to_string(),
            Token::Word(word) => format!("{}{}{}", word.prefix, word.core, word.suffix),
        }
    }
}

/// Split a line into tokens covering every character, no loss, no overlap.
pub fn tokenize<'a>(line: &'a str, edge_punct: &str) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut rest = line;
    while let Some(first) = rest.chars().next() {
        let in_whitespace = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != in_whitespace)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        if in_whitespace {
            tokens.push(Token::Whitespace(run));
        } else {
            tokens.push(Token::Word(split_edges(run, edge_punct)));
        }
        rest = tail;
    }
    tokens
}

fn split_edges<'a>(run: &'a str, edge_punct: &str) -> WordToken<'a> {
    let is_edge = |c: char| edge_punct.contains(c);
    let after_prefix = run.trim_start_matches(is_edge);
    let prefix = &run[..run.len() - after_prefix.len()];
    let core = after_prefix.trim_end_matches(is_edge);
    let suffix = &after_prefix[core.len()..];
    WordToken {
        prefix,
        core,
        suffix,
    }
}
