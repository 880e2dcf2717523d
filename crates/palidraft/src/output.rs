//! File writers for drafting runs and bundle rendering.
//!
//! A thin I/O layer over the engine's [`DraftReport`] and the bundle
//! renderer: everything here is plain text formatting and `std::fs` calls,
//! with `anyhow` context naming the file that failed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::info;

use crate::bundle::{self, BundleDoc};
use crate::engine::DraftReport;

pub const DRAFT_FILE: &str = "english_draft.txt";
pub const GLOSS_CSV_FILE: &str = "pali_english_gloss.csv";
pub const BUNDLE_FILE: &str = "my_input.json";
pub const UNKNOWN_FILE: &str = "unknown_words.txt";
pub const AUTO_GLOSSARY_FILE: &str = "glossary_auto.json";

/// Read a text file into lines, line terminators stripped.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(raw.lines().map(str::to_string).collect())
}

/// Read a JSON object of string-to-string pairs.
pub fn read_string_map(path: &Path) -> Result<BTreeMap<String, String>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Write every artifact of a drafting run into `outdir`.
pub fn write_draft_artifacts(
    outdir: &Path,
    title: &str,
    source_lines: &[String],
    report: &DraftReport,
    csv_delim: char,
) -> Result<()> {
    fs::create_dir_all(outdir).with_context(|| format!("create {}", outdir.display()))?;

    write_file(
        &outdir.join(DRAFT_FILE),
        &format!("{}\n", report.lines.join("\n")),
    )?;

    let mut csv = String::new();
    push_csv_row(&mut csv, csv_delim, &["line_number", "pali", "english_draft"]);
    for (idx, (pali, english)) in source_lines.iter().zip(&report.lines).enumerate() {
        push_csv_row(&mut csv, csv_delim, &[&(idx + 1).to_string(), pali, english]);
    }
    write_file(&outdir.join(GLOSS_CSV_FILE), &csv)?;

    let seed = BundleDoc {
        title: title.to_string(),
        pali: source_lines.to_vec(),
        english: report.lines.clone(),
        footnotes: BTreeMap::new(),
        glossary: BTreeMap::new(),
    };
    write_bundle_doc(&outdir.join(BUNDLE_FILE), &seed)?;

    let unknown = if report.unknown.is_empty() {
        String::new()
    } else {
        format!("{}\n", report.unknown.join("\n"))
    };
    write_file(&outdir.join(UNKNOWN_FILE), &unknown)?;

    // Frequency-ordered auto-glossary; object order is the usage-table order.
    let mut auto = Map::new();
    for row in &report.usage {
        auto.insert(row.headword.clone(), Value::String(row.gloss.clone()));
    }
    let auto_json = serde_json::to_string_pretty(&Value::Object(auto))
        .context("serialize auto-glossary")?;
    write_file(&outdir.join(AUTO_GLOSSARY_FILE), &auto_json)?;

    info!("draft artifacts written to {}", outdir.display());
    Ok(())
}

/// Serialize a bundle document as pretty-printed JSON.
pub fn write_bundle_doc(path: &Path, doc: &BundleDoc) -> Result<()> {
    let json = serde_json::to_string_pretty(doc).context("serialize bundle document")?;
    write_file(path, &json)
}

/// Read bundle documents from a file, or from every `*.json` in a directory
/// (sorted by name).
pub fn read_bundle_docs(path: &Path) -> Result<Vec<BundleDoc>> {
    if path.is_file() {
        let doc = BundleDoc::read(path).with_context(|| format!("bundle {}", path.display()))?;
        return Ok(vec![doc]);
    }
    let mut json_paths: Vec<PathBuf> = fs::read_dir(path)
        .with_context(|| format!("read bundle directory {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    json_paths.sort();
    json_paths
        .into_iter()
        .map(|p| BundleDoc::read(&p).with_context(|| format!("bundle {}", p.display())))
        .collect()
}

/// Render one bundle document and write its Markdown, CSV, and footnote
/// artifacts into `outdir`.
pub fn write_bundle_artifacts(outdir: &Path, doc: &BundleDoc, csv_delim: char) -> Result<()> {
    fs::create_dir_all(outdir).with_context(|| format!("create {}", outdir.display()))?;
    let rendered = bundle::render(doc);

    write_file(&outdir.join(format!("{}.md", rendered.slug)), &rendered.markdown)?;

    let mut csv = String::new();
    push_csv_row(&mut csv, csv_delim, &["line_number", "pali", "english"]);
    let rows = doc.pali.len().max(rendered.csv_lines.len());
    for idx in 0..rows {
        let pali = doc.pali.get(idx).map(String::as_str).unwrap_or("");
        let english = rendered.csv_lines.get(idx).map(String::as_str).unwrap_or("");
        push_csv_row(&mut csv, csv_delim, &[&(idx + 1).to_string(), pali, english]);
    }
    write_file(&outdir.join(format!("{}.csv", rendered.slug)), &csv)?;

    if let Some(footnotes) = &rendered.footnotes_markdown {
        write_file(
            &outdir.join(format!("{}_footnotes.md", rendered.slug)),
            footnotes,
        )?;
    }

    info!(
        "bundle '{}' written to {}",
        rendered.slug,
        outdir.display()
    );
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

/// Append one CSV record with minimal quoting and CRLF termination.
fn push_csv_row(out: &mut String, delim: char, fields: &[&str]) {
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(delim);
        }
        push_csv_field(out, delim, field);
    }
    out.push_str("\r\n");
}

fn push_csv_field(out: &mut String, delim: char, field: &str) {
    let needs_quotes = field.contains(delim)
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');
    if !needs_quotes {
        out.push_str(field);
        return;
    }
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}
