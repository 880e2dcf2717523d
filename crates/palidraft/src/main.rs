use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use palidict_index::GlossIndex;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use palidraft::bundle::BundleDoc;
use palidraft::engine::{self, DraftOptions};
use palidraft::output;

#[derive(Parser)]
#[command(
    name = "palidraft",
    version,
    about = "Offline dictionary-based Pali-to-English draft translator"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draft-translate a Pali text against an offline dictionary.
    Translate(TranslateArgs),
    /// Render translation bundles to Markdown and CSV.
    Bundle(BundleArgs),
    /// Merge Pali and English line files into a bundle document.
    Pair(PairArgs),
}

#[derive(Args)]
struct TranslateArgs {
    /// Pali source text, one segment per line.
    #[arg(long)]
    pali: PathBuf,
    /// Dictionary: a JSON object mapping headwords to glosses.
    #[arg(long)]
    dict: PathBuf,
    /// Title recorded in the bundle seed.
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "outputs_draft")]
    outdir: PathBuf,
    /// Keep unknown tokens visible in the draft as <word>.
    #[arg(long)]
    keep_unknown: bool,
    /// Lowercase glosses before line-start capitalization.
    #[arg(long)]
    lower: bool,
    #[arg(long, default_value_t = ',')]
    csv_delim: char,
    /// Draft lines across threads; the report is identical either way.
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct BundleArgs {
    /// One bundle JSON file, or a directory of them.
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "outputs")]
    outdir: PathBuf,
    #[arg(long, default_value_t = ',')]
    csv_delim: char,
}

#[derive(Args)]
struct PairArgs {
    /// Pali source text, one segment per line.
    #[arg(long)]
    pali: PathBuf,
    /// English text, one segment per line; may carry {{fn:ID}} markers.
    #[arg(long)]
    english: PathBuf,
    #[arg(long)]
    title: String,
    /// Output bundle document path.
    #[arg(long)]
    out: PathBuf,
    /// Footnote id-to-note JSON to merge into the document.
    #[arg(long)]
    footnotes: Option<PathBuf>,
    /// Glossary term-to-definition JSON to merge into the document.
    #[arg(long)]
    glossary: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Translate(args) => translate(args),
        Command::Bundle(args) => bundle(args),
        Command::Pair(args) => pair(args),
    }
}

fn translate(args: TranslateArgs) -> Result<()> {
    let start = Instant::now();
    let index = GlossIndex::load(&args.dict)?;
    info!(
        "indexed {} dictionary entries ({} keys) in {} ms",
        index.entry_count(),
        index.key_count(),
        start.elapsed().as_millis()
    );

    let source = output::read_lines(&args.pali)
        .with_context(|| format!("read source text {}", args.pali.display()))?;
    let opts = DraftOptions {
        keep_unknown: args.keep_unknown,
        lower_gloss: args.lower,
        ..DraftOptions::default()
    };

    let start = Instant::now();
    let report = if args.parallel {
        engine::draft_lines_parallel(&source, &index, &opts)
    } else {
        engine::draft_lines(&source, &index, &opts)
    };
    info!(
        "drafted {} lines in {} ms ({} headwords glossed, {} unknown words)",
        report.lines.len(),
        start.elapsed().as_millis(),
        report.usage.len(),
        report.unknown.len()
    );

    output::write_draft_artifacts(&args.outdir, &args.title, &source, &report, args.csv_delim)
}

fn bundle(args: BundleArgs) -> Result<()> {
    let docs = output::read_bundle_docs(&args.input)?;
    if docs.is_empty() {
        warn!("no bundle documents found in {}", args.input.display());
    }
    for doc in &docs {
        output::write_bundle_artifacts(&args.outdir, doc, args.csv_delim)?;
    }
    Ok(())
}

fn pair(args: PairArgs) -> Result<()> {
    let pali = output::read_lines(&args.pali)?;
    let english = output::read_lines(&args.english)?;
    if english.len() < pali.len() {
        warn!(
            "english lines ({}) < pali lines ({}); missing lines will render empty",
            english.len(),
            pali.len()
        );
    }

    let footnotes = match &args.footnotes {
        Some(path) => output::read_string_map(path)?,
        None => BTreeMap::new(),
    };
    let glossary = match &args.glossary {
        Some(path) => output::read_string_map(path)?,
        None => BTreeMap::new(),
    };

    let doc = BundleDoc {
        title: args.title,
        pali,
        english,
        footnotes,
        glossary,
    };
    output::write_bundle_doc(&args.out, &doc)?;
    info!("bundle document written to {}", args.out.display());
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
