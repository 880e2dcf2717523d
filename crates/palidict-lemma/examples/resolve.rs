use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use palidict_index::GlossIndex;
use palidict_lemma::{candidates, resolve};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dict_path = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p palidict-lemma --example resolve -- <dict.json> <word>")?;
    let word = args
        .next()
        .context("usage: cargo run -p palidict-lemma --example resolve -- <dict.json> <word>")?;
    if args.next().is_some() {
        bail!("too many arguments");
    }

    let index = GlossIndex::load(&dict_path)
        .with_context(|| format!("loading dictionary from {}", dict_path.display()))?;

    println!("Query: {}", word);
    println!("Candidates:");
    for cand in candidates(&word) {
        println!("  {:<20} [{}]", cand.key, cand.tier);
    }

    match resolve(&word, |key| index.first(key)) {
        Some(hit) => println!(
            "Resolved via {}: {} -> {}",
            hit.tier, hit.value.headword, hit.value.gloss
        ),
        None => println!("No match after all tiers"),
    }

    Ok(())
}
