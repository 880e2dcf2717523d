use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use palidict_index::GlossIndex;

fn main() -> Result<()> {
    let dict_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p palidict-index --example stats -- <dict.json>")?;

    let index = GlossIndex::load(&dict_path)
        .with_context(|| format!("loading dictionary from {}", dict_path.display()))?;

    println!("Dictionary: {}", dict_path.display());
    println!("Entries        : {}", index.entry_count());
    println!("Normalized keys: {}", index.key_count());

    // Spot-check a couple of common headwords to confirm lookup.
    for key in ["buddho", "dhamma", "sangho"] {
        match index.first(key) {
            Some(entry) => println!("Key '{}' -> {} ({})", key, entry.headword, entry.gloss),
            None => println!("Key '{}' -> (no entry)", key),
        }
    }

    Ok(())
}
