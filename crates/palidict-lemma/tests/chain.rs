//! Fallback-chain behavior against a real index.

use palidict_index::GlossIndex;
use palidict_lemma::resolve;
use palidict_types::MatchTier;

fn index() -> GlossIndex {
    GlossIndex::build(
        [
            ("buddho", "the awakened one"),
            ("dhammaṃ", "the teaching"),
            ("dhammā", "teachings"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string())),
    )
}

#[test]
fn accented_dictionary_answers_unaccented_query() {
    // Key "dhammā" resolves query "dhamma" through the mark-stripped bucket.
    let index = index();
    let hit = resolve("dhamma", |key| index.first(key)).expect("bare query resolves");
    assert_eq!(hit.value.headword, "dhammā");
    assert_eq!(hit.tier, MatchTier::Exact);
}

#[test]
fn inflected_query_resolves_through_its_stem() {
    let index = index();
    let hit = resolve("dhammaṃ", |key| index.first(key)).expect("exact form resolves");
    assert_eq!(hit.tier, MatchTier::Exact);

    let hit = resolve("dhammassa", |key| index.first(key)).expect("genitive resolves");
    assert_eq!(hit.value.headword, "dhammā");
    assert_eq!(hit.tier, MatchTier::Stemmed { suffix: "ssa" });
}

#[test]
fn unaccented_inflected_query_uses_the_last_tier() {
    let index = GlossIndex::build([("dhamma".to_string(), "nature".to_string())]);
    let hit = resolve("dhammāya", |key| index.first(key)).expect("resolves");
    assert_eq!(hit.tier, MatchTier::UnmarkedStemmed { suffix: "ya" });
    assert_eq!(hit.value.gloss, "nature");
}

#[test]
fn surface_case_never_matters() {
    let index = index();
    let lower = resolve("buddho", |key| index.first(key)).expect("resolves");
    let upper = resolve("BUDDHO", |key| index.first(key)).expect("resolves");
    assert_eq!(lower.value.headword, upper.value.headword);
    assert_eq!(lower.tier, upper.tier);
}
