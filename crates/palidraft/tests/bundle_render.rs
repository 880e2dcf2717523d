//! Bundle rendering end to end, including the on-disk artifacts.

use std::collections::BTreeMap;
use std::fs;

use palidraft::bundle::BundleDoc;
use palidraft::output;

fn sample_doc() -> BundleDoc {
    BundleDoc {
        title: "Dhamma Talk".to_string(),
        pali: vec![
            "Buddho dhammaṃ deseti.".to_string(),
            "Evaṃ me sutaṃ.".to_string(),
            "Tatiyaṃ.".to_string(),
        ],
        english: vec![
            "The Buddha teaches the dhamma{{fn:teach}}.".to_string(),
            "~ Thus have I heard.".to_string(),
            String::new(),
        ],
        footnotes: BTreeMap::from([(
            "teach".to_string(),
            "Literally, points out.".to_string(),
        )]),
        glossary: BTreeMap::from([("dhamma".to_string(), "the teaching".to_string())]),
    }
}

#[test]
fn writes_markdown_csv_and_footnote_files() {
    let tempdir = tempfile::tempdir().unwrap();
    let outdir = tempdir.path().join("outputs");
    output::write_bundle_artifacts(&outdir, &sample_doc(), ',').expect("write bundle");

    let md = fs::read_to_string(outdir.join("dhamma-talk.md")).unwrap();
    assert!(md.starts_with("# Dhamma Talk\n"));
    assert!(md.contains("[dhamma](#glossary-dhamma)[1]."));
    assert!(md.contains("*Thus have I heard.*"));
    assert!(md.contains("## Footnotes"));
    assert!(md.contains("[1] Literally, points out."));
    assert!(md.contains("<a id=\"glossary-dhamma\"></a>"));

    let csv = fs::read_to_string(outdir.join("dhamma-talk.csv")).unwrap();
    let mut rows = csv.lines();
    assert_eq!(rows.next(), Some("line_number,pali,english"));
    assert_eq!(
        rows.next(),
        Some("1,Buddho dhammaṃ deseti.,The Buddha teaches the dhamma.")
    );
    assert_eq!(rows.next(), Some("2,Evaṃ me sutaṃ.,Thus have I heard."));
    // English side ran short of markdown-worthy text; the pali column stays.
    assert_eq!(rows.next(), Some("3,Tatiyaṃ.,"));

    let footnotes = fs::read_to_string(outdir.join("dhamma-talk_footnotes.md")).unwrap();
    assert!(footnotes.starts_with("# Footnotes for “Dhamma Talk”\n"));
    assert!(footnotes.contains("[1] Literally, points out."));
}

#[test]
fn documents_without_footnotes_write_no_listing() {
    let tempdir = tempfile::tempdir().unwrap();
    let outdir = tempdir.path().join("outputs");
    let doc = BundleDoc {
        title: "Plain".to_string(),
        english: vec!["No markers here.".to_string()],
        ..BundleDoc::default()
    };
    output::write_bundle_artifacts(&outdir, &doc, ',').expect("write bundle");
    assert!(outdir.join("plain.md").exists());
    assert!(!outdir.join("plain_footnotes.md").exists());
}

#[test]
fn reads_a_directory_of_bundles_in_name_order() {
    let tempdir = tempfile::tempdir().unwrap();
    let dir = tempdir.path();
    for (name, title) in [("b.json", "Second"), ("a.json", "First")] {
        let doc = BundleDoc {
            title: title.to_string(),
            ..BundleDoc::default()
        };
        output::write_bundle_doc(&dir.join(name), &doc).unwrap();
    }
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let docs = output::read_bundle_docs(dir).expect("read directory");
    let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[test]
fn single_file_input_reads_one_document() {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("doc.json");
    output::write_bundle_doc(&path, &sample_doc()).unwrap();
    let docs = output::read_bundle_docs(&path).expect("read single file");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].title, "Dhamma Talk");
}
