use serde_json::{json, Value};
use std::collections::BTreeMap;
use synonym_core::core::normalizer::MalformedPolicy;
use synonym_core::core::synonyms::{IndexOptions, SynonymIndex};
use synonym_core::core::types::{RawSubject, Subject};
use synonym_core::persistence::{self, Manifest};
use synonym_core::{Error, SynonymEngine};
use tempfile::tempdir;

fn record(id: u32, object: &str, chars: &str, meanings: &[(&str, bool)], pos: &[&str]) -> Value {
    let meanings: Vec<Value> = meanings
        .iter()
        .map(|(m, primary)| json!({"meaning": m, "primary": primary, "accepted_answer": true}))
        .collect();
    json!({
        "id": id,
        "object": object,
        "url": format!("https://api.wanikani.com/v2/subjects/{id}"),
        "data": {
            "hidden_at": null,
            "characters": chars,
            "slug": chars,
            "document_url": format!("https://www.wanikani.com/{object}/{chars}"),
            "meanings": meanings,
            "auxiliary_meanings": [],
            "parts_of_speech": pos,
            "readings": [{"reading": "よみ", "primary": true, "accepted_answer": true}]
        }
    })
}

fn listing() -> Vec<Value> {
    let mut hidden = record(7, "vocabulary", "隠", &[("to see", true)], &["verb"]);
    hidden["data"]["hidden_at"] = json!("2019-01-01T00:00:00.000000Z");
    let mut whitelisted = record(8, "vocabulary", "観る", &[("to watch", true)], &["verb"]);
    whitelisted["data"]["auxiliary_meanings"] = json!([
        {"type": "whitelist", "meaning": "to see"},
        {"type": "blacklist", "meaning": "to meet"}
    ]);
    vec![
        record(1, "radical", "一", &[("ground", true)], &[]),
        record(2, "kanji", "見", &[("see", true)], &[]),
        record(3, "vocabulary", "会う", &[("to meet", true), ("to see", false)], &["verb"]),
        record(4, "vocabulary", "見る", &[("to see", true)], &["verb"]),
        record(5, "vocabulary", "火", &[("fire", true)], &["noun"]),
        record(6, "vocabulary", "炎", &[("fire", true)], &["noun"]),
        hidden,
        whitelisted,
    ]
}

fn raw_subjects() -> Vec<RawSubject> {
    serde_json::from_value(Value::Array(listing())).unwrap()
}

#[test]
fn builds_synonyms_twins_and_projection() {
    let engine = SynonymEngine::from_raw(&raw_subjects(), IndexOptions::default(), MalformedPolicy::Abort).unwrap();
    let artifacts = engine.build();

    let synonyms = serde_json::to_value(&artifacts.synonyms).unwrap();
    assert_eq!(
        synonyms,
        json!({
            "kanji": {},
            "vocabulary": {"fire": [5, 6], "to see": [3, 4, 8]}
        })
    );

    assert_eq!(artifacts.twins.len(), 1);
    assert_eq!(artifacts.twins[0].characters, vec!["火", "炎"]);

    let ids: Vec<u32> = artifacts.vocabulary.keys().copied().collect();
    assert_eq!(ids, vec![3, 4, 5, 6, 8]);
    assert_eq!(artifacts.vocabulary[&3].readings, vec!["よみ"]);
}

#[test]
fn writes_artifacts_and_skips_unchanged_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("full_subjects.json");
    let out = dir.path().join("data");
    persistence::save_json(&listing(), &input).unwrap();

    let bytes = std::fs::read(&input).unwrap();
    let options = IndexOptions::default();
    let digest = persistence::source_digest(&bytes, &options).unwrap();
    assert!(!persistence::is_up_to_date(&out, &digest));

    let raws = persistence::load_raw_subjects(&input).unwrap();
    let engine = SynonymEngine::from_raw(&raws, options, MalformedPolicy::Abort).unwrap();
    let artifacts = engine.build();
    let manifest = Manifest { source_digest: digest.clone(), options };
    let written = persistence::save_artifacts(&out, engine.subjects(), &artifacts, &manifest).unwrap();
    assert!(written.iter().all(|p| p.exists()));
    assert!(persistence::is_up_to_date(&out, &digest));

    let reloaded: SynonymIndex = persistence::load_json(&out.join(persistence::SYNONYMS_JSON)).unwrap();
    assert_eq!(reloaded, artifacts.synonyms);

    let vocab: BTreeMap<String, Vec<u32>> =
        persistence::load_json(&out.join(persistence::VOCAB_SYNONYMS_JSON)).unwrap();
    assert_eq!(vocab["to see"], vec![3, 4, 8]);

    let twins: Vec<(Vec<String>, Vec<String>)> =
        persistence::load_json(&out.join(persistence::TWINS_JSON)).unwrap();
    assert_eq!(twins, vec![(vec!["fire".to_string(), "noun".to_string()], vec!["火".to_string(), "炎".to_string()])]);

    let snapshot = persistence::load_snapshot(&out.join(persistence::SUBJECTS_SNAPSHOT)).unwrap();
    let json_subjects: Vec<Subject> = persistence::load_json(&out.join(persistence::SUBJECTS_JSON)).unwrap();
    assert_eq!(snapshot, json_subjects);
    assert!(snapshot.iter().all(|s| s.id != 7 && s.id != 1));

    let post = std::fs::read_to_string(out.join(persistence::FORUM_TEXT)).unwrap();
    assert!(post.contains("* to see: 会う, 見る, 観る\n"));
}

#[test]
fn missing_primary_meaning_propagates_or_skips() {
    let mut listing = listing();
    listing.push(record(9, "vocabulary", "壊", &[("broken", false)], &["noun"]));
    let raws: Vec<RawSubject> = serde_json::from_value(Value::Array(listing)).unwrap();

    let err = SynonymEngine::from_raw(&raws, IndexOptions::default(), MalformedPolicy::Abort)
        .err()
        .unwrap();
    assert!(matches!(err, Error::MissingPrimaryMeaning { id: 9 }));

    let engine = SynonymEngine::from_raw(&raws, IndexOptions::default(), MalformedPolicy::Skip).unwrap();
    assert!(engine.subject(9).is_none());
    let clean = SynonymEngine::from_raw(&raw_subjects(), IndexOptions::default(), MalformedPolicy::Abort).unwrap();
    assert_eq!(engine.synonyms(), clean.synonyms());
}
