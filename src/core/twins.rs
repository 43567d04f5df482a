// File: src/core/twins.rs
use crate::core::types::{Category, Subject};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything a meaning-only hint shows for a vocabulary subject.
/// Order-sensitive: the same meanings in a different order are a different signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TwinSignature {
    pub primary_meaning: String,
    pub other_meanings: Vec<String>,
    pub parts_of_speech: Vec<String>,
}

impl TwinSignature {
    pub fn of(subject: &Subject) -> Self {
        Self {
            primary_meaning: subject.primary_meaning.clone(),
            other_meanings: subject.other_meanings.clone(),
            parts_of_speech: subject.parts_of_speech.clone().unwrap_or_default(),
        }
    }

    /// The signature as one flat sequence: primary, other meanings, parts of speech.
    pub fn hints(&self) -> Vec<&str> {
        std::iter::once(self.primary_meaning.as_str())
            .chain(self.other_meanings.iter().map(String::as_str))
            .chain(self.parts_of_speech.iter().map(String::as_str))
            .collect()
    }
}

/// Vocabulary subjects that cannot be told apart by their hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwinGroup {
    pub signature: TwinSignature,
    /// Member characters in input order.
    pub characters: Vec<String>,
}

/// Groups vocabulary subjects by exact signature and keeps groups of two or more.
/// Groups come out in the order their signature first appeared.
pub fn find_twins(subjects: &[Subject]) -> Vec<TwinGroup> {
    let mut slots: HashMap<TwinSignature, usize> = HashMap::new();
    let mut groups: Vec<TwinGroup> = Vec::new();

    for subject in subjects.iter().filter(|s| s.category == Category::Vocabulary) {
        let signature = TwinSignature::of(subject);
        match slots.get(&signature) {
            Some(&slot) => groups[slot].characters.push(subject.characters.clone()),
            None => {
                slots.insert(signature.clone(), groups.len());
                groups.push(TwinGroup { signature, characters: vec![subject.characters.clone()] });
            }
        }
    }

    groups.retain(|group| group.characters.len() > 1);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SubjectId;

    fn vocab(id: SubjectId, chars: &str, primary: &str, other: &[&str], pos: &[&str]) -> Subject {
        Subject {
            id,
            category: Category::Vocabulary,
            characters: chars.to_string(),
            primary_meaning: primary.to_string(),
            other_meanings: other.iter().map(|s| s.to_string()).collect(),
            auxiliary_meanings: Vec::new(),
            parts_of_speech: Some(pos.iter().map(|s| s.to_string()).collect()),
            readings: Some(Vec::new()),
            document_url: String::new(),
        }
    }

    #[test]
    fn test_identical_signatures_are_twins() {
        let subjects = vec![
            vocab(1, "火", "fire", &[], &["noun"]),
            vocab(2, "炎", "fire", &[], &["noun"]),
        ];
        let twins = find_twins(&subjects);
        assert_eq!(twins.len(), 1);
        assert_eq!(twins[0].signature.hints(), vec!["fire", "noun"]);
        assert_eq!(twins[0].characters, vec!["火", "炎"]);
    }

    #[test]
    fn test_order_matters() {
        let subjects = vec![
            vocab(1, "a", "x", &["y", "z"], &["noun"]),
            vocab(2, "b", "x", &["z", "y"], &["noun"]),
        ];
        assert!(find_twins(&subjects).is_empty());
    }

    #[test]
    fn test_parts_of_speech_distinguish() {
        let subjects = vec![
            vocab(1, "a", "light", &[], &["noun"]),
            vocab(2, "b", "light", &[], &["adjective"]),
        ];
        assert!(find_twins(&subjects).is_empty());
    }

    #[test]
    fn test_primary_only_signatures() {
        let subjects = vec![
            vocab(1, "一つ", "one thing", &[], &[]),
            vocab(2, "一個", "one thing", &[], &[]),
            vocab(3, "一本", "one thing", &[], &[]),
        ];
        let twins = find_twins(&subjects);
        assert_eq!(twins[0].characters, vec!["一つ", "一個", "一本"]);
    }

    #[test]
    fn test_kanji_are_ignored_and_groups_keep_first_seen_order() {
        let mut kanji = vocab(1, "火", "fire", &[], &[]);
        kanji.category = Category::Kanji;
        kanji.parts_of_speech = None;
        let subjects = vec![
            kanji,
            vocab(2, "b1", "b", &[], &[]),
            vocab(3, "a1", "a", &[], &[]),
            vocab(4, "火", "fire", &[], &[]),
            vocab(5, "a2", "a", &[], &[]),
            vocab(6, "b2", "b", &[], &[]),
        ];
        let twins = find_twins(&subjects);
        let primaries: Vec<&str> = twins.iter().map(|t| t.signature.primary_meaning.as_str()).collect();
        assert_eq!(primaries, vec!["b", "a"]);
    }
}
