// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the source API. Stable across runs.
pub type SubjectId = u32;

/// The subject kinds that take part in indexing.
/// Radicals (and anything else the API lists) never get this far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Kanji,
    Vocabulary,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Kanji, Category::Vocabulary];

    /// Maps the API's `object` field onto a category, `None` for excluded kinds.
    pub fn from_object(object: &str) -> Option<Self> {
        match object {
            "kanji" => Some(Category::Kanji),
            "vocabulary" => Some(Category::Vocabulary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Kanji => "kanji",
            Category::Vocabulary => "vocabulary",
        }
    }

    /// Title-cased label used in the forum report.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Kanji => "Kanji",
            Category::Vocabulary => "Vocabulary",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized subject: one kanji or vocabulary item with its accepted meanings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub category: Category,
    pub characters: String,
    pub primary_meaning: String,
    /// Never contains `primary_meaning`. Source order.
    pub other_meanings: Vec<String>,
    /// Whitelisted auxiliary meanings only.
    pub auxiliary_meanings: Vec<String>,
    /// Vocabulary only.
    pub parts_of_speech: Option<Vec<String>>,
    /// Accepted readings, vocabulary only.
    pub readings: Option<Vec<String>>,
    pub document_url: String,
}

impl Subject {
    /// Meanings contributing to synonym grouping, in presentation order.
    /// May contain the same text twice (e.g. an other meaning that is also whitelisted).
    pub fn meanings(&self, only_primary: bool) -> Vec<&str> {
        let mut meanings = vec![self.primary_meaning.as_str()];
        if !only_primary {
            meanings.extend(self.other_meanings.iter().map(String::as_str));
            meanings.extend(self.auxiliary_meanings.iter().map(String::as_str));
        }
        meanings
    }
}

// --- Raw records, as listed by the subjects endpoint ---

/// One entry of the paginated subject listing.
/// Only the fields the normalizer needs are modelled; everything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSubject {
    pub id: SubjectId,
    pub object: String,
    pub data: RawSubjectData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSubjectData {
    #[serde(default)]
    pub hidden_at: Option<String>,
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub document_url: String,
    #[serde(default)]
    pub meanings: Vec<RawMeaning>,
    #[serde(default)]
    pub auxiliary_meanings: Vec<RawAuxiliaryMeaning>,
    #[serde(default)]
    pub parts_of_speech: Option<Vec<String>>,
    #[serde(default)]
    pub readings: Option<Vec<RawReading>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMeaning {
    pub meaning: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAuxiliaryMeaning {
    pub meaning: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReading {
    pub reading: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default = "accepted_by_default")]
    pub accepted_answer: bool,
}

fn accepted_by_default() -> bool {
    true
}
