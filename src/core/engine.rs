use crate::core::normalizer::{normalize_all, MalformedPolicy};
use crate::core::synonyms::{IndexOptions, SynonymIndex};
use crate::core::twins::{find_twins, TwinGroup};
use crate::core::types::{Category, RawSubject, Subject, SubjectId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// What the hint tool needs to know about one vocabulary subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub characters: String,
    pub readings: Vec<String>,
    pub primary_meaning: String,
    pub other_meanings: Vec<String>,
}

/// Everything derived from one snapshot of subjects.
#[derive(Debug, Clone, Serialize)]
pub struct Artifacts {
    pub synonyms: SynonymIndex,
    pub twins: Vec<TwinGroup>,
    pub vocabulary: BTreeMap<SubjectId, VocabularyEntry>,
}

/// Holds the normalized subjects of one run and derives the indices from them.
/// Nothing is cached: every call recomputes from the subject list.
pub struct SynonymEngine {
    subjects: Vec<Subject>,
    options: IndexOptions,
    /// Records left out under `MalformedPolicy::Skip`.
    rejected: Vec<Error>,
}

impl SynonymEngine {
    pub fn new(subjects: Vec<Subject>, options: IndexOptions) -> Self {
        Self { subjects, options, rejected: Vec::new() }
    }

    /// Normalizes a raw listing and wraps the result.
    pub fn from_raw(raws: &[RawSubject], options: IndexOptions, policy: MalformedPolicy) -> Result<Self> {
        let normalized = normalize_all(raws, policy)?;
        info!(
            subjects = normalized.subjects.len(),
            hidden = normalized.hidden,
            rejected = normalized.rejected.len(),
            "subjects normalized"
        );
        Ok(Self { subjects: normalized.subjects, options, rejected: normalized.rejected })
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn options(&self) -> IndexOptions {
        self.options
    }

    /// Normalization failures that were skipped rather than propagated.
    pub fn rejected(&self) -> &[Error] {
        &self.rejected
    }

    /// Ids of the skipped records.
    pub fn rejected_ids(&self) -> Vec<SubjectId> {
        self.rejected
            .iter()
            .filter_map(|e| match e {
                Error::MissingPrimaryMeaning { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn synonyms(&self) -> SynonymIndex {
        SynonymIndex::build(&self.subjects, self.options)
    }

    pub fn twins(&self) -> Vec<TwinGroup> {
        find_twins(&self.subjects)
    }

    /// Vocabulary subjects that take part in at least one synonym group, keyed by id.
    /// `participants` comes from `SynonymIndex::build_with_participants`.
    pub fn vocabulary_projection(&self, participants: &HashSet<SubjectId>) -> BTreeMap<SubjectId, VocabularyEntry> {
        self.subjects
            .iter()
            .filter(|s| s.category == Category::Vocabulary && participants.contains(&s.id))
            .map(|s| {
                let entry = VocabularyEntry {
                    characters: s.characters.clone(),
                    readings: s.readings.clone().unwrap_or_default(),
                    primary_meaning: s.primary_meaning.clone(),
                    other_meanings: s.other_meanings.clone(),
                };
                (s.id, entry)
            })
            .collect()
    }

    pub fn build(&self) -> Artifacts {
        let (synonyms, participants) = SynonymIndex::build_with_participants(&self.subjects, self.options);
        let twins = self.twins();
        let vocabulary = self.vocabulary_projection(&participants);
        info!(
            groups = synonyms.group_count(),
            twins = twins.len(),
            vocabulary = vocabulary.len(),
            "indices built"
        );
        Artifacts { synonyms, twins, vocabulary }
    }
}
