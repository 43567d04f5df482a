// File: src/core/normalizer.rs
use crate::core::types::{Category, RawSubject, Subject, SubjectId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Auxiliary meanings of this type are accepted answers; every other type is dropped.
const WHITELIST: &str = "whitelist";

/// What to do with a record that fails normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Stop at the first bad record.
    #[default]
    Abort,
    /// Log and exclude bad records, keep going.
    Skip,
}

/// Result of normalizing a whole listing.
#[derive(Debug, Default)]
pub struct Normalized {
    pub subjects: Vec<Subject>,
    /// Records excluded under `MalformedPolicy::Skip`.
    pub rejected: Vec<Error>,
    pub hidden: usize,
    pub excluded: usize,
}

/// Converts one raw record into a `Subject`.
/// Returns `Ok(None)` for hidden subjects and for kinds outside `Category`.
pub fn normalize(raw: &RawSubject) -> Result<Option<Subject>> {
    let Some(category) = Category::from_object(&raw.object) else {
        return Ok(None);
    };
    let data = &raw.data;
    if data.hidden_at.is_some() {
        return Ok(None);
    }

    let primary_pos = data
        .meanings
        .iter()
        .position(|m| m.primary)
        .ok_or(Error::MissingPrimaryMeaning { id: raw.id })?;
    let primary_meaning = data.meanings[primary_pos].meaning.clone();

    // Later primary-flagged entries are demoted along with the rest.
    let other_meanings = dedup_in_order(
        data.meanings
            .iter()
            .enumerate()
            .filter(|&(i, m)| i != primary_pos && m.meaning != primary_meaning)
            .map(|(_, m)| m.meaning.as_str()),
    );

    let auxiliary_meanings = dedup_in_order(
        data.auxiliary_meanings
            .iter()
            .filter(|aux| aux.kind == WHITELIST)
            .map(|aux| aux.meaning.as_str()),
    );

    let (parts_of_speech, readings) = match category {
        Category::Vocabulary => (
            Some(data.parts_of_speech.clone().unwrap_or_default()),
            Some(
                data.readings
                    .iter()
                    .flatten()
                    .filter(|r| r.accepted_answer)
                    .map(|r| r.reading.clone())
                    .collect(),
            ),
        ),
        Category::Kanji => (None, None),
    };

    Ok(Some(Subject {
        id: raw.id,
        category,
        characters: data.characters.clone().unwrap_or_else(|| data.slug.clone()),
        primary_meaning,
        other_meanings,
        auxiliary_meanings,
        parts_of_speech,
        readings,
        document_url: data.document_url.clone(),
    }))
}

/// Normalizes a full listing, preserving input order.
pub fn normalize_all(raws: &[RawSubject], policy: MalformedPolicy) -> Result<Normalized> {
    let mut out = Normalized::default();
    let mut seen: HashSet<SubjectId> = HashSet::with_capacity(raws.len());

    for raw in raws {
        if !seen.insert(raw.id) {
            return Err(Error::DuplicateSubject { id: raw.id });
        }
        match normalize(raw) {
            Ok(Some(subject)) => out.subjects.push(subject),
            Ok(None) if raw.data.hidden_at.is_some() => out.hidden += 1,
            Ok(None) => out.excluded += 1,
            Err(e) if policy == MalformedPolicy::Skip && e.is_malformed_subject() => {
                warn!(id = raw.id, error = %e, "skipping malformed subject");
                out.rejected.push(e);
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        normalized = out.subjects.len(),
        hidden = out.hidden,
        excluded = out.excluded,
        rejected = out.rejected.len(),
        "normalization finished"
    );
    Ok(out)
}

fn dedup_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}
