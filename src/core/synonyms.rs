// File: src/core/synonyms.rs
use crate::core::types::{Category, Subject, SubjectId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

/// How group members are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    #[default]
    Id,
    Characters,
}

/// One member of a synonym group. Within an index every member has the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Member {
    Id(SubjectId),
    Characters(String),
}

impl Member {
    pub fn of(subject: &Subject, kind: MemberKind) -> Self {
        match kind {
            MemberKind::Id => Member::Id(subject.id),
            MemberKind::Characters => Member::Characters(subject.characters.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexOptions {
    /// Group on `primary_meaning` alone instead of every accepted meaning.
    #[serde(default)]
    pub only_primary: bool,
    #[serde(default)]
    pub members: MemberKind,
}

/// Meaning text -> sorted, duplicate-free members (always two or more).
pub type MeaningGroups = BTreeMap<String, Vec<Member>>;

/// Members of one meaning plus the subjects they were rendered from.
#[derive(Default)]
struct Entry {
    members: BTreeSet<Member>,
    contributors: Vec<SubjectId>,
}

/// Inverted index for a single category.
/// Maps a meaning to every member that accepts it.
struct CategoryIndex {
    meanings: HashMap<String, Entry>,
    options: IndexOptions,
}

impl CategoryIndex {
    fn new(options: IndexOptions) -> Self {
        Self { meanings: HashMap::new(), options }
    }

    fn add_subject(&mut self, subject: &Subject) {
        let member = Member::of(subject, self.options.members);
        // A subject may list the same text twice; insert it once per meaning.
        let meanings: BTreeSet<&str> = subject.meanings(self.options.only_primary).into_iter().collect();
        for meaning in meanings {
            let entry = self.meanings.entry(meaning.to_string()).or_default();
            entry.members.insert(member.clone());
            entry.contributors.push(subject.id);
        }
    }

    /// Drops every meaning with fewer than two members and freezes the rest.
    /// Ids of subjects behind a surviving group are added to `participants`.
    fn into_groups(self, participants: &mut HashSet<SubjectId>) -> MeaningGroups {
        self.meanings
            .into_iter()
            .filter(|(_, entry)| entry.members.len() > 1)
            .map(|(meaning, entry)| {
                participants.extend(entry.contributors);
                (meaning, entry.members.into_iter().collect())
            })
            .collect()
    }
}

/// Category -> meaning -> members, restricted to meanings shared by several subjects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymIndex {
    categories: BTreeMap<Category, MeaningGroups>,
}

impl SynonymIndex {
    /// Builds the index from scratch. Every category gets an entry, possibly empty.
    pub fn build(subjects: &[Subject], options: IndexOptions) -> Self {
        Self::build_with_participants(subjects, options).0
    }

    /// Like `build`, also returning the ids of every subject that sits in at least one group.
    /// Membership is tracked by id whatever `options.members` says, so subjects
    /// sharing characters with a group member are not swept in.
    pub fn build_with_participants(subjects: &[Subject], options: IndexOptions) -> (Self, HashSet<SubjectId>) {
        let mut partitions: BTreeMap<Category, Vec<&Subject>> =
            Category::ALL.iter().map(|&c| (c, Vec::new())).collect();
        for subject in subjects {
            partitions.entry(subject.category).or_default().push(subject);
        }

        let mut participants = HashSet::new();
        let categories = partitions
            .into_iter()
            .map(|(category, subjects)| {
                let mut index = CategoryIndex::new(options);
                for subject in subjects {
                    index.add_subject(subject);
                }
                let groups = index.into_groups(&mut participants);
                debug!(%category, groups = groups.len(), "synonym groups built");
                (category, groups)
            })
            .collect();

        (Self { categories }, participants)
    }

    pub fn get(&self, category: Category) -> Option<&MeaningGroups> {
        self.categories.get(&category)
    }

    pub fn lookup(&self, category: Category, meaning: &str) -> Option<&[Member]> {
        self.get(category)?.get(meaning).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &MeaningGroups)> {
        self.categories.iter().map(|(&c, groups)| (c, groups))
    }

    /// Total number of groups over all categories.
    pub fn group_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// A copy holding only `category`.
    pub fn only(&self, category: Category) -> Self {
        let categories = self
            .categories
            .get(&category)
            .map(|groups| BTreeMap::from([(category, groups.clone())]))
            .unwrap_or_default();
        Self { categories }
    }

    /// Per category, the meaning with the most members.
    /// Ties go to the lexicographically first meaning.
    pub fn largest_groups(&self) -> BTreeMap<Category, (&str, usize)> {
        self.categories
            .iter()
            .filter_map(|(&category, groups)| {
                let mut best: Option<(&str, usize)> = None;
                for (meaning, members) in groups {
                    if best.map_or(true, |(_, size)| members.len() > size) {
                        best = Some((meaning.as_str(), members.len()));
                    }
                }
                best.map(|b| (category, b))
            })
            .collect()
    }
}
