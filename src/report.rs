// File: src/report.rs
//! Forum-post rendering of a synonym index.

use crate::core::synonyms::{Member, SynonymIndex};
use crate::core::types::{Subject, SubjectId};
use std::collections::HashMap;
use std::fmt::Write;

/// Renders one collapsible `[details]` block per category with a bullet per meaning.
/// Id members are shown by their characters; unknown ids fall back to the number.
pub fn forum_post(index: &SynonymIndex, subjects: &[Subject]) -> String {
    let characters: HashMap<SubjectId, &str> =
        subjects.iter().map(|s| (s.id, s.characters.as_str())).collect();

    let mut out = String::new();
    for (category, groups) in index.iter() {
        let _ = writeln!(out, "[details='{}']", category.title());
        for (meaning, members) in groups {
            let rendered: Vec<String> = members
                .iter()
                .map(|member| match member {
                    Member::Id(id) => characters
                        .get(id)
                        .map_or_else(|| id.to_string(), |c| c.to_string()),
                    Member::Characters(c) => c.clone(),
                })
                .collect();
            let _ = writeln!(out, "* {}: {}", meaning, rendered.join(", "));
        }
        out.push_str("[/details]\n");
    }
    out
}

/// One line per category naming its largest group.
pub fn largest_groups_summary(index: &SynonymIndex) -> String {
    let largest = index.largest_groups();
    let mut out = String::new();
    for (category, _) in index.iter() {
        match largest.get(&category) {
            Some((meaning, size)) => {
                let _ = writeln!(out, "{category}: {meaning} ({size} subjects)");
            }
            None => {
                let _ = writeln!(out, "{category}: no synonyms");
            }
        }
    }
    out
}
