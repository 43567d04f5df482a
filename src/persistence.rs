// File: src/persistence.rs
use crate::core::engine::Artifacts;
use crate::core::synonyms::IndexOptions;
use crate::core::types::{Category, RawSubject, Subject};
use crate::error::Result;
use crate::report::forum_post;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub const SUBJECTS_JSON: &str = "subjects.json";
pub const SUBJECTS_SNAPSHOT: &str = "subjects.bin";
pub const SYNONYMS_JSON: &str = "synonyms.json";
pub const VOCAB_SYNONYMS_JSON: &str = "vocab_synonyms.json";
pub const VOCAB_SUBJECTS_JSON: &str = "vocab_subjects.json";
pub const TWINS_JSON: &str = "twins.json";
pub const FORUM_TEXT: &str = "synonyms.txt";
pub const MANIFEST_JSON: &str = "manifest.json";

/// Every file a build writes besides the manifest.
pub const ARTIFACT_FILES: [&str; 7] = [
    SUBJECTS_JSON,
    SUBJECTS_SNAPSHOT,
    SYNONYMS_JSON,
    VOCAB_SYNONYMS_JSON,
    VOCAB_SUBJECTS_JSON,
    TWINS_JSON,
    FORUM_TEXT,
];

/// Records which input produced the artifacts in an output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub source_digest: String,
    pub options: IndexOptions,
}

/// Writes `bytes` to `path` through a temp file in the same directory, so readers
/// never see a half-written artifact.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        writer.write_all(bytes)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    write_atomic(path, &bytes)
}

pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Reads a raw subject listing as written by the fetch command.
pub fn load_raw_subjects(path: &Path) -> Result<Vec<RawSubject>> {
    load_json(path)
}

/// Compact binary copy of the normalized subjects.
pub fn save_snapshot(subjects: &[Subject], path: &Path) -> Result<()> {
    let bytes = bincode::serialize(subjects)?;
    write_atomic(path, &bytes)
}

pub fn load_snapshot(path: &Path) -> Result<Vec<Subject>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

/// SHA-256 over the raw input and the options it will be indexed with.
pub fn source_digest(raw_input: &[u8], options: &IndexOptions) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(raw_input);
    hasher.update(serde_json::to_vec(options)?);
    Ok(hex::encode(hasher.finalize()))
}

/// True when the manifest in `dir` was produced from the same digest and
/// every artifact it vouches for is still there.
pub fn is_up_to_date(dir: &Path, digest: &str) -> bool {
    let digest_matches = load_json::<Manifest>(&dir.join(MANIFEST_JSON))
        .map(|manifest| manifest.source_digest == digest)
        .unwrap_or(false);
    digest_matches && ARTIFACT_FILES.iter().all(|name| dir.join(name).is_file())
}

/// Writes every artifact of a run into `dir`. The manifest goes last, so an
/// interrupted run is never mistaken for a complete one.
pub fn save_artifacts(dir: &Path, subjects: &[Subject], artifacts: &Artifacts, manifest: &Manifest) -> Result<Vec<PathBuf>> {
    let vocab_synonyms = artifacts
        .synonyms
        .get(Category::Vocabulary)
        .cloned()
        .unwrap_or_default();
    let twins: Vec<(Vec<&str>, &[String])> = artifacts
        .twins
        .iter()
        .map(|group| (group.signature.hints(), group.characters.as_slice()))
        .collect();

    let written: Vec<PathBuf> = ARTIFACT_FILES.iter().map(|name| dir.join(name)).collect();
    save_json(subjects, &written[0])?;
    save_snapshot(subjects, &written[1])?;
    save_json(&artifacts.synonyms, &written[2])?;
    save_json(&vocab_synonyms, &written[3])?;
    save_json(&artifacts.vocabulary, &written[4])?;
    save_json(&twins, &written[5])?;
    write_atomic(&written[6], forum_post(&artifacts.synonyms, subjects).as_bytes())?;
    save_json(manifest, &dir.join(MANIFEST_JSON))?;
    Ok(written)
}
