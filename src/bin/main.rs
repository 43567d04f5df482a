use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use std::path::{Path, PathBuf};
use synonym_core::config::{BuildConfig, Config, DEFAULT_CONFIG_PATH};
use synonym_core::core::normalizer::MalformedPolicy;
use synonym_core::core::synonyms::MemberKind;
use synonym_core::core::types::RawSubject;
use synonym_core::fetch::SubjectFetcher;
use synonym_core::logging::init_logging;
use synonym_core::persistence::{self, Manifest};
use synonym_core::report::{forum_post, largest_groups_summary};
use synonym_core::SynonymEngine;
use tracing::{info, warn};

const RAW_SUBJECTS_PATH: &str = "full_subjects.json";

/// Builds synonym and twin indices from a WaniKani subject listing.
#[derive(Parser, Debug)]
#[command(name = "synonym_index")]
#[command(version)]
struct Args {
    /// TOML config file; missing file means defaults
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Overrides logging.level
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Overrides logging.format ("pretty" or "json")
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download every subject into a raw JSON file
    Fetch {
        #[arg(long, default_value = RAW_SUBJECTS_PATH)]
        out: PathBuf,

        #[arg(long, env = "WANIKANI_API_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Normalize, index and write all artifacts
    Build {
        #[arg(long, default_value = RAW_SUBJECTS_PATH)]
        input: PathBuf,

        /// Overrides output.dir
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Rebuild even if the input has not changed
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        index: IndexArgs,
    },
    /// Print the forum post for a raw subject file
    Report {
        #[arg(long, default_value = RAW_SUBJECTS_PATH)]
        input: PathBuf,

        #[command(flatten)]
        index: IndexArgs,
    },
    /// Print group counts and the largest group per category
    Stats {
        #[arg(long, default_value = RAW_SUBJECTS_PATH)]
        input: PathBuf,

        #[command(flatten)]
        index: IndexArgs,
    },
}

#[derive(clap::Args, Debug)]
struct IndexArgs {
    /// Group on primary meanings only
    #[arg(long, conflicts_with = "all_meanings")]
    only_primary: bool,

    /// Group on every accepted meaning, even if the config says otherwise
    #[arg(long)]
    all_meanings: bool,

    /// Report group members by id or by characters
    #[arg(long, value_enum)]
    members: Option<Members>,

    /// Log and skip subjects without a primary meaning instead of failing
    #[arg(long)]
    skip_malformed: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Members {
    Id,
    Characters,
}

impl IndexArgs {
    fn apply(&self, mut build: BuildConfig) -> BuildConfig {
        if self.only_primary {
            build.only_primary = true;
        }
        if self.all_meanings {
            build.only_primary = false;
        }
        if let Some(members) = self.members {
            build.members = match members {
                Members::Id => MemberKind::Id,
                Members::Characters => MemberKind::Characters,
            };
        }
        if self.skip_malformed {
            build.on_malformed = MalformedPolicy::Skip;
        }
        build
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;

    init_logging(
        args.log_level.as_deref().unwrap_or(&config.logging.level),
        args.log_format.as_deref().unwrap_or(&config.logging.format),
    );

    match args.command {
        Command::Fetch { out, token } => {
            let fetcher = SubjectFetcher::new(config.api.clone(), token)?;
            let subjects = fetcher.fetch_all().context("Failed to download subjects")?;
            persistence::save_json(&subjects, &out)?;
            info!(path = %out.display(), subjects = subjects.len(), "raw subjects saved");
        }
        Command::Build { input, out_dir, force, index } => {
            let build = index.apply(config.build);
            let dir = out_dir.unwrap_or_else(|| config.output.dir.clone());
            run_build(&input, &dir, build, force)?;
        }
        Command::Report { input, index } => {
            let engine = load_engine(&input, index.apply(config.build))?;
            print!("{}", forum_post(&engine.synonyms(), engine.subjects()));
        }
        Command::Stats { input, index } => {
            let engine = load_engine(&input, index.apply(config.build))?;
            print_stats(&engine);
        }
    }
    Ok(())
}

fn load_engine(input: &Path, build: BuildConfig) -> Result<SynonymEngine> {
    let raws: Vec<RawSubject> = persistence::load_raw_subjects(input)
        .with_context(|| format!("Failed to read subjects from {}", input.display()))?;
    Ok(SynonymEngine::from_raw(&raws, build.index_options(), build.on_malformed)?)
}

fn run_build(input: &Path, dir: &Path, build: BuildConfig, force: bool) -> Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let options = build.index_options();
    let digest = persistence::source_digest(&bytes, &options)?;

    if !force && persistence::is_up_to_date(dir, &digest) {
        info!(dir = %dir.display(), "input unchanged, skipping build");
        return Ok(());
    }

    let raws: Vec<RawSubject> = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    let engine = SynonymEngine::from_raw(&raws, options, build.on_malformed)?;
    if !engine.rejected().is_empty() {
        warn!(ids = ?engine.rejected_ids(), "subjects skipped as malformed");
    }
    let artifacts = engine.build();
    let manifest = Manifest { source_digest: digest, options };
    let written = persistence::save_artifacts(dir, engine.subjects(), &artifacts, &manifest)
        .with_context(|| format!("Failed to write artifacts to {}", dir.display()))?;

    info!(dir = %dir.display(), files = written.len(), "artifacts written");
    Ok(())
}

fn print_stats(engine: &SynonymEngine) {
    let index = engine.synonyms();
    let twins = engine.twins();

    println!("{}", "Synonym index".bold());
    for (category, groups) in index.iter() {
        println!("  {:<12} {} groups", category.title(), groups.len().to_string().green());
    }
    println!("  {:<12} {} groups", "Twins", twins.len().to_string().green());
    println!();
    println!("{}", "Largest groups".bold());
    for line in largest_groups_summary(&index).lines() {
        println!("  {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_args(argv: &[&str]) -> IndexArgs {
        let mut full = vec!["synonym_index", "stats"];
        full.extend_from_slice(argv);
        match Args::try_parse_from(full).unwrap().command {
            Command::Stats { index, .. } => index,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_all_meanings_overrides_config() {
        let config = BuildConfig { only_primary: true, ..Default::default() };
        assert!(!index_args(&["--all-meanings"]).apply(config).only_primary);
        assert!(index_args(&[]).apply(config).only_primary);
    }

    #[test]
    fn test_only_primary_overrides_config() {
        let applied = index_args(&["--only-primary", "--members", "characters"]).apply(BuildConfig::default());
        assert!(applied.only_primary);
        assert_eq!(applied.members, MemberKind::Characters);
    }

    #[test]
    fn test_conflicting_meaning_flags_rejected() {
        assert!(Args::try_parse_from(["synonym_index", "stats", "--only-primary", "--all-meanings"]).is_err());
    }
}
