//! Command-line interface module for reorgmap.
//!
//! This module handles:
//! - Argument parsing (the tool takes no options)
//! - Orchestration of discovery, classification and table emission
//! - Reporting the result to the terminal

use crate::classifier::PathReclassifier;
use crate::discovery::discover;
use crate::output::OutputFormatter;
use crate::reorg_map::{ReorgError, ReorgMap, ReorgResult};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Writes a reviewable CSV plan mapping every script under Assets/Scripts to
/// its proposed location. Nothing is moved.
#[derive(Debug, Parser)]
#[command(name = "reorgmap", version, about)]
pub struct Cli {}

/// Outcome of a planning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorgSummary {
    /// Where the table was written.
    pub output_path: PathBuf,
    /// Number of rows written, header excluded.
    pub entries: usize,
}

/// Plans the reorganization of the scripts below `project_dir` with the
/// embedded rule set.
///
/// This function:
/// 1. Compiles the embedded rule set
/// 2. Lists every matching script under `<project_dir>/<base folder>`
/// 3. Classifies each script
/// 4. Writes the sorted table inside the scanned folder
///
/// # Errors
///
/// Fails if the scanned folder cannot be read or the table cannot be
/// written. Nothing is written in the first case.
///
/// # Examples
///
/// ```no_run
/// use reorgmap::cli::plan_reorganization;
/// use std::path::Path;
///
/// let summary = plan_reorganization(Path::new("/path/to/unity/project"))?;
/// println!("{} entries", summary.entries);
/// # Ok::<(), reorgmap::ReorgError>(())
/// ```
pub fn plan_reorganization(project_dir: &Path) -> ReorgResult<ReorgSummary> {
    let classifier = PathReclassifier::builtin()?;
    plan_with_classifier(project_dir, &classifier)
}

/// Same as [`plan_reorganization`] with an explicit classifier.
pub fn plan_with_classifier(
    project_dir: &Path,
    classifier: &PathReclassifier,
) -> ReorgResult<ReorgSummary> {
    let rules = classifier.rules();
    let root = project_dir.join(rules.base_folder());

    let relative_paths = discover(&root, rules.source_pattern())?;
    let map = build_map(&root, &relative_paths, classifier)?;

    let output_path = root.join(rules.output_file());
    map.save(&output_path)?;

    Ok(ReorgSummary {
        output_path,
        entries: map.len(),
    })
}

/// Classifies every discovered path into a plan.
///
/// Fails instead of dropping a row when a source path shows up twice.
fn build_map(
    root: &Path,
    relative_paths: &[String],
    classifier: &PathReclassifier,
) -> ReorgResult<ReorgMap> {
    let mut map = ReorgMap::new(classifier.rules().base_folder());
    for relative_path in relative_paths {
        if !map.insert(classifier.record(root, relative_path)) {
            return Err(ReorgError::DuplicateSource {
                relative_path: relative_path.clone(),
            });
        }
    }
    Ok(map)
}

/// Runs a planning pass in `project_dir` and prints the confirmation line.
///
/// # Arguments
///
/// * `project_dir` - The project directory containing `Assets/Scripts`
pub fn run_cli(project_dir: &Path) -> Result<(), String> {
    let summary = plan_reorganization(project_dir).map_err(|e| e.to_string())?;

    OutputFormatter::success(&format!(
        "Wrote {} with {} entries",
        summary.output_path.display(),
        summary.entries
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_accepts_no_arguments() {
        assert!(Cli::try_parse_from(["reorgmap"]).is_ok());
    }

    #[test]
    fn test_cli_rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["reorgmap", "--dry-run"]).is_err());
        assert!(Cli::try_parse_from(["reorgmap", "Assets"]).is_err());
    }

    #[test]
    fn test_build_map_keeps_every_path() {
        let classifier = PathReclassifier::builtin().unwrap();
        let paths = vec!["Audio/A.cs".to_string(), "UI/HealthBar.cs".to_string()];

        let map = build_map(Path::new("/p/Assets/Scripts"), &paths, &classifier).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_build_map_rejects_duplicate_source() {
        let classifier = PathReclassifier::builtin().unwrap();
        let paths = vec!["A\u{FFFD}.cs".to_string(), "A\u{FFFD}.cs".to_string()];

        let result = build_map(Path::new("/p/Assets/Scripts"), &paths, &classifier);
        match result {
            Err(ReorgError::DuplicateSource { relative_path }) => {
                assert_eq!(relative_path, "A\u{FFFD}.cs");
            }
            other => panic!("Expected a duplicate source error, got {:?}", other.map(|m| m.len())),
        }
    }

    #[test]
    fn test_run_cli_reports_missing_scripts_folder() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        let err = run_cli(temp_dir.path()).unwrap_err();
        assert!(err.contains("Cannot read source folder"));
    }
}
