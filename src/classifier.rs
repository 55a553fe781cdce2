//! Path classification for the script reorganization plan.
//!
//! Every relative path goes through the same three steps:
//!
//! 1. Exceptions: the first rule whose source is a prefix of the path wins and
//!    its target is returned as is.
//! 2. Segment rewrites: every rule is applied, in order, as a plain substring
//!    replacement on the path.
//! 3. UI buckets: if the original path starts with the UI segment, each
//!    occurrence of that segment in the rewritten path is expanded with the
//!    bucket picked from the file name.
//!
//! Rewrites are not anchored to segment boundaries, so `Audio/` also hits
//! `UI/MenuAudio/`. Existing plans were produced that way and the output must
//! stay identical.
//!
//! # Examples
//!
//! ```
//! use reorgmap::classifier::{Bucket, PathReclassifier};
//!
//! let classifier = PathReclassifier::builtin().unwrap();
//! assert_eq!(classifier.classify("Audio/Footsteps.cs"), "Systems/Audio/Footsteps.cs");
//! assert_eq!(classifier.bucket_for("HealthBar.cs"), Bucket::Components);
//! ```
use crate::config::{ConfigError, RuleSet, file_name_of};
use crate::reorg_map::FileRecord;
use std::path::Path;

/// Sub-folder of the UI namespace a file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Full-screen views: menus, loaders, intros.
    Screens,
    /// Interactive widgets: buttons, pads, mobile inputs.
    Controls,
    /// Everything else.
    Components,
}

impl Bucket {
    /// Returns the directory name for this bucket.
    ///
    /// ```
    /// use reorgmap::classifier::Bucket;
    ///
    /// assert_eq!(Bucket::Screens.dir_name(), "Screens");
    /// assert_eq!(Bucket::Components.dir_name(), "Components");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Bucket::Screens => "Screens",
            Bucket::Controls => "Controls",
            Bucket::Components => "Components",
        }
    }
}

/// Computes the proposed location of every script from a fixed rule set.
#[derive(Debug, Clone)]
pub struct PathReclassifier {
    rules: RuleSet,
}

impl PathReclassifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Creates a classifier over the embedded rule set.
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self::new(RuleSet::builtin()?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the proposed relative path for `relative_path`.
    ///
    /// Never fails: a path no rule touches maps to itself. Rewrites and UI
    /// buckets keep the file name. An exception replaces the whole path with
    /// its target, including for longer paths that merely start with the
    /// exception's source.
    ///
    /// ```
    /// use reorgmap::classifier::PathReclassifier;
    ///
    /// let classifier = PathReclassifier::builtin().unwrap();
    /// assert_eq!(
    ///     classifier.classify("Utils/PlayAudioAfterDelay.cs"),
    ///     "Systems/Audio/PlayAudioAfterDelay.cs"
    /// );
    /// assert_eq!(
    ///     classifier.classify("UI/PauseMenuButton.cs"),
    ///     "UI/Screens/PauseMenuButton.cs"
    /// );
    /// ```
    pub fn classify(&self, relative_path: &str) -> String {
        if let Some(target) = self.exception_target(relative_path) {
            return target.to_string();
        }

        let mut proposed = relative_path.to_string();
        for rewrite in &self.rules.rewrites {
            proposed = proposed.replace(&rewrite.pattern, &rewrite.replacement);
        }

        // Gate on the original path, rewrite the already rewritten one.
        let ui_prefix = &self.rules.ui_prefix;
        if relative_path.starts_with(ui_prefix.as_str()) {
            let bucket = self.bucket_for(file_name_of(relative_path));
            let bucket_prefix = format!("{}{}/", ui_prefix, bucket.dir_name());
            proposed = proposed.replace(ui_prefix.as_str(), &bucket_prefix);
        }

        proposed
    }

    /// Picks the UI bucket for a bare file name.
    ///
    /// Screens keywords are tried first, then controls keywords; matching is a
    /// case-sensitive substring test. Falls back to [`Bucket::Components`].
    pub fn bucket_for(&self, file_name: &str) -> Bucket {
        if contains_any(file_name, &self.rules.screens_keywords) {
            Bucket::Screens
        } else if contains_any(file_name, &self.rules.controls_keywords) {
            Bucket::Controls
        } else {
            Bucket::Components
        }
    }

    /// Classifies `relative_path` and anchors both sides under `root`.
    pub fn record(&self, root: &Path, relative_path: &str) -> FileRecord {
        let destination = self.classify(relative_path);
        FileRecord::new(root, relative_path.to_string(), destination)
    }

    fn exception_target(&self, relative_path: &str) -> Option<&str> {
        self.rules
            .exceptions
            .iter()
            .find(|exception| relative_path.starts_with(exception.source.as_str()))
            .map(|exception| exception.target.as_str())
    }
}

fn contains_any(file_name: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| file_name.contains(keyword.as_str()))
}
