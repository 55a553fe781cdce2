//! Reorganization rule set.
//!
//! The rules live in a TOML document that is embedded into the binary at
//! build time (`default_rules.toml`). The document is deserialized into a
//! [`RulesConfig`] and then compiled into a validated, immutable [`RuleSet`]
//! that the classifier reads from.
//!
//! # Rule File Format
//!
//! ```toml
//! [layout]
//! base_folder = "Assets/Scripts"
//! source_pattern = "*.cs"
//! output_file = "reorg_map.csv"
//!
//! [[exceptions]]
//! source = "Utils/GlobalInputLock.cs"
//! target = "Input/Global/GlobalInputLock.cs"
//!
//! [[rewrites]]
//! pattern = "Audio/"
//! replacement = "Systems/Audio/"
//!
//! [ui]
//! segment = "UI"
//! screens = ["Menu"]
//! controls = ["Button"]
//! ```

use glob::Pattern;
use serde::Deserialize;

/// The rule set shipped with the tool.
const DEFAULT_RULES: &str = include_str!("default_rules.toml");

/// Errors that can occur while loading or validating the rule set.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Invalid TOML syntax or structure.
    Invalid(String),
    /// The source file pattern is not a valid glob.
    InvalidGlobPattern(String),
    /// A rule is structurally valid TOML but cannot be applied safely.
    InvalidRule {
        /// Short description of the offending rule.
        rule: String,
        /// Why the rule was rejected.
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid(msg) => write!(f, "Invalid rule set: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid source file pattern '{}'", pattern)
            }
            ConfigError::InvalidRule { rule, reason } => {
                write!(f, "Invalid rule {}: {}", rule, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Rule set document as written in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    pub layout: LayoutRules,

    /// Exact-prefix overrides, checked in declaration order.
    #[serde(default)]
    pub exceptions: Vec<ExceptionRule>,

    /// Literal substring replacements, all applied in declaration order.
    #[serde(default)]
    pub rewrites: Vec<SegmentRewriteRule>,

    pub ui: KeywordRules,
}

/// Where the scripts live and where the plan is written.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutRules {
    /// Project-relative folder that is scanned, e.g. `Assets/Scripts`.
    pub base_folder: String,
    /// Glob matched against bare file names, e.g. `*.cs`.
    pub source_pattern: String,
    /// File name of the emitted table, placed inside the scanned folder.
    pub output_file: String,
}

/// Maps every relative path starting with `source` to the fixed `target`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExceptionRule {
    pub source: String,
    pub target: String,
}

/// Replaces every occurrence of `pattern` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SegmentRewriteRule {
    pub pattern: String,
    pub replacement: String,
}

/// Keyword lists used to split the UI namespace into buckets.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRules {
    /// Top-level segment the buckets apply to, without a trailing slash.
    pub segment: String,
    #[serde(default)]
    pub screens: Vec<String>,
    #[serde(default)]
    pub controls: Vec<String>,
}

impl RulesConfig {
    /// Parses the rule set embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the embedded document does not parse.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_RULES)
    }

    /// Parses a rule set from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Validate the document and compile it into a [`RuleSet`].
    ///
    /// # Errors
    ///
    /// Returns an error if the glob is invalid, a rewrite pattern could match
    /// inside a file name, or an exception target names a different file than
    /// its source.
    pub fn compile(self) -> Result<RuleSet, ConfigError> {
        RuleSet::new(self)
    }
}

/// Validated, immutable rules ready for classification.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) base_folder: String,
    pub(crate) source_pattern: Pattern,
    pub(crate) output_file: String,
    pub(crate) exceptions: Vec<ExceptionRule>,
    pub(crate) rewrites: Vec<SegmentRewriteRule>,
    /// `segment` followed by `/`, as matched against relative paths.
    pub(crate) ui_prefix: String,
    pub(crate) screens_keywords: Vec<String>,
    pub(crate) controls_keywords: Vec<String>,
}

impl RuleSet {
    /// Loads and compiles the embedded rule set.
    pub fn builtin() -> Result<Self, ConfigError> {
        RulesConfig::builtin()?.compile()
    }

    fn new(config: RulesConfig) -> Result<Self, ConfigError> {
        let layout = config.layout;

        let source_pattern = Pattern::new(&layout.source_pattern)
            .map_err(|_| ConfigError::InvalidGlobPattern(layout.source_pattern.clone()))?;

        let base_folder = layout.base_folder.trim_matches('/').to_string();
        if base_folder.is_empty() {
            return Err(invalid_rule("layout.base_folder", "must not be empty"));
        }
        if layout.output_file.is_empty() || layout.output_file.contains('/') {
            return Err(invalid_rule(
                "layout.output_file",
                "must be a bare, non-empty file name",
            ));
        }

        for exception in &config.exceptions {
            if exception.source.is_empty() {
                return Err(invalid_rule("exception ''", "source prefix is empty"));
            }
            if file_name_of(&exception.source) != file_name_of(&exception.target) {
                return Err(invalid_rule(
                    &format!("exception '{}'", exception.source),
                    &format!("target '{}' ends in a different file name", exception.target),
                ));
            }
        }

        // A pattern ending in '/' never matches inside the final file name.
        // Exceptions still match by prefix, so a longer name sharing the
        // source prefix takes the target's file name.
        for rewrite in &config.rewrites {
            if !rewrite.pattern.ends_with('/') {
                return Err(invalid_rule(
                    &format!("rewrite '{}'", rewrite.pattern),
                    "pattern must be non-empty and end with '/'",
                ));
            }
        }

        let segment = config.ui.segment.trim_matches('/');
        if segment.is_empty() {
            return Err(invalid_rule("ui.segment", "must not be empty"));
        }
        for keyword in config.ui.screens.iter().chain(&config.ui.controls) {
            if keyword.is_empty() {
                return Err(invalid_rule("ui keywords", "empty keyword matches every file"));
            }
        }

        Ok(Self {
            base_folder,
            source_pattern,
            output_file: layout.output_file,
            exceptions: config.exceptions,
            rewrites: config.rewrites,
            ui_prefix: format!("{}/", segment),
            screens_keywords: config.ui.screens,
            controls_keywords: config.ui.controls,
        })
    }

    /// Project-relative folder that is scanned, without slashes at the ends.
    pub fn base_folder(&self) -> &str {
        &self.base_folder
    }

    /// Glob a bare file name must match to be planned.
    pub fn source_pattern(&self) -> &Pattern {
        &self.source_pattern
    }

    /// File name of the emitted table.
    pub fn output_file(&self) -> &str {
        &self.output_file
    }
}

fn invalid_rule(rule: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidRule {
        rule: rule.to_string(),
        reason: reason.to_string(),
    }
}

/// Last `/`-separated segment of a relative path.
pub(crate) fn file_name_of(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> RulesConfig {
        RulesConfig::from_toml_str(
            r#"
            [layout]
            base_folder = "Assets/Scripts"
            source_pattern = "*.cs"
            output_file = "reorg_map.csv"

            [ui]
            segment = "UI"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_rules_compile() {
        let rules = RuleSet::builtin().expect("embedded rules must compile");
        assert_eq!(rules.base_folder(), "Assets/Scripts");
        assert_eq!(rules.output_file(), "reorg_map.csv");
        assert_eq!(rules.ui_prefix, "UI/");
    }

    #[test]
    fn test_builtin_rules_keep_declaration_order() {
        let config = RulesConfig::builtin().unwrap();

        assert_eq!(config.exceptions.len(), 5);
        assert_eq!(config.exceptions[0].source, "Utils/PlayAudioAfterDelay.cs");
        assert_eq!(config.exceptions[4].source, "Utils/GlobalInputBlockerUI.cs");

        assert_eq!(config.rewrites.len(), 13);
        assert_eq!(config.rewrites[0].pattern, "Abstracts/");
        assert_eq!(config.rewrites[11].pattern, "Utils/");
        assert_eq!(config.rewrites[12].pattern, "Effect Areas/");

        assert_eq!(config.ui.screens[0], "Menu");
        assert_eq!(config.ui.controls[0], "Button");
    }

    #[test]
    fn test_source_pattern_is_case_sensitive() {
        let rules = RuleSet::builtin().unwrap();
        assert!(rules.source_pattern().matches("Player.cs"));
        assert!(!rules.source_pattern().matches("Player.CS"));
        assert!(!rules.source_pattern().matches("Player.cs.meta"));
    }

    #[test]
    fn test_minimal_config_compiles_with_empty_tables() {
        let rules = minimal_config().compile().unwrap();
        assert!(rules.exceptions.is_empty());
        assert!(rules.rewrites.is_empty());
        assert!(rules.screens_keywords.is_empty());
    }

    #[test]
    fn test_base_folder_slashes_are_trimmed() {
        let mut config = minimal_config();
        config.layout.base_folder = "/Assets/Scripts/".to_string();
        let rules = config.compile().unwrap();
        assert_eq!(rules.base_folder(), "Assets/Scripts");
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = RulesConfig::from_toml_str("[layout\nbase_folder = ");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_glob_returns_error() {
        let mut config = minimal_config();
        config.layout.source_pattern = "[invalid".to_string();
        assert!(matches!(
            config.compile(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_rewrite_without_trailing_slash_is_rejected() {
        let mut config = minimal_config();
        config.rewrites.push(SegmentRewriteRule {
            pattern: "Audio".to_string(),
            replacement: "Systems/Audio".to_string(),
        });
        assert!(matches!(
            config.compile(),
            Err(ConfigError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_empty_rewrite_pattern_is_rejected() {
        let mut config = minimal_config();
        config.rewrites.push(SegmentRewriteRule {
            pattern: String::new(),
            replacement: "X/".to_string(),
        });
        assert!(config.compile().is_err());
    }

    #[test]
    fn test_exception_changing_file_name_is_rejected() {
        let mut config = minimal_config();
        config.exceptions.push(ExceptionRule {
            source: "Utils/Foo.cs".to_string(),
            target: "Core/Bar.cs".to_string(),
        });
        let err = config.compile().unwrap_err();
        assert!(err.to_string().contains("Utils/Foo.cs"));
    }

    #[test]
    fn test_empty_keyword_is_rejected() {
        let mut config = minimal_config();
        config.ui.controls.push(String::new());
        assert!(config.compile().is_err());
    }

    #[test]
    fn test_output_file_must_be_bare_name() {
        let mut config = minimal_config();
        config.layout.output_file = "out/map.csv".to_string();
        assert!(config.compile().is_err());
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("UI/HUD/HealthBar.cs"), "HealthBar.cs");
        assert_eq!(file_name_of("Root.cs"), "Root.cs");
    }
}
