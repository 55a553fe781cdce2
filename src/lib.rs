//! reorgmap - A script folder reorganization planner
//!
//! This library walks a Unity-style `Assets/Scripts` folder, classifies every
//! script against a fixed, ordered rule set (exceptions, segment rewrites and
//! UI keyword buckets) and writes the resulting old-path to new-path mapping
//! as a CSV table for review. It never moves files.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod output;
pub mod reorg_map;

pub use classifier::{Bucket, PathReclassifier};
pub use config::{ConfigError, RuleSet, RulesConfig};
pub use reorg_map::{FileRecord, ReorgError, ReorgMap};

pub use cli::{ReorgSummary, plan_reorganization, run_cli};
