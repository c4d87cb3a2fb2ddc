//! Engine configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! built-in behavior:
//!
//! ```toml
//! [xp]
//! extra_entries_award_xp = false
//!
//! [report]
//! window_days = 30
//! include_extra = true
//!
//! [ranks]
//! model = "categories"
//!
//! # Optional custom ladder, lowest tier first
//! [[ranks.ladder]]
//! name = "Starter"
//! requirement = { min_xp = 0 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::HabitError;
use crate::progress::{Rank, RankLadder, RankModel};
use crate::query::ReportOptions;
use crate::Result;

/// XP award policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpConfig {
    /// Whether completing an extra entry grants XP
    pub extra_entries_award_xp: bool,
}

/// Report defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Days before today covered when no explicit range is given
    pub window_days: u32,
    pub include_extra: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            include_extra: true,
        }
    }
}

/// Rank ladder selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Built-in ladder to use when no custom ladder is given
    pub model: RankModel,
    /// Custom tiers, lowest first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ladder: Option<Vec<Rank>>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub xp: XpConfig,
    pub report: ReportConfig,
    pub ranks: RankConfig,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HabitError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// The custom ladder if one is configured, else the built-in ladder for
    /// the configured model.
    pub fn rank_ladder(&self) -> Result<RankLadder> {
        match &self.ranks.ladder {
            Some(ranks) => RankLadder::new(ranks.clone()),
            None => Ok(RankLadder::for_model(self.ranks.model)),
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions::new().include_extra(self.report.include_extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Requirement;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.xp.extra_entries_award_xp);
        assert_eq!(config.report.window_days, 30);
        assert!(config.report.include_extra);
        assert_eq!(config.ranks.model, RankModel::Categories);
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_toml_str(
            r#"
            [xp]
            extra_entries_award_xp = true

            [report]
            window_days = 7
            "#,
        )
        .unwrap();
        assert!(config.xp.extra_entries_award_xp);
        assert_eq!(config.report.window_days, 7);
        assert!(config.report.include_extra);
        assert!(config.report_options().include_extra);
    }

    #[test]
    fn test_model_selects_builtin_ladder() {
        let config = EngineConfig::from_toml_str("[ranks]\nmodel = \"xp\"\n").unwrap();
        let ladder = config.rank_ladder().unwrap();
        assert_eq!(ladder.model(), RankModel::Xp);
        assert_eq!(ladder.ranks().len(), 6);
    }

    #[test]
    fn test_custom_ladder() {
        let config = EngineConfig::from_toml_str(
            r#"
            [[ranks.ladder]]
            name = "Starter"
            requirement = { min_xp = 0 }

            [[ranks.ladder]]
            name = "Regular"
            description = "Keep going."
            requirement = { min_xp = 20 }
            "#,
        )
        .unwrap();
        let ladder = config.rank_ladder().unwrap();
        assert_eq!(ladder.ranks()[1].name, "Regular");
        assert_eq!(ladder.ranks()[1].requirement, Requirement::MinXp(20));
    }

    #[test]
    fn test_mixed_custom_ladder_is_rejected() {
        let config = EngineConfig::from_toml_str(
            r#"
            [[ranks.ladder]]
            name = "A"
            requirement = { min_xp = 0 }

            [[ranks.ladder]]
            name = "B"
            requirement = { categories = { Health = 2 } }
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.rank_ladder(),
            Err(HabitError::MixedRankModels)
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let result = EngineConfig::from_toml_str("[xp]\nextra_entries_award_xp = 3\n");
        assert!(matches!(result, Err(HabitError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[report]\ninclude_extra = false").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert!(!config.report.include_extra);

        let missing = EngineConfig::load(Path::new("/nonexistent/habit.toml"));
        assert!(matches!(missing, Err(HabitError::FileRead { .. })));
    }
}
