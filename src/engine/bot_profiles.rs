//! Named bot profiles: strategy choice plus search settings.
//! Loaded from TOML at runtime for the play and arena CLIs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

use crate::engine::bot_strategy::{Strategy, StrategyKind};
use crate::engine::error::GameError;
use crate::engine::minimax::MinimaxParams;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BotProfile {
    pub description: Option<String>,
    /// Strategy name; difficulty aliases (`easy`, `normal`, `hard`) are accepted.
    #[serde(default = "default_strategy_type")]
    pub strategy_type: String,
    /// Minimax only. Defaults to `MinimaxParams::default()`.
    pub use_transposition_table: Option<bool>,
}

fn default_strategy_type() -> String {
    "minimax".into()
}

impl BotProfile {
    fn builtin(description: &str, strategy_type: &str, use_transposition_table: Option<bool>) -> Self {
        Self {
            description: Some(description.into()),
            strategy_type: strategy_type.into(),
            use_transposition_table,
        }
    }

    pub fn to_strategy(&self) -> Result<Strategy, GameError> {
        let kind: StrategyKind = self.strategy_type.parse()?;
        Ok(match kind {
            StrategyKind::Minimax => {
                let d = MinimaxParams::default();
                Strategy::Minimax(MinimaxParams {
                    use_transposition_table: self
                        .use_transposition_table
                        .unwrap_or(d.use_transposition_table),
                })
            }
            other => Strategy::from(other),
        })
    }
}

/// Maps difficulty tiers to profile names.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ProductionConfig {
    pub easy: Option<String>,
    pub normal: Option<String>,
    pub hard: Option<String>,
    pub default: Option<String>,
}

impl ProductionConfig {
    /// Resolve a difficulty tier to a profile name.
    pub fn resolve(&self, difficulty: &str) -> Option<&str> {
        match difficulty {
            "easy" => self.easy.as_deref(),
            "normal" => self.normal.as_deref(),
            "hard" => self.hard.as_deref(),
            _ => self.default.as_deref(),
        }
    }
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BotProfilesFile {
    #[serde(default)]
    pub profiles: HashMap<String, BotProfile>,
    #[serde(default)]
    pub production: ProductionConfig,
}

static BUILTIN_PROFILES: Lazy<BotProfilesFile> = Lazy::new(|| {
    let profiles = [
        ("random", BotProfile::builtin("Uniformly random moves", "random", None)),
        ("heuristic", BotProfile::builtin("Wins or blocks one move ahead", "heuristic", None)),
        ("minimax", BotProfile::builtin("Perfect play", "minimax", Some(true))),
        (
            "minimax_plain",
            BotProfile::builtin("Perfect play without a transposition table", "minimax", Some(false)),
        ),
    ];
    BotProfilesFile {
        profiles: profiles
            .into_iter()
            .map(|(name, profile)| (name.to_string(), profile))
            .collect(),
        production: ProductionConfig {
            easy: Some("random".into()),
            normal: Some("heuristic".into()),
            hard: Some("minimax".into()),
            default: Some("minimax".into()),
        },
    }
});

impl BotProfilesFile {
    pub fn builtin() -> Self {
        BUILTIN_PROFILES.clone()
    }

    /// Resolve a profile name, then a difficulty tier, then a bare strategy name.
    pub fn resolve_strategy(&self, name: &str) -> Result<Strategy, GameError> {
        if let Some(profile) = self.profiles.get(name) {
            return profile.to_strategy();
        }
        let tier_profile = match name {
            "easy" | "normal" | "hard" => self.production.resolve(name),
            _ => None,
        };
        if let Some(profile) = tier_profile.and_then(|p| self.profiles.get(p)) {
            return profile.to_strategy();
        }
        name.parse::<StrategyKind>().map(Strategy::from)
    }
}

/// Load profiles from a TOML file at the given path.
pub fn load_profiles(path: &Path) -> Result<BotProfilesFile, ProfileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ProfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Try to load profiles from well-known paths, falling back to the built-in set.
pub fn load_default_profiles() -> BotProfilesFile {
    let candidates = [
        "bot_profiles.toml",
        "../bot_profiles.toml",
        "/etc/tictactoe/bot_profiles.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_profiles(p) {
                Ok(profiles) => {
                    tracing::info!(path = %p.display(), count = profiles.profiles.len(), "loaded bot profiles");
                    return profiles;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load bot profiles");
                }
            }
        }
    }
    tracing::info!("no bot_profiles.toml found, using built-in defaults");
    BotProfilesFile::builtin()
}
