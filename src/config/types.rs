use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::EngineOptions;
use crate::ranking::{self, RankCriterion};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Preferred subtitle languages, most preferred first (ISO-639-1).
    /// Empty means any language.
    #[serde(default)]
    pub languages: Vec<String>,

    /// Preferred providers, most preferred first. Empty means every
    /// registered provider, in registration order.
    #[serde(default)]
    pub providers: Vec<String>,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub opensubtitles: OpenSubtitlesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Number of concurrent workers.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Keep one subtitle per language instead of a single best.
    #[serde(default)]
    pub multi: bool,

    /// Search even when subtitles already exist on disk.
    #[serde(default)]
    pub force: bool,

    /// Directory scan depth; 0 means unlimited.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Ranking criteria, most significant first.
    #[serde(default = "default_sort_order")]
    pub sort_order: Vec<RankCriterion>,

    /// Directory for provider caches.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_workers() -> usize {
    4
}

fn default_max_depth() -> usize {
    3
}

fn default_sort_order() -> Vec<RankCriterion> {
    ranking::DEFAULT_SORT_ORDER.to_vec()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            multi: false,
            force: false,
            max_depth: default_max_depth(),
            sort_order: default_sort_order(),
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenSubtitlesConfig {
    /// API key; required for the provider to work.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Optional account credentials for higher download quotas.
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl Config {
    /// Engine options derived from this configuration.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            workers: self.engine.workers,
            multi: self.engine.multi,
            force: self.engine.force,
            max_depth: self.engine.max_depth,
            sort_order: self.engine.sort_order.clone(),
            cache_dir: self.engine.cache_dir.clone(),
        }
    }
}
