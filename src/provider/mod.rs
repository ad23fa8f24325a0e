//! Subtitle provider abstraction.
//!
//! Providers are the pluggable backends that search external services
//! for subtitles and fetch the actual files. Workers drive them through
//! the [`SubtitleProvider`] trait; each worker keeps its own
//! [`ProviderScratch`] so providers can cache session state (auth
//! tokens, cookies) without any cross-worker locking.

pub mod opensubtitles;
pub mod registry;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use async_trait::async_trait;
use subscout_common::{LanguageCode, Result};

use crate::subtitle::Subtitle;
use crate::video::Video;

pub use registry::ProviderRegistry;

/// Options passed to providers on every listing call.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Keep one subtitle per language (`movie.en.srt`) instead of a
    /// single best subtitle (`movie.srt`).
    pub multi: bool,
    /// Directory for provider-managed caches, when configured.
    pub cache_dir: Option<PathBuf>,
}

/// Worker-local scratch space for provider session state.
///
/// A plain string-to-string store; providers namespace their keys
/// (`"opensubtitles.token"`). Scratch lives as long as the worker does
/// and is dropped on shutdown.
#[derive(Debug, Default)]
pub struct ProviderScratch {
    values: HashMap<String, String>,
}

impl ProviderScratch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

/// Trait for subtitle search backends.
#[async_trait]
pub trait SubtitleProvider: Send + Sync {
    /// Stable provider name used in configuration and ranking.
    fn name(&self) -> &'static str;

    /// Languages this provider can serve.
    fn available_languages(&self) -> HashSet<LanguageCode>;

    /// Whether this provider can handle the given video at all.
    fn is_valid_video(&self, video: &Video) -> bool;

    /// Search for subtitles in the given languages.
    ///
    /// Returns every candidate found; an empty list is a successful
    /// search with no results. Candidates carry their destination
    /// `path`, derived from the video path and `config.multi`.
    async fn list(
        &self,
        video: &Video,
        languages: &[LanguageCode],
        config: &ProviderConfig,
        scratch: &mut ProviderScratch,
    ) -> Result<Vec<Subtitle>>;

    /// Fetch one subtitle to its destination path.
    ///
    /// A failure that only affects this candidate (dead link, quota on
    /// this file) is reported as [`subscout_common::Error::DownloadFailed`]
    /// so the caller can fall back to the next candidate; anything else
    /// aborts the whole download task.
    async fn download(&self, subtitle: &Subtitle) -> Result<Subtitle>;
}
