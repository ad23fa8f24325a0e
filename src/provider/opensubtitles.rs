//! OpenSubtitles subtitle provider.
//!
//! Implements [`SubtitleProvider`] against the OpenSubtitles REST API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Optional account login; the session token is cached in the worker's
//!   [`ProviderScratch`] and reused across tasks.
//! - 30-second request timeout.
//! - Per-candidate download failures are reported as `DownloadFailed` so
//!   the worker can fall back to the next candidate.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use subscout_common::{language, paths, Error, LanguageCode, Result};
use tracing::{debug, warn};

use crate::provider::{ProviderConfig, ProviderScratch, SubtitleProvider};
use crate::subtitle::Subtitle;
use crate::video::{Video, VideoKind};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const API_BASE_URL: &str = "https://api.opensubtitles.com/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("subscout v", env!("CARGO_PKG_VERSION"));
const TOKEN_KEY: &str = "opensubtitles.token";

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    attributes: SearchAttributes,
}

#[derive(Debug, Deserialize)]
struct SearchAttributes {
    language: Option<String>,
    release: Option<String>,
    ratings: Option<f64>,
    #[serde(default)]
    files: Vec<SubtitleFile>,
}

#[derive(Debug, Deserialize)]
struct SubtitleFile {
    file_id: u64,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct DownloadResponse {
    link: String,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// OpenSubtitles provider.
///
/// Searches by parsed title and episode numbers rather than file hash, so
/// it works for files that are still being moved or renamed.
pub struct OpenSubtitlesProvider {
    client: reqwest::Client,
    api_key: String,
    username: Option<String>,
    password: Option<String>,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl OpenSubtitlesProvider {
    /// Create a provider with the given API key and optional account
    /// credentials. Rate limiting is configured at 4 requests per second.
    pub fn new(api_key: String, username: Option<String>, password: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build reqwest client");

        let quota = Quota::per_second(NonZeroU32::new(4).expect("nonzero quota"));
        let rate_limiter = RateLimiter::direct(quota);

        Self {
            client,
            api_key,
            username,
            password,
            rate_limiter,
        }
    }

    /// Log in and cache the session token, when credentials are configured.
    async fn ensure_token(&self, scratch: &mut ProviderScratch) -> Result<Option<String>> {
        if let Some(token) = scratch.get(TOKEN_KEY) {
            return Ok(Some(token.to_string()));
        }
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return Ok(None);
        };

        self.rate_limiter.until_ready().await;
        let resp = self
            .client
            .post(format!("{API_BASE_URL}/login"))
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Error::provider(
                "opensubtitles",
                format!("login failed with status {}", resp.status()),
            ));
        }

        let body: LoginResponse = resp
            .json()
            .await
            .map_err(|e| Error::provider("opensubtitles", format!("bad login response: {e}")))?;

        debug!("opensubtitles session established");
        scratch.insert(TOKEN_KEY, body.token.clone());
        Ok(Some(body.token))
    }

    /// Build the search query parameters for a video.
    fn search_params(video: &Video, languages: &[LanguageCode]) -> Vec<(String, String)> {
        let joined = languages
            .iter()
            .map(|l| l.as_str().to_string())
            .collect::<Vec<_>>()
            .join(",");
        let mut params = vec![("languages".to_string(), joined)];

        match video.kind() {
            VideoKind::Movie { title, year } => {
                params.push(("query".to_string(), title.clone()));
                if let Some(year) = year {
                    params.push(("year".to_string(), year.to_string()));
                }
            }
            VideoKind::Episode {
                series,
                season,
                episode,
            } => {
                params.push(("query".to_string(), series.clone()));
                params.push(("season_number".to_string(), season.to_string()));
                params.push(("episode_number".to_string(), episode.to_string()));
            }
        }
        params
    }
}

#[async_trait]
impl SubtitleProvider for OpenSubtitlesProvider {
    fn name(&self) -> &'static str {
        "opensubtitles"
    }

    fn available_languages(&self) -> HashSet<LanguageCode> {
        language::all_codes().into_iter().collect()
    }

    fn is_valid_video(&self, _video: &Video) -> bool {
        // Name-based search handles anything the release parser accepts.
        true
    }

    async fn list(
        &self,
        video: &Video,
        languages: &[LanguageCode],
        config: &ProviderConfig,
        scratch: &mut ProviderScratch,
    ) -> Result<Vec<Subtitle>> {
        let token = self.ensure_token(scratch).await?;
        let wanted: HashSet<&LanguageCode> = languages.iter().collect();

        self.rate_limiter.until_ready().await;
        let mut request = self
            .client
            .get(format!("{API_BASE_URL}/subtitles"))
            .header("Api-Key", &self.api_key)
            .query(&Self::search_params(video, languages));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Error::provider(
                "opensubtitles",
                format!("search failed with status {}", resp.status()),
            ));
        }

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::provider("opensubtitles", format!("bad search response: {e}")))?;

        let mut subtitles = Vec::new();
        for item in body.data {
            let attrs = item.attributes;
            let Some(lang) = attrs.language.as_deref() else {
                continue;
            };
            let Ok(lang) = lang.parse::<LanguageCode>() else {
                // Three-letter and regional tags are out of scope.
                continue;
            };
            if !wanted.contains(&lang) {
                continue;
            }
            let Some(file) = attrs.files.first() else {
                continue;
            };

            let destination = paths::subtitle_path(
                video.path(),
                config.multi.then_some(&lang),
                "srt",
            );
            subtitles.push(Subtitle {
                video_path: video.path().to_path_buf(),
                provider: "opensubtitles".to_string(),
                language: lang,
                confidence: attrs
                    .ratings
                    .map(|r| (r / 10.0).clamp(0.0, 1.0))
                    .unwrap_or(0.5),
                release: attrs.release,
                keywords: HashSet::new(),
                link: Some(file.file_id.to_string()),
                path: Some(destination),
            });
        }

        debug!(
            video = %video.path().display(),
            count = subtitles.len(),
            "opensubtitles search done"
        );
        Ok(subtitles)
    }

    async fn download(&self, subtitle: &Subtitle) -> Result<Subtitle> {
        let Some(file_id) = subtitle.link.as_deref() else {
            return Err(Error::download_failed("candidate has no file id"));
        };
        let Some(destination) = subtitle.path.as_deref() else {
            return Err(Error::download_failed("candidate has no destination path"));
        };
        let file_id: u64 = file_id
            .parse()
            .map_err(|_| Error::download_failed(format!("malformed file id {file_id:?}")))?;

        self.rate_limiter.until_ready().await;
        let resp = self
            .client
            .post(format!("{API_BASE_URL}/download"))
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({ "file_id": file_id }))
            .send()
            .await
            .map_err(|e| Error::download_failed(e.to_string()))?;

        if !resp.status().is_success() {
            // Quota exhaustion and dead links only poison this candidate.
            warn!(
                status = %resp.status(),
                file_id,
                "opensubtitles download request rejected"
            );
            return Err(Error::download_failed(format!(
                "download request failed with status {}",
                resp.status()
            )));
        }

        let body: DownloadResponse = resp
            .json()
            .await
            .map_err(|e| Error::download_failed(format!("bad download response: {e}")))?;

        self.rate_limiter.until_ready().await;
        let content = self
            .client
            .get(&body.link)
            .send()
            .await
            .map_err(|e| Error::download_failed(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::download_failed(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| Error::download_failed(e.to_string()))?;

        tokio::fs::write(destination, &content).await?;
        debug!(path = %destination.display(), "subtitle written");

        Ok(subtitle.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn provider() -> OpenSubtitlesProvider {
        OpenSubtitlesProvider::new("test-key".into(), None, None)
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider().name(), "opensubtitles");
    }

    #[test]
    fn test_serves_all_known_languages() {
        let langs = provider().available_languages();
        assert!(langs.contains(&"en".parse().unwrap()));
        assert!(langs.contains(&"fr".parse().unwrap()));
        assert_eq!(langs.len(), language::all_codes().len());
    }

    #[test]
    fn test_movie_search_params() {
        let video = Video::from_path(Path::new("/media/The.Matrix.1999.1080p.mkv"));
        let langs: Vec<LanguageCode> = vec!["en".parse().unwrap(), "fr".parse().unwrap()];
        let params = OpenSubtitlesProvider::search_params(&video, &langs);

        assert!(params.contains(&("languages".to_string(), "en,fr".to_string())));
        assert!(params.contains(&("query".to_string(), "The Matrix".to_string())));
        assert!(params.contains(&("year".to_string(), "1999".to_string())));
    }

    #[test]
    fn test_episode_search_params() {
        let video = Video::from_path(Path::new("/tv/Show.S02E03.720p.HDTV.mkv"));
        let langs: Vec<LanguageCode> = vec!["en".parse().unwrap()];
        let params = OpenSubtitlesProvider::search_params(&video, &langs);

        assert!(params.contains(&("query".to_string(), "Show".to_string())));
        assert!(params.contains(&("season_number".to_string(), "2".to_string())));
        assert!(params.contains(&("episode_number".to_string(), "3".to_string())));
    }

    #[tokio::test]
    async fn test_download_without_file_id_fails_softly() {
        let subtitle = Subtitle {
            video_path: "/media/movie.mkv".into(),
            provider: "opensubtitles".to_string(),
            language: "en".parse().unwrap(),
            confidence: 0.5,
            release: None,
            keywords: HashSet::new(),
            link: None,
            path: Some("/media/movie.srt".into()),
        };
        let err = provider().download(&subtitle).await.unwrap_err();
        assert!(matches!(err, Error::DownloadFailed(_)));
    }

    #[tokio::test]
    async fn test_download_with_malformed_file_id_fails_softly() {
        let subtitle = Subtitle {
            video_path: "/media/movie.mkv".into(),
            provider: "opensubtitles".to_string(),
            language: "en".parse().unwrap(),
            confidence: 0.5,
            release: None,
            keywords: HashSet::new(),
            link: Some("not-a-number".to_string()),
            path: Some("/media/movie.srt".into()),
        };
        let err = provider().download(&subtitle).await.unwrap_err();
        assert!(matches!(err, Error::DownloadFailed(_)));
    }
}
