//! Subtitle candidates, as reported by providers.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use subscout_common::LanguageCode;

/// A subtitle found by a provider for a specific video.
///
/// Candidates are produced by listing, ranked, and finally downloaded;
/// `path` is the destination next to the video, decided at listing time,
/// and points at an actual file only once a download succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct Subtitle {
    /// Path of the video this subtitle belongs to.
    pub video_path: PathBuf,
    /// Name of the provider that found it.
    pub provider: String,
    /// Subtitle language.
    pub language: LanguageCode,
    /// Provider-reported confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Release name the subtitle was made for, when the provider knows it.
    pub release: Option<String>,
    /// Extra keyword tokens reported by the provider.
    pub keywords: HashSet<String>,
    /// Provider-specific locator used to fetch the file.
    pub link: Option<String>,
    /// Destination file path next to the video.
    pub path: Option<PathBuf>,
}

impl Subtitle {
    /// Short display form for logs and CLI output.
    pub fn describe(&self) -> String {
        format!(
            "{} [{}] from {} ({:.0}%)",
            self.video_path.display(),
            self.language,
            self.provider,
            self.confidence * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let subtitle = Subtitle {
            video_path: PathBuf::from("/media/movie.mkv"),
            provider: "opensubtitles".to_string(),
            language: "en".parse().unwrap(),
            confidence: 0.85,
            release: None,
            keywords: HashSet::new(),
            link: None,
            path: None,
        };
        assert_eq!(
            subtitle.describe(),
            "/media/movie.mkv [en] from opensubtitles (85%)"
        );
    }
}
