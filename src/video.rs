//! Video identity and kind, derived from the filename.
//!
//! A [`Video`] is keyed by its normalized absolute path; everything else
//! (movie vs. episode, title, year, season/episode numbers, keyword set)
//! is parsed out of the release name with `subscout-release`.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::Serialize;
use subscout_release::MediaType;

/// What a video file is, with kind-specific attributes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    /// A single movie.
    Movie {
        title: String,
        year: Option<u16>,
    },
    /// A single episode within a series.
    Episode {
        series: String,
        season: u16,
        episode: u16,
    },
}

/// A video file the engine is finding subtitles for.
///
/// Identity (equality, hashing) is the normalized absolute path alone;
/// the parsed metadata rides along for ranking.
#[derive(Debug, Clone, Serialize)]
pub struct Video {
    path: PathBuf,
    kind: VideoKind,
    release_name: String,
    keywords: HashSet<String>,
}

impl Video {
    /// Identify a video from its path.
    ///
    /// The path is made absolute (without touching the filesystem beyond
    /// the current directory lookup) so the same file always produces the
    /// same identity. A release is treated as an episode when an episode
    /// number parses; season defaults to 1 for daily/anime naming.
    pub fn from_path(path: &Path) -> Self {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let parsed = subscout_release::parse(stem);
        let release_name = stem.to_string();

        let kind = match (parsed.media_type, parsed.episode) {
            (MediaType::Tv, Some(episode)) => VideoKind::Episode {
                series: parsed.title.clone(),
                season: parsed.season.unwrap_or(1),
                episode,
            },
            _ => VideoKind::Movie {
                title: parsed.title.clone(),
                year: parsed.year,
            },
        };

        Self {
            path,
            kind,
            release_name,
            keywords: parsed.keywords,
        }
    }

    /// Normalized absolute path of the video file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Movie or episode, with parsed attributes.
    pub fn kind(&self) -> &VideoKind {
        &self.kind
    }

    /// The raw release name (file stem) the metadata was parsed from.
    pub fn release_name(&self) -> &str {
        &self.release_name
    }

    /// Normalized keyword tokens inferred from the release name.
    pub fn keywords(&self) -> &HashSet<String> {
        &self.keywords
    }
}

impl PartialEq for Video {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Video {}

impl Hash for Video {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_identification() {
        let video = Video::from_path(Path::new("/media/The.Matrix.1999.1080p.BluRay.x264-GRP.mkv"));
        match video.kind() {
            VideoKind::Movie { title, year } => {
                assert_eq!(title, "The Matrix");
                assert_eq!(*year, Some(1999));
            }
            other => panic!("expected movie, got {other:?}"),
        }
        assert!(video.keywords().contains("bluray"));
    }

    #[test]
    fn test_episode_identification() {
        let video = Video::from_path(Path::new("/tv/Breaking.Bad.S02E03.720p.HDTV.x264-CTU.mkv"));
        match video.kind() {
            VideoKind::Episode {
                series,
                season,
                episode,
            } => {
                assert_eq!(series, "Breaking Bad");
                assert_eq!(*season, 2);
                assert_eq!(*episode, 3);
            }
            other => panic!("expected episode, got {other:?}"),
        }
    }

    #[test]
    fn test_episode_without_season_defaults_to_one() {
        let video = Video::from_path(Path::new("/tv/Show Name 1x05 HDTV.mkv"));
        match video.kind() {
            VideoKind::Episode { season, episode, .. } => {
                assert_eq!(*season, 1);
                assert_eq!(*episode, 5);
            }
            other => panic!("expected episode, got {other:?}"),
        }
    }

    #[test]
    fn test_identity_is_the_path() {
        let a = Video::from_path(Path::new("/media/movie.mkv"));
        let b = Video::from_path(Path::new("/media/movie.mkv"));
        let c = Video::from_path(Path::new("/media/other.mkv"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_path_is_absolute() {
        let video = Video::from_path(Path::new("relative/movie.mkv"));
        assert!(video.path().is_absolute());
    }
}
