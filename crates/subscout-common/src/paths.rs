//! Path utilities for detecting file types by extension.
//!
//! This module provides functions to check if files are videos or subtitles
//! based on their file extensions, plus the naming helpers for subtitle
//! files that sit next to a video (`movie.srt`, `movie.en.srt`).

use std::path::{Path, PathBuf};

use crate::language::LanguageCode;

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv",
];

/// List of supported subtitle file extensions.
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "ass", "ssa", "sub", "vtt", "idx"];

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use subscout_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/video.mp4")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path has a subtitle file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use subscout_common::paths::is_subtitle_file;
///
/// assert!(is_subtitle_file(Path::new("movie.srt")));
/// assert!(!is_subtitle_file(Path::new("video.mkv")));
/// ```
pub fn is_subtitle_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUBTITLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Get the list of video file extensions.
#[must_use]
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}

/// Get the list of subtitle file extensions.
#[must_use]
pub fn subtitle_extensions() -> &'static [&'static str] {
    SUBTITLE_EXTENSIONS
}

/// Build the sibling subtitle path for a video.
///
/// With a language the file is named `stem.<lang>.<ext>`, without one it
/// is `stem.<ext>` — the convention players use to pick up external
/// subtitles automatically.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use subscout_common::paths::subtitle_path;
///
/// let video = Path::new("/media/movie.mkv");
/// let lang = "en".parse().unwrap();
/// assert_eq!(
///     subtitle_path(video, Some(&lang), "srt"),
///     Path::new("/media/movie.en.srt")
/// );
/// assert_eq!(
///     subtitle_path(video, None, "srt"),
///     Path::new("/media/movie.srt")
/// );
/// ```
pub fn subtitle_path(video: &Path, language: Option<&LanguageCode>, ext: &str) -> PathBuf {
    let name = match (video.file_stem().and_then(|s| s.to_str()), language) {
        (Some(stem), Some(lang)) => format!("{stem}.{lang}.{ext}"),
        (Some(stem), None) => format!("{stem}.{ext}"),
        (None, _) => format!("subtitle.{ext}"),
    };
    video.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("movie.mkv")));
        assert!(is_video_file(Path::new("movie.mp4")));
        assert!(is_video_file(Path::new("movie.MKV")));
        assert!(is_video_file(Path::new("/path/to/movie.avi")));
        assert!(is_video_file(Path::new("movie.1080p.mkv")));

        assert!(!is_video_file(Path::new("subtitle.srt")));
        assert!(!is_video_file(Path::new("no_extension")));
        assert!(!is_video_file(Path::new("")));
    }

    #[test]
    fn test_is_subtitle_file() {
        assert!(is_subtitle_file(Path::new("movie.srt")));
        assert!(is_subtitle_file(Path::new("movie.ass")));
        assert!(is_subtitle_file(Path::new("movie.en.srt")));
        assert!(is_subtitle_file(Path::new("movie.SRT")));

        assert!(!is_subtitle_file(Path::new("movie.mkv")));
        assert!(!is_subtitle_file(Path::new("no_extension")));
    }

    #[test]
    fn test_subtitle_path_with_language() {
        let lang: LanguageCode = "fr".parse().unwrap();
        let path = subtitle_path(Path::new("/media/show.s01e01.mkv"), Some(&lang), "srt");
        assert_eq!(path, Path::new("/media/show.s01e01.fr.srt"));
    }

    #[test]
    fn test_subtitle_path_without_language() {
        let path = subtitle_path(Path::new("movie.mkv"), None, "srt");
        assert_eq!(path, Path::new("movie.srt"));
    }
}
