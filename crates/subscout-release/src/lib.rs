//! # subscout-release
//!
//! A small parser for scene release names.
//!
//! Extracts the structured metadata subscout needs from filenames like
//! `The.Matrix.1999.1080p.BluRay.x264-GROUP`: title, year, season and
//! episode numbers, the release group, and a set of normalized keyword
//! tokens (source, codec, resolution, audio) used for subtitle matching.
//!
//! ## Quick Start
//!
//! ```
//! use subscout_release::parse;
//!
//! let release = parse("The.Matrix.1999.1080p.BluRay.x264-GROUP");
//!
//! assert_eq!(release.title, "The Matrix");
//! assert_eq!(release.year, Some(1999));
//! assert!(release.keywords.contains("bluray"));
//! assert_eq!(release.release_group.as_deref(), Some("GROUP"));
//! ```

pub mod keywords;

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Kind of media a release name appears to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// No episode markers found.
    Movie,
    /// Season/episode markers found.
    Tv,
}

/// Structured metadata extracted from a release name.
#[derive(Debug, Clone)]
pub struct ParsedRelease {
    /// Cleaned title (tokens before the first structural marker).
    pub title: String,
    /// Release year, if present.
    pub year: Option<u16>,
    /// Season number, if present.
    pub season: Option<u16>,
    /// Episode number, if present (first when several).
    pub episode: Option<u16>,
    /// Release group name, if present.
    pub release_group: Option<String>,
    /// Normalized keyword tokens, including the lowercased release group.
    pub keywords: HashSet<String>,
    /// Movie or TV, based on episode markers.
    pub media_type: MediaType,
}

fn season_episode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^s(\d{1,2})[._\- ]*e(\d{1,3})").expect("valid regex"))
}

fn alt_episode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})x(\d{2,3})$").expect("valid regex"))
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(19|20)\d{2}$").expect("valid regex"))
}

fn bracket_group_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\]\[]+)\]").expect("valid regex"))
}

/// Extensions stripped before parsing when the caller passes a full
/// filename instead of a stem.
const STRIPPABLE_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv", "srt", "ass", "ssa", "sub",
    "vtt", "idx",
];

/// Parse a release name into structured metadata.
///
/// # Examples
///
/// ```
/// use subscout_release::{parse, MediaType};
///
/// let release = parse("Breaking.Bad.S01E02.720p.HDTV.x264-CTU");
/// assert_eq!(release.title, "Breaking Bad");
/// assert_eq!(release.season, Some(1));
/// assert_eq!(release.episode, Some(2));
/// assert_eq!(release.media_type, MediaType::Tv);
/// ```
pub fn parse(input: &str) -> ParsedRelease {
    let mut rest = input.trim();

    // Strip a trailing media extension if the caller passed a filename.
    if let Some((stem, ext)) = rest.rsplit_once('.') {
        if STRIPPABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            rest = stem;
        }
    }

    let mut release_group: Option<String> = None;

    // Anime-style leading group: "[SubGroup] Title - 01 [1080p]"
    let degrouped: String;
    if let Some(caps) = bracket_group_re().captures(rest) {
        release_group = Some(caps[1].to_string());
        degrouped = rest[caps[0].len()..].trim().to_string();
        rest = &degrouped;
    }

    let raw_tokens: Vec<&str> = rest
        .split(|c: char| matches!(c, '.' | '_' | ' ' | '[' | ']' | '(' | ')' | ','))
        .filter(|t| !t.is_empty())
        .collect();

    let mut title_end: Option<usize> = None;
    let mut year: Option<u16> = None;
    let mut season: Option<u16> = None;
    let mut episode: Option<u16> = None;
    let mut keyword_set: HashSet<String> = HashSet::new();

    let last_index = raw_tokens.len().saturating_sub(1);
    for (i, token) in raw_tokens.iter().enumerate() {
        let mark = |title_end: &mut Option<usize>| {
            if title_end.is_none() {
                *title_end = Some(i);
            }
        };

        if let Some(caps) = season_episode_re().captures(token) {
            if season.is_none() {
                season = caps[1].parse().ok();
                episode = caps[2].parse().ok();
            }
            mark(&mut title_end);
            continue;
        }
        if let Some(caps) = alt_episode_re().captures(token) {
            if episode.is_none() {
                season = caps[1].parse().ok();
                episode = caps[2].parse().ok();
            }
            mark(&mut title_end);
            continue;
        }
        if year_re().is_match(token) {
            // Rightmost year wins: titles may themselves contain a year.
            year = token.parse().ok();
            mark(&mut title_end);
            continue;
        }
        if let Some(keyword) = keywords::normalize(token) {
            keyword_set.insert(keyword.to_string());
            mark(&mut title_end);
            continue;
        }
        // Trailing "codec-GROUP" compound.
        if i == last_index && release_group.is_none() {
            if let Some((left, right)) = token.rsplit_once('-') {
                if is_group_like(right) {
                    if let Some(keyword) = keywords::normalize(left) {
                        keyword_set.insert(keyword.to_string());
                    }
                    release_group = Some(right.to_string());
                    mark(&mut title_end);
                    continue;
                }
            }
        }
    }

    if let Some(ref group) = release_group {
        keyword_set.insert(group.to_lowercase());
    }

    let title_tokens = match title_end {
        Some(end) => &raw_tokens[..end],
        None => &raw_tokens[..],
    };
    let title = title_tokens
        .iter()
        .copied()
        .filter(|t| *t != "-")
        .collect::<Vec<_>>()
        .join(" ");

    let media_type = if season.is_some() || episode.is_some() {
        MediaType::Tv
    } else {
        MediaType::Movie
    };

    ParsedRelease {
        title,
        year,
        season,
        episode,
        release_group,
        keywords: keyword_set,
        media_type,
    }
}

/// A plausible release group: short, alphanumeric, not a keyword or year.
fn is_group_like(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= 20
        && token.chars().all(|c| c.is_ascii_alphanumeric())
        && keywords::normalize(token).is_none()
        && !year_re().is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie() {
        let release = parse("The.Matrix.1999.1080p.BluRay.x264-GROUP");
        assert_eq!(release.title, "The Matrix");
        assert_eq!(release.year, Some(1999));
        assert_eq!(release.media_type, MediaType::Movie);
        assert_eq!(release.release_group.as_deref(), Some("GROUP"));
        assert!(release.keywords.contains("1080p"));
        assert!(release.keywords.contains("bluray"));
        assert!(release.keywords.contains("h264"));
        assert!(release.keywords.contains("group"));
    }

    #[test]
    fn test_parse_episode() {
        let release = parse("Breaking.Bad.S01E02.720p.HDTV.x264-CTU");
        assert_eq!(release.title, "Breaking Bad");
        assert_eq!(release.season, Some(1));
        assert_eq!(release.episode, Some(2));
        assert_eq!(release.year, None);
        assert_eq!(release.media_type, MediaType::Tv);
        assert!(release.keywords.contains("720p"));
        assert!(release.keywords.contains("hdtv"));
    }

    #[test]
    fn test_parse_alternate_episode_numbering() {
        let release = parse("Show Name 3x07 HDTV XviD");
        assert_eq!(release.title, "Show Name");
        assert_eq!(release.season, Some(3));
        assert_eq!(release.episode, Some(7));
        assert!(release.keywords.contains("xvid"));
    }

    #[test]
    fn test_parse_anime_bracket_group() {
        let release = parse("[SubGroup] Anime Title - S02E05 [1080p]");
        assert_eq!(release.release_group.as_deref(), Some("SubGroup"));
        assert_eq!(release.title, "Anime Title");
        assert_eq!(release.season, Some(2));
        assert_eq!(release.episode, Some(5));
        assert!(release.keywords.contains("1080p"));
    }

    #[test]
    fn test_parse_year_in_title() {
        // Rightmost year is the release year
        let release = parse("2001.A.Space.Odyssey.1968.720p.BluRay.x264");
        assert_eq!(release.year, Some(1968));
    }

    #[test]
    fn test_parse_strips_extension() {
        let release = parse("Movie.2020.1080p.WEB-DL.mkv");
        assert_eq!(release.title, "Movie");
        assert_eq!(release.year, Some(2020));
        assert!(release.keywords.contains("web"));
    }

    #[test]
    fn test_parse_bare_title() {
        let release = parse("Some Random Documentary");
        assert_eq!(release.title, "Some Random Documentary");
        assert_eq!(release.year, None);
        assert_eq!(release.media_type, MediaType::Movie);
        assert!(release.keywords.is_empty());
    }

    #[test]
    fn test_compound_web_dl_is_not_a_group() {
        let release = parse("Movie.2020.WEB-DL");
        assert!(release.keywords.contains("web"));
        assert_eq!(release.release_group, None);
    }

    #[test]
    fn test_title_boundary_at_first_marker() {
        let release = parse("Show.S01E01.Pilot.720p");
        assert_eq!(release.title, "Show");
    }
}
