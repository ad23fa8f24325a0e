//! Filesystem scanning and existing-subtitle detection.
//!
//! Turns the paths a user hands the engine into concrete videos, notes
//! which subtitle languages already sit next to each one, and decides
//! which languages still need searching.

use std::collections::HashSet;
use std::path::Path;

use subscout_common::{paths, LanguageCode};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::video::Video;

/// One video found by a scan, with its on-disk subtitle situation.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub video: Video,
    /// Languages with a `stem.<lang>.<ext>` sibling subtitle.
    pub existing_languages: HashSet<LanguageCode>,
    /// Whether a bare `stem.<ext>` sibling subtitle exists.
    pub has_unlabeled: bool,
}

/// Resolve a path into scan entries.
///
/// A file path is trusted as a video regardless of extension, so users
/// can point at unusual containers directly. A directory is walked
/// (following symlinks) and only files with a known video extension are
/// kept; `max_depth` of zero means unlimited. A path that does not exist
/// still yields an entry, so searches can run ahead of a download that
/// is still in flight.
pub fn scan(entry: &Path, max_depth: usize) -> Vec<ScanEntry> {
    if !entry.exists() {
        debug!(path = %entry.display(), "scan target does not exist yet, taking it on faith");
        return vec![ScanEntry {
            video: Video::from_path(entry),
            existing_languages: HashSet::new(),
            has_unlabeled: false,
        }];
    }

    if entry.is_file() {
        return vec![inspect(entry)];
    }

    let mut walker = WalkDir::new(entry).follow_links(true);
    if max_depth > 0 {
        walker = walker.max_depth(max_depth);
    }

    let mut entries = Vec::new();
    for item in walker {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !item.file_type().is_file() {
            continue;
        }
        if !paths::is_video_file(item.path()) {
            continue;
        }
        entries.push(inspect(item.path()));
    }
    debug!(path = %entry.display(), videos = entries.len(), "scan finished");
    entries
}

fn inspect(path: &Path) -> ScanEntry {
    let video = Video::from_path(path);
    let (existing_languages, has_unlabeled) = existing_subtitles(video.path());
    ScanEntry {
        video,
        existing_languages,
        has_unlabeled,
    }
}

/// Detect sibling subtitle files for a video.
///
/// One directory read; `stem.<lang>.<ext>` counts toward the language
/// set when `<lang>` is a valid code, a bare `stem.<ext>` sets the
/// unlabeled flag, and anything else with the same stem prefix is
/// ignored.
pub fn existing_subtitles(video: &Path) -> (HashSet<LanguageCode>, bool) {
    let mut languages = HashSet::new();
    let mut unlabeled = false;

    let (Some(stem), Some(parent)) = (
        video.file_stem().and_then(|s| s.to_str()),
        video.parent(),
    ) else {
        return (languages, unlabeled);
    };

    let Ok(read) = std::fs::read_dir(parent) else {
        return (languages, unlabeled);
    };
    for item in read.flatten() {
        let name = item.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !paths::is_subtitle_file(Path::new(name)) {
            continue;
        }
        let Some(rest) = name.strip_prefix(stem).and_then(|r| r.strip_prefix('.')) else {
            continue;
        };
        let parts: Vec<&str> = rest.split('.').collect();
        match parts.as_slice() {
            [_ext] => unlabeled = true,
            [lang, _ext] => {
                if let Ok(lang) = lang.parse::<LanguageCode>() {
                    languages.insert(lang);
                }
            }
            _ => {}
        }
    }

    (languages, unlabeled)
}

/// Decide which of the wanted languages still need a search.
///
/// `force` searches everything again. In multi mode, languages already
/// covered on disk are dropped (order otherwise preserved). In single
/// mode a bare `stem.<ext>` subtitle satisfies the request; labeled
/// siblings belong to multi-mode bookkeeping and do not.
pub fn needs_search(
    existing: &HashSet<LanguageCode>,
    has_unlabeled: bool,
    wanted: &[LanguageCode],
    multi: bool,
    force: bool,
) -> Vec<LanguageCode> {
    if force {
        return wanted.to_vec();
    }
    if multi {
        return wanted
            .iter()
            .filter(|lang| !existing.contains(lang))
            .cloned()
            .collect();
    }
    if has_unlabeled {
        Vec::new()
    } else {
        wanted.to_vec()
    }
}
