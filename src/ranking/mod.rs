//! Multi-criteria subtitle ranking.
//!
//! Candidates are ordered by a configurable list of criteria. Each
//! criterion maps a subtitle to an integer component; candidates are
//! sorted descending on the resulting component tuples, so earlier
//! criteria dominate later ones and the sort stays stable for ties.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use subscout_common::LanguageCode;
use subscout_release::MediaType;

use crate::subtitle::Subtitle;
use crate::video::{Video, VideoKind};

/// One ranking criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankCriterion {
    /// Position of the subtitle's language in the configured language
    /// preferences (earlier is better; unlisted ranks last).
    LanguageRank,
    /// Position of the subtitle's provider in the configured provider
    /// preferences (earlier is better; unlisted ranks last).
    ProviderRank,
    /// The provider-reported confidence.
    ProviderConfidence,
    /// How well the subtitle's release name matches the video's.
    ContentMatchConfidence,
}

/// Default criteria order when the configuration names none.
pub const DEFAULT_SORT_ORDER: &[RankCriterion] = &[
    RankCriterion::LanguageRank,
    RankCriterion::ProviderRank,
    RankCriterion::ProviderConfidence,
];

/// Build the criteria list actually used for a download pass.
///
/// In multi-language mode language must dominate so candidates group
/// into per-language runs; a fresh list is returned every time and the
/// configured order is never modified.
pub fn effective_order(configured: &[RankCriterion], multi: bool) -> Vec<RankCriterion> {
    let mut order = configured.to_vec();
    if multi && order.first() != Some(&RankCriterion::LanguageRank) {
        order.insert(0, RankCriterion::LanguageRank);
    }
    order
}

/// Ranks subtitle candidates against the engine's preferences.
pub struct RankingEngine<'a> {
    languages: &'a [LanguageCode],
    providers: &'a [String],
}

impl<'a> RankingEngine<'a> {
    pub fn new(languages: &'a [LanguageCode], providers: &'a [String]) -> Self {
        Self {
            languages,
            providers,
        }
    }

    /// Sort candidates best-first by the given criteria.
    pub fn rank(
        &self,
        subtitles: Vec<Subtitle>,
        video: &Video,
        criteria: &[RankCriterion],
    ) -> Vec<Subtitle> {
        let mut keyed: Vec<(Vec<u32>, Subtitle)> = subtitles
            .into_iter()
            .map(|s| (self.sort_key(&s, video, criteria), s))
            .collect();
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        keyed.into_iter().map(|(_, s)| s).collect()
    }

    /// Component tuple for one candidate; bigger is better.
    fn sort_key(&self, subtitle: &Subtitle, video: &Video, criteria: &[RankCriterion]) -> Vec<u32> {
        criteria
            .iter()
            .map(|criterion| self.component(subtitle, video, *criterion))
            .collect()
    }

    fn component(&self, subtitle: &Subtitle, video: &Video, criterion: RankCriterion) -> u32 {
        match criterion {
            RankCriterion::LanguageRank => preference_rank(
                self.languages.iter().position(|l| *l == subtitle.language),
                self.languages.len(),
            ),
            RankCriterion::ProviderRank => preference_rank(
                self.providers.iter().position(|p| *p == subtitle.provider),
                self.providers.len(),
            ),
            RankCriterion::ProviderConfidence => {
                (subtitle.confidence.clamp(0.0, 1.0) * 1000.0).round() as u32
            }
            RankCriterion::ContentMatchConfidence => {
                (matching_confidence(video, subtitle) * 1000.0).round() as u32
            }
        }
    }
}

/// Map a preference-list position to a descending score: the first
/// entry scores `len - 1`, the last scores zero, as does anything not
/// on the list at all.
fn preference_rank(position: Option<usize>, len: usize) -> u32 {
    match position {
        Some(i) => (len - 1 - i) as u32,
        None => 0,
    }
}

/// How plausibly a subtitle fits a specific video file, in `[0.0, 1.0]`.
///
/// Both release names are parsed and compared field by field. The fields
/// are packed into a bit pattern with the keyword-overlap count in the
/// low bits, and the achieved pattern is divided by the best achievable
/// one, so a mismatch on a high field (series, title) outweighs any
/// amount of keyword agreement. Without a release hint the confidence is
/// zero.
pub fn matching_confidence(video: &Video, subtitle: &Subtitle) -> f64 {
    let Some(release) = subtitle.release.as_deref() else {
        return 0.0;
    };
    let guess = subscout_release::parse(release);

    let mut subtitle_keywords: HashSet<String> = guess.keywords.clone();
    subtitle_keywords.extend(subtitle.keywords.iter().cloned());
    let shared = video
        .keywords()
        .intersection(&subtitle_keywords)
        .count() as u64;
    let cap = video.keywords().len() as u64;
    let width = keyword_field_width(cap);

    let (achieved, best) = match video.kind() {
        VideoKind::Episode {
            series,
            season,
            episode,
        } => {
            let mut series_bit = 0u64;
            let mut season_bit = 0u64;
            let mut episode_bit = 0u64;
            if guess.media_type == MediaType::Tv {
                if guess.title.to_lowercase() == series.to_lowercase() {
                    series_bit = 1;
                }
                if guess.season == Some(*season) {
                    season_bit = 1;
                }
                if guess.episode == Some(*episode) {
                    episode_bit = 1;
                }
            }
            let achieved = ((series_bit << 2 | season_bit << 1 | episode_bit) << width) | shared;
            let best = (0b111 << width) | cap;
            (achieved, best)
        }
        VideoKind::Movie { title, year } => {
            let mut title_bit = 0u64;
            let mut year_bit = 0u64;
            if guess.media_type == MediaType::Movie
                && guess.title.to_lowercase() == title.to_lowercase()
            {
                title_bit = 1;
            }
            if year.is_some() && guess.year == *year {
                year_bit = 1;
            }
            let achieved = ((title_bit << 1 | year_bit) << width) | shared;
            let best = (0b11 << width) | cap;
            (achieved, best)
        }
    };

    achieved as f64 / best as f64
}

/// Bit width of the keyword-overlap field: enough for the video's
/// keyword count, at least three bits.
fn keyword_field_width(cap: u64) -> u32 {
    (u64::BITS - cap.leading_zeros()).max(3)
}
