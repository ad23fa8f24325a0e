//! Normalization tables for release-name keyword tokens.
//!
//! Keywords are the technical attributes of a release (source, codec,
//! resolution, audio) that tend to appear in both a video's filename and
//! the release name a subtitle was made for. Matching them up is how we
//! judge that a subtitle plausibly fits a specific rip. Aliases collapse
//! to one canonical form so `x264` and `h.264` count as the same keyword.

/// Alias table: `(token, canonical keyword)`. Tokens are matched after
/// lowercasing.
const ALIASES: &[(&str, &str)] = &[
    // Sources
    ("bluray", "bluray"),
    ("blu-ray", "bluray"),
    ("bdrip", "bluray"),
    ("brrip", "bluray"),
    ("webrip", "web"),
    ("web-dl", "web"),
    ("webdl", "web"),
    ("web", "web"),
    ("hdtv", "hdtv"),
    ("pdtv", "hdtv"),
    ("dvdrip", "dvd"),
    ("dvd", "dvd"),
    ("hdrip", "hdrip"),
    // Video codecs
    ("x264", "h264"),
    ("h264", "h264"),
    ("h.264", "h264"),
    ("avc", "h264"),
    ("x265", "h265"),
    ("h265", "h265"),
    ("h.265", "h265"),
    ("hevc", "h265"),
    ("xvid", "xvid"),
    ("divx", "divx"),
    // Resolutions
    ("480p", "480p"),
    ("576p", "576p"),
    ("720p", "720p"),
    ("1080p", "1080p"),
    ("1080i", "1080p"),
    ("2160p", "2160p"),
    ("4k", "2160p"),
    ("uhd", "2160p"),
    // Audio codecs
    ("aac", "aac"),
    ("ac3", "ac3"),
    ("eac3", "eac3"),
    ("dd5", "ac3"),
    ("dts", "dts"),
    ("dts-hd", "dts"),
    ("truehd", "truehd"),
    ("atmos", "atmos"),
    ("flac", "flac"),
    ("mp3", "mp3"),
    // Flags
    ("proper", "proper"),
    ("repack", "repack"),
    ("extended", "extended"),
    ("unrated", "unrated"),
    ("remux", "remux"),
    ("hdr", "hdr"),
    ("hdr10", "hdr"),
    ("10bit", "10bit"),
    ("limited", "limited"),
    ("internal", "internal"),
];

/// Normalize a token to its canonical keyword, if it is one.
pub fn normalize(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| *canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_aliases_collapse() {
        assert_eq!(normalize("x264"), Some("h264"));
        assert_eq!(normalize("H.264"), Some("h264"));
        assert_eq!(normalize("HEVC"), Some("h265"));
        assert_eq!(normalize("x265"), Some("h265"));
    }

    #[test]
    fn test_source_aliases() {
        assert_eq!(normalize("BluRay"), Some("bluray"));
        assert_eq!(normalize("BDRip"), Some("bluray"));
        assert_eq!(normalize("WEB-DL"), Some("web"));
        assert_eq!(normalize("HDTV"), Some("hdtv"));
    }

    #[test]
    fn test_resolution_aliases() {
        assert_eq!(normalize("1080i"), Some("1080p"));
        assert_eq!(normalize("4K"), Some("2160p"));
    }

    #[test]
    fn test_non_keywords() {
        assert_eq!(normalize("Matrix"), None);
        assert_eq!(normalize("1999"), None);
        assert_eq!(normalize(""), None);
    }
}
