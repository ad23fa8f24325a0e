//! Validated ISO-639-1 language codes.
//!
//! Subtitle languages are identified by two-letter ISO-639-1 codes
//! everywhere in subscout: in configuration, in provider queries, and in
//! the `video.<lang>.srt` sibling-file naming convention. [`LanguageCode`]
//! rejects anything outside the ISO set at construction time so the rest
//! of the engine never has to re-validate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// The complete ISO-639-1 two-letter code set, in sorted order.
const ISO_639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg", "bh",
    "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv", "cy", "da",
    "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi", "fj", "fo", "fr",
    "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr", "ht", "hu", "hy", "hz",
    "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja", "jv", "ka", "kg", "ki", "kj",
    "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw", "ky", "la", "lb", "lg", "li", "ln",
    "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml", "mn", "mo", "mr", "ms", "mt", "my", "na",
    "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv", "ny", "oc", "oj", "om", "or", "os", "pa",
    "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro", "ru", "rw", "sa", "sc", "sd", "se", "sg", "si",
    "sk", "sl", "sm", "sn", "so", "sq", "sr", "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th",
    "ti", "tk", "tl", "tn", "to", "tr", "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi",
    "vo", "wa", "wo", "xh", "yi", "yo", "za", "zh", "zu",
];

/// Check whether a string is a valid ISO-639-1 code.
pub fn is_valid_code(code: &str) -> bool {
    ISO_639_1.binary_search(&code).is_ok()
}

/// Return every ISO-639-1 code as a [`LanguageCode`], in sorted order.
pub fn all_codes() -> Vec<LanguageCode> {
    ISO_639_1
        .iter()
        .map(|c| LanguageCode((*c).to_string()))
        .collect()
}

/// A validated two-letter ISO-639-1 language code.
///
/// Construct via [`FromStr`]; construction fails with
/// [`Error::InvalidLanguage`] for unknown codes.
///
/// # Examples
///
/// ```
/// use subscout_common::LanguageCode;
///
/// let en: LanguageCode = "en".parse().unwrap();
/// assert_eq!(en.as_str(), "en");
/// assert!("klingon".parse::<LanguageCode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if is_valid_code(&lower) {
            Ok(Self(lower))
        } else {
            Err(Error::invalid_language(s))
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        // binary_search depends on sorted order
        let mut sorted = ISO_639_1.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ISO_639_1);
    }

    #[test]
    fn test_valid_codes() {
        assert!(is_valid_code("en"));
        assert!(is_valid_code("fr"));
        assert!(is_valid_code("zu"));
        assert!(is_valid_code("aa"));
    }

    #[test]
    fn test_invalid_codes() {
        assert!(!is_valid_code("xx"));
        assert!(!is_valid_code("eng"));
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("EN"));
    }

    #[test]
    fn test_parse_normalizes_case() {
        let lang: LanguageCode = "EN".parse().unwrap();
        assert_eq!(lang.as_str(), "en");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "klingon".parse::<LanguageCode>().unwrap_err();
        assert!(matches!(err, Error::InvalidLanguage(_)));
    }

    #[test]
    fn test_all_codes_count() {
        assert_eq!(all_codes().len(), ISO_639_1.len());
        assert!(all_codes().contains(&"en".parse().unwrap()));
    }

    #[test]
    fn test_serde_round_trip() {
        let lang: LanguageCode = "fr".parse().unwrap();
        let json = serde_json::to_string(&lang).unwrap();
        assert_eq!(json, r#""fr""#);

        let back: LanguageCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lang);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let result: Result<LanguageCode, _> = serde_json::from_str(r#""nope""#);
        assert!(result.is_err());
    }
}
