//! Display Languages
//!
//! The wizard speaks a small fixed set of languages. Every label in the
//! catalog and the prompt table is resolved against one of these.

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Supported display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    Ar,
    En,
}

impl Language {
    /// All languages, in table order
    pub const ALL: [Language; 3] = [Language::Fr, Language::Ar, Language::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    /// Text direction for this language
    pub fn direction(&self) -> Direction {
        match self {
            Self::Ar => Direction::Rtl,
            Self::Fr | Self::En => Direction::Ltr,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.direction() == Direction::Rtl
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::Fr
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "ar" => Ok(Self::Ar),
            "en" => Ok(Self::En),
            other => Err(LabelError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Writing direction flag handed to the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// A text value carried once per supported language.
///
/// Deserializes from a map keyed by language tag; completeness is checked by
/// [`Localized::validate`] rather than at parse time so that load errors can
/// name the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

impl Localized {
    /// Build a fully populated value
    pub fn new(fr: impl Into<String>, ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            fr: Some(fr.into()),
            ar: Some(ar.into()),
            en: Some(en.into()),
        }
    }

    fn slot(&self, language: Language) -> Option<&str> {
        match language {
            Language::Fr => self.fr.as_deref(),
            Language::Ar => self.ar.as_deref(),
            Language::En => self.en.as_deref(),
        }
    }

    /// Resolve the text for a language.
    ///
    /// Falls back to French, the catalog's source language, for values that
    /// slipped past validation.
    pub fn get(&self, language: Language) -> &str {
        self.slot(language)
            .or_else(|| self.slot(Language::Fr))
            .unwrap_or_default()
    }

    /// Languages with no (or blank) text
    pub fn missing(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|lang| self.slot(*lang).map(|s| s.trim().is_empty()).unwrap_or(true))
            .collect()
    }

    /// Fail if any language is missing, naming `field` in the error
    pub fn validate(&self, field: &str) -> Result<(), LabelError> {
        match self.missing().first() {
            None => Ok(()),
            Some(language) => Err(LabelError::MissingTranslation {
                key: field.to_string(),
                language: *language,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("ar".parse::<Language>().unwrap(), Language::Ar);
        assert_eq!(" FR ".parse::<Language>().unwrap(), Language::Fr);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_direction() {
        assert_eq!(Language::Ar.direction(), Direction::Rtl);
        assert_eq!(Language::Fr.direction(), Direction::Ltr);
        assert_eq!(Language::En.direction().as_str(), "ltr");
    }

    #[test]
    fn test_localized_missing() {
        let partial = Localized {
            fr: Some("Triple".into()),
            ar: Some("  ".into()),
            en: None,
        };
        assert_eq!(partial.missing(), vec![Language::Ar, Language::En]);
        assert_eq!(partial.get(Language::En), "Triple");
        assert!(partial.validate("room.triple").is_err());
        assert!(Localized::new("a", "b", "c").validate("x").is_ok());
    }
}
