//! Language definitions for the bilingual chat surface
//!
//! The service speaks Arabic and English. The selected language drives
//! both the string table and the layout direction, so both always flip
//! together.

use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Arabic,
    English,
}

impl Language {
    /// Get ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Arabic => "ar",
            Self::English => "en",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arabic => "العربية",
            Self::English => "English",
        }
    }

    /// Layout direction for this language
    pub fn direction(&self) -> Direction {
        match self {
            Self::Arabic => Direction::RightToLeft,
            Self::English => Direction::LeftToRight,
        }
    }

    /// Check if this language lays out right-to-left
    pub fn is_rtl(&self) -> bool {
        self.direction() == Direction::RightToLeft
    }

    /// The other language (two-valued toggle)
    pub fn toggled(&self) -> Language {
        match self {
            Self::Arabic => Self::English,
            Self::English => Self::Arabic,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "ara" | "arabic" => Some(Self::Arabic),
            "en" | "eng" | "english" => Some(Self::English),
            _ => None,
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[Self::Arabic, Self::English]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Text/layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// HTML `dir` attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftToRight => "ltr",
            Self::RightToLeft => "rtl",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(Language::Arabic.code(), "ar");
        assert_eq!(Language::English.code(), "en");
    }

    #[test]
    fn test_direction_follows_language() {
        assert!(Language::Arabic.is_rtl());
        assert!(!Language::English.is_rtl());
        assert_eq!(Language::Arabic.direction().as_str(), "rtl");
    }

    #[test]
    fn test_toggle_is_involutive() {
        for lang in Language::all() {
            assert_eq!(lang.toggled().toggled(), *lang);
            assert_ne!(lang.toggled(), *lang);
        }
    }

    #[test]
    fn test_from_str_loose() {
        assert_eq!(Language::from_str_loose("AR"), Some(Language::Arabic));
        assert_eq!(Language::from_str_loose("english"), Some(Language::English));
        assert_eq!(Language::from_str_loose("fr"), None);
    }
}
