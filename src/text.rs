//! Localized message text with platform length validation.

use crate::error::TextError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Maximum length of a single outbound SMS message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 160;

/// A message text with one translation per ISO-639-3 language code.
///
/// One language is the flow's "editing" language and is emitted inline in
/// node payloads; the remaining languages are emitted through the flow's
/// localization map. Every translation is length-checked at construction,
/// including when deserialized from configuration JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct LocalizedText {
    translations: BTreeMap<String, String>,
}

impl LocalizedText {
    /// Builds a text bundle, rejecting any translation over
    /// [`MAX_MESSAGE_LENGTH`] characters.
    pub fn new(translations: BTreeMap<String, String>) -> Result<Self, TextError> {
        for (language, text) in &translations {
            let length = text.chars().count();
            if length > MAX_MESSAGE_LENGTH {
                return Err(TextError::TooLong {
                    language: language.clone(),
                    length,
                });
            }
        }
        Ok(Self { translations })
    }

    /// Convenience constructor for a single-language text.
    pub fn single(language: impl Into<String>, text: impl Into<String>) -> Result<Self, TextError> {
        Self::new(BTreeMap::from([(language.into(), text.into())]))
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    /// Returns the translation for `language`, or a `MissingTranslation`
    /// error if the bundle does not cover it.
    pub fn require(&self, language: &str) -> Result<&str, TextError> {
        self.get(language)
            .ok_or_else(|| TextError::MissingTranslation(language.to_string()))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }
}

impl TryFrom<BTreeMap<String, String>> for LocalizedText {
    type Error = TextError;

    fn try_from(translations: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::new(translations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_at_length_limit_is_accepted() {
        let text = LocalizedText::single("eng", "x".repeat(160)).unwrap();
        assert_eq!(text.get("eng").unwrap().len(), 160);
    }

    #[test]
    fn test_text_over_length_limit_is_rejected() {
        let err = LocalizedText::single("eng", "x".repeat(161)).unwrap_err();
        assert_eq!(
            err,
            TextError::TooLong {
                language: "eng".to_string(),
                length: 161,
            }
        );
    }

    #[test]
    fn test_length_is_counted_in_characters_not_bytes() {
        // 160 two-byte characters must pass.
        let text = LocalizedText::single("som", "é".repeat(160));
        assert!(text.is_ok());
    }

    #[test]
    fn test_require_missing_language() {
        let text = LocalizedText::single("eng", "Hello").unwrap();
        assert_eq!(
            text.require("som").unwrap_err(),
            TextError::MissingTranslation("som".to_string())
        );
    }

    #[test]
    fn test_deserialization_applies_length_check() {
        let long = "x".repeat(161);
        let json = format!("{{\"eng\": \"{long}\"}}");
        let result: Result<LocalizedText, _> = serde_json::from_str(&json);
        assert!(result.is_err());
    }
}
