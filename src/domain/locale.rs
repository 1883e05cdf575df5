//! Supported interface languages.
//!
//! Every localized string in the service is selected by an exhaustive
//! `match` over [`Locale`], so adding a language is a compile error until
//! each fallback has been translated.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Interface language selected by the farmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Hi,
    Kn,
    Bn,
    Bho,
}

impl Locale {
    /// Returns all locales.
    pub fn all() -> &'static [Locale] {
        &[Locale::En, Locale::Hi, Locale::Kn, Locale::Bn, Locale::Bho]
    }

    /// Parses a wire code by exact match. Anything else, including `"HI"`
    /// or `" hi"`, yields English.
    pub fn from_code(code: &str) -> Self {
        match code {
            "hi" => Locale::Hi,
            "kn" => Locale::Kn,
            "bn" => Locale::Bn,
            "bho" => Locale::Bho,
            _ => Locale::En,
        }
    }

    /// Wire code (`en`, `hi`, `kn`, `bn`, `bho`).
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
            Locale::Kn => "kn",
            Locale::Bn => "bn",
            Locale::Bho => "bho",
        }
    }

    /// BCP-47 tag handed to speech recognition.
    ///
    /// Bhojpuri has no recognizer model of its own; Hindi is the closest.
    pub fn speech_tag(&self) -> &'static str {
        match self {
            Locale::En => "en-IN",
            Locale::Hi => "hi-IN",
            Locale::Kn => "kn-IN",
            Locale::Bn => "bn-IN",
            Locale::Bho => "hi-IN",
        }
    }

    /// English name of the language, as used inside prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Hi => "Hindi",
            Locale::Kn => "Kannada",
            Locale::Bn => "Bengali",
            Locale::Bho => "Bhojpuri",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Locale::from_code(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_code_parses_known_codes() {
        assert_eq!(Locale::from_code("en"), Locale::En);
        assert_eq!(Locale::from_code("hi"), Locale::Hi);
        assert_eq!(Locale::from_code("kn"), Locale::Kn);
        assert_eq!(Locale::from_code("bn"), Locale::Bn);
        assert_eq!(Locale::from_code("bho"), Locale::Bho);
    }

    #[test]
    fn from_code_matches_exactly() {
        assert_eq!(Locale::from_code(" HI "), Locale::En);
        assert_eq!(Locale::from_code("Kn"), Locale::En);
        assert_eq!(Locale::from_code("bho "), Locale::En);
    }

    #[test]
    fn code_round_trips_for_every_locale() {
        for locale in Locale::all() {
            assert_eq!(Locale::from_code(locale.code()), *locale);
        }
    }

    #[test]
    fn bhojpuri_uses_hindi_speech_tag() {
        assert_eq!(Locale::Bho.speech_tag(), "hi-IN");
        assert_eq!(Locale::Kn.speech_tag(), "kn-IN");
    }

    #[test]
    fn deserializes_unknown_code_as_english() {
        let locale: Locale = serde_json::from_str("\"fr\"").unwrap();
        assert_eq!(locale, Locale::En);
    }

    #[test]
    fn serializes_as_wire_code() {
        assert_eq!(serde_json::to_string(&Locale::Bho).unwrap(), "\"bho\"");
    }

    proptest! {
        #[test]
        fn unknown_codes_fall_back_to_english(code in "[a-z]{0,6}") {
            prop_assume!(!["en", "hi", "kn", "bn", "bho"].contains(&code.as_str()));
            prop_assert_eq!(Locale::from_code(&code), Locale::En);
        }
    }
}
