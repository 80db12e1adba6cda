//! Voice boundary: language routing for the external speech providers and
//! the per-session rate limiter guarding them. The providers themselves
//! are external; the core only decides which one handles a request and
//! whether the session is still within its quota.

pub mod rate_limiter;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "or")]
    Odia,
}

impl Language {
    /// Parse a language tag, accepting common aliases. Unknown tags fall
    /// back to English.
    pub fn parse(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "hi" | "hindi" => Self::Hindi,
            "or" | "od" | "odia" => Self::Odia,
            _ => Self::English,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
            Self::Odia => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AsrProvider {
    Transcribe,
    Whisper,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Polly,
    Openai,
}

/// The two audio operations subject to rate limiting.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudioKind {
    Asr,
    Tts,
}

impl AudioKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asr => "asr",
            Self::Tts => "tts",
        }
    }
}

/// English and Hindi route to Transcribe; Odia needs Whisper.
pub const fn asr_provider(language: Language) -> AsrProvider {
    match language {
        Language::English | Language::Hindi => AsrProvider::Transcribe,
        Language::Odia => AsrProvider::Whisper,
    }
}

/// English and Hindi route to Polly; Odia needs the OpenAI voice.
pub const fn tts_provider(language: Language) -> TtsProvider {
    match language {
        Language::English | Language::Hindi => TtsProvider::Polly,
        Language::Odia => TtsProvider::Openai,
    }
}

/// Locale code handed to the transcription provider.
pub const fn transcribe_language_code(language: Language) -> Option<&'static str> {
    match language {
        Language::English => Some("en-IN"),
        Language::Hindi => Some("hi-IN"),
        Language::Odia => None,
    }
}

/// Voice id for the speech-synthesis provider.
pub const fn polly_voice_id(language: Language) -> Option<&'static str> {
    match language {
        Language::English | Language::Hindi => Some("Aditi"),
        Language::Odia => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_aliases_parse() {
        assert_eq!(Language::parse("en"), Language::English);
        assert_eq!(Language::parse("English"), Language::English);
        assert_eq!(Language::parse("HINDI"), Language::Hindi);
        assert_eq!(Language::parse("od"), Language::Odia);
        assert_eq!(Language::parse("odia"), Language::Odia);
        // Unknown tags default to English.
        assert_eq!(Language::parse("fr"), Language::English);
    }

    #[test]
    fn odia_routes_to_whisper_and_openai() {
        assert_eq!(asr_provider(Language::Odia), AsrProvider::Whisper);
        assert_eq!(tts_provider(Language::Odia), TtsProvider::Openai);
        assert!(transcribe_language_code(Language::Odia).is_none());
    }

    #[test]
    fn english_and_hindi_use_aws_providers() {
        for language in [Language::English, Language::Hindi] {
            assert_eq!(asr_provider(language), AsrProvider::Transcribe);
            assert_eq!(tts_provider(language), TtsProvider::Polly);
            assert_eq!(polly_voice_id(language), Some("Aditi"));
        }
    }
}
