//! Speech payloads: WAV packaging for synthesized audio and audio clips
//! submitted for recognition.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::locale::Locale;

/// Synthesizer output format: mono 16-bit little-endian PCM at 24 kHz.
pub const SAMPLE_RATE_HZ: u32 = 24_000;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

/// Request body for text-to-speech.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechInput {
    pub text: String,
}

/// Text-to-speech output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechAudio {
    /// `data:audio/wav;base64,...`
    pub media: String,
}

impl SpeechAudio {
    pub fn from_pcm(pcm: &[u8]) -> Self {
        Self {
            media: format!("data:audio/wav;base64,{}", STANDARD.encode(encode_wav(pcm))),
        }
    }
}

/// Wraps raw PCM samples in a RIFF/WAVE container.
pub fn encode_wav(pcm: &[u8]) -> Vec<u8> {
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = SAMPLE_RATE_HZ * u32::from(block_align);
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&SAMPLE_RATE_HZ.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

/// Recorded audio submitted for recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioClip {
    pub fn from_base64(data: &str, mime_type: &str) -> Result<Self, ValidationError> {
        let mime_type = mime_type.trim();
        if !mime_type.starts_with("audio/") {
            return Err(ValidationError::invalid_format("mime_type", "expected an audio MIME type"));
        }
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|_| ValidationError::invalid_format("audio_base64", "invalid base64 data"))?;
        if bytes.is_empty() {
            return Err(ValidationError::empty_field("audio_base64"));
        }
        Ok(Self {
            bytes,
            mime_type: mime_type.to_string(),
        })
    }

    /// File extension the transcription endpoint expects for this clip.
    pub fn file_extension(&self) -> &'static str {
        let subtype = self
            .mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim_start_matches("audio/");
        match subtype {
            "wav" | "x-wav" | "wave" => "wav",
            "mpeg" | "mp3" => "mp3",
            "mp4" | "m4a" | "x-m4a" => "m4a",
            "ogg" => "ogg",
            "flac" => "flac",
            _ => "webm",
        }
    }
}

/// One final recognition result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub text: String,
    pub locale: Locale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_describes_mono_16_bit_24khz() {
        let pcm = vec![0u8, 1, 2, 3];
        let wav = encode_wav(&pcm);

        assert_eq!(wav.len(), 48);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 40);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 24_000);
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 48_000);
        assert_eq!(u16::from_le_bytes(wav[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(wav[34..36].try_into().unwrap()), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes(wav[40..44].try_into().unwrap()), 4);
        assert_eq!(&wav[44..], &pcm[..]);
    }

    #[test]
    fn speech_audio_is_wav_data_uri() {
        let audio = SpeechAudio::from_pcm(&[0, 0]);
        assert!(audio.media.starts_with("data:audio/wav;base64,UklGR"));
    }

    #[test]
    fn audio_clip_decodes_base64() {
        let clip = AudioClip::from_base64("aGVsbG8=", "audio/webm;codecs=opus").unwrap();
        assert_eq!(clip.bytes, b"hello");
        assert_eq!(clip.file_extension(), "webm");
    }

    #[test]
    fn audio_clip_rejects_non_audio() {
        assert!(AudioClip::from_base64("aGVsbG8=", "image/png").is_err());
        assert!(AudioClip::from_base64("!!", "audio/wav").is_err());
        assert!(AudioClip::from_base64("", "audio/wav").is_err());
    }
}
