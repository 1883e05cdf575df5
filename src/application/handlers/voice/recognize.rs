//! One-shot speech recognition with cancellation.

use tokio::sync::watch;

use crate::domain::locale::Locale;
use crate::domain::speech::{AudioClip, Transcript};
use crate::ports::{SpeechError, SpeechRecognizer};

use super::VoiceError;

/// Recognizes `clip` once.
///
/// Resolves to [`VoiceError::Cancelled`] if `cancel` turns `true` before
/// the recognizer answers; a signal that is already set wins immediately.
/// Dropping the sender never cancels.
pub async fn recognize_once(
    recognizer: &dyn SpeechRecognizer,
    clip: &AudioClip,
    locale: Locale,
    cancel: watch::Receiver<bool>,
) -> Result<Transcript, VoiceError> {
    tokio::select! {
        biased;

        _ = cancelled(cancel) => Err(VoiceError::Cancelled),
        result = recognizer.recognize(clip, locale) => {
            let transcript = result?;
            if transcript.text.trim().is_empty() {
                return Err(SpeechError::NoSpeech.into());
            }
            Ok(transcript)
        }
    }
}

async fn cancelled(mut cancel: watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
