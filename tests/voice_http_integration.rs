//! Voice endpoints: transcription and spoken chat.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use krishi_mitra::adapters::ai::MockAIProvider;
use krishi_mitra::adapters::speech::MockSpeech;

use common::{authed, router, send};

#[tokio::test]
async fn transcribe_returns_text_and_language() {
    let app = router(
        MockAIProvider::new(),
        MockSpeech::new().with_transcript("प्याज का भाव क्या है"),
    );

    let (status, body) = send(
        &app,
        authed(
            "POST",
            "/api/voice/transcribe",
            Some(json!({ "audio_base64": "aGVsbG8=", "language": "hi" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "प्याज का भाव क्या है");
    assert_eq!(body["language"], "hi");
}

#[tokio::test]
async fn silence_is_400() {
    let app = router(MockAIProvider::new(), MockSpeech::new());

    let (status, body) = send(
        &app,
        authed("POST", "/api/voice/transcribe", Some(json!({ "audio_base64": "aGVsbG8=" }))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_SPEECH");
}

#[tokio::test]
async fn non_audio_mime_type_is_400() {
    let app = router(MockAIProvider::new(), MockSpeech::new().with_transcript("hello"));

    let (status, _) = send(
        &app,
        authed(
            "POST",
            "/api/voice/transcribe",
            Some(json!({ "audio_base64": "aGVsbG8=", "mime_type": "text/plain" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn voice_chat_routes_transcript_through_chatbot() {
    let ai = MockAIProvider::new().with_json_response(json!({
        "response": "Opening the weather page.",
        "intent": "navigate_weather"
    }));
    let app = router(ai, MockSpeech::new().with_transcript("show me the weather"));

    let (status, body) = send(
        &app,
        authed(
            "POST",
            "/api/voice/chat",
            Some(json!({ "audio_base64": "aGVsbG8=", "language": "en" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "show me the weather");
    assert_eq!(body["fallback"], false);
    assert_eq!(body["data"]["intent"], "navigate_weather");
}
