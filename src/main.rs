//! KrishiMitra API server.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use krishi_mitra::adapters::ai::{
    AnthropicConfig, AnthropicProvider, MockAIProvider, OpenAIConfig, OpenAIProvider,
};
use krishi_mitra::adapters::auth::{
    JwksConfig, JwksSessionValidator, MockSessionValidator, DEFAULT_JWKS_URL,
};
use krishi_mitra::adapters::http::{build_router, Ports, RouterSettings};
use krishi_mitra::adapters::profile::{InMemoryProfileStore, PostgresProfileStore};
use krishi_mitra::adapters::speech::{OpenAISpeech, OpenAISpeechConfig, UnconfiguredSpeech};
use krishi_mitra::adapters::validation::JsonSchemaValidator;
use krishi_mitra::config::{
    AiConfig, AiProvider, AppConfig, AuthConfig, DatabaseConfig, SpeechConfig,
};
use krishi_mitra::domain::foundation::{AuthenticatedUser, UserId};
use krishi_mitra::ports::{
    AIProvider, ProfileStore, SessionValidator, SpeechRecognizer, SpeechSynthesizer,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let speech = build_speech(&config.speech, config.ai.openai_api_key.as_deref());
    let ports = Ports {
        ai: build_ai_provider(&config.ai),
        schemas: Arc::new(JsonSchemaValidator::new()),
        sessions: build_session_validator(&config.auth)?,
        profiles: build_profile_store(config.database.as_ref()).await?,
        recognizer: speech.0,
        synthesizer: speech.1,
    };

    let settings = RouterSettings {
        request_timeout: config.server.request_timeout(),
        recognition_timeout: config.speech.recognition_timeout(),
        cors_origins: config.server.cors_origins_list(),
        profile_defaults: config.profile.defaults(),
    };
    let app = build_router(ports, settings);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "KrishiMitra API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

fn build_ai_provider(config: &AiConfig) -> Arc<dyn AIProvider> {
    match config.provider {
        AiProvider::OpenAI => {
            let mut openai = OpenAIConfig::new(config.openai_api_key.clone().unwrap_or_default())
                .with_timeout(config.timeout());
            if let Some(model) = &config.openai_model {
                openai = openai.with_model(model);
            }
            if let Some(url) = &config.openai_base_url {
                openai = openai.with_base_url(url);
            }
            tracing::info!(model = %openai.model, "Using OpenAI-compatible provider");
            Arc::new(OpenAIProvider::new(openai))
        }
        AiProvider::Anthropic => {
            let mut anthropic =
                AnthropicConfig::new(config.anthropic_api_key.clone().unwrap_or_default())
                    .with_timeout(config.timeout());
            if let Some(model) = &config.anthropic_model {
                anthropic = anthropic.with_model(model);
            }
            if let Some(url) = &config.anthropic_base_url {
                anthropic = anthropic.with_base_url(url);
            }
            tracing::info!(model = %anthropic.model, "Using Anthropic provider");
            Arc::new(AnthropicProvider::new(anthropic))
        }
        AiProvider::Mock => {
            tracing::warn!("Using mock AI provider; every flow will serve its fallback");
            Arc::new(MockAIProvider::new())
        }
    }
}

fn build_session_validator(config: &AuthConfig) -> Result<Arc<dyn SessionValidator>, BoxError> {
    if config.uses_dev_tokens() {
        let validator = MockSessionValidator::new();
        for (token, user_id) in config.dev_token_pairs()? {
            validator.add_token(token, AuthenticatedUser::new(UserId::new(&user_id)?));
        }
        tracing::warn!(tokens = validator.token_count(), "Accepting development tokens only");
        return Ok(Arc::new(validator));
    }

    let issuer = config.resolved_issuer().ok_or("auth issuer is not configured")?;
    let audience = config.resolved_audience().ok_or("auth audience is not configured")?;
    let mut jwks = JwksConfig::new(issuer, audience, DEFAULT_JWKS_URL)
        .with_cache_duration(config.jwks_cache_ttl());
    if let Some(url) = config.jwks_url.as_deref().filter(|u| !u.trim().is_empty()) {
        jwks.jwks_url = url.to_string();
    }
    Ok(Arc::new(JwksSessionValidator::new(jwks)))
}

async fn build_profile_store(
    config: Option<&DatabaseConfig>,
) -> Result<Arc<dyn ProfileStore>, BoxError> {
    let Some(config) = config else {
        tracing::warn!("No database configured; profiles are kept in memory");
        return Ok(Arc::new(InMemoryProfileStore::new()));
    };

    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(&config.url)
        .await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PostgresProfileStore::new(pool)))
}

type SpeechPorts = (Arc<dyn SpeechRecognizer>, Arc<dyn SpeechSynthesizer>);

fn build_speech(config: &SpeechConfig, openai_api_key: Option<&str>) -> SpeechPorts {
    let Some(api_key) = config.resolve_api_key(openai_api_key) else {
        tracing::warn!("No speech API key; voice input and read-aloud are disabled");
        let speech = Arc::new(UnconfiguredSpeech::new());
        let recognizer: Arc<dyn SpeechRecognizer> = speech.clone();
        return (recognizer, speech);
    };

    let mut speech_config = OpenAISpeechConfig::new(api_key)
        .with_transcription_model(&config.transcription_model)
        .with_speech_model(&config.speech_model)
        .with_voice(&config.voice)
        .with_timeout(config.timeout());
    if let Some(url) = &config.base_url {
        speech_config = speech_config.with_base_url(url);
    }
    let speech = Arc::new(OpenAISpeech::new(speech_config));
    let recognizer: Arc<dyn SpeechRecognizer> = speech.clone();
    (recognizer, speech)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
