//! Voice assistant entry point

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use voice_assistant_config::Settings;
use voice_assistant_core::RecognitionEngine;
use voice_assistant_llm::{EchoBackend, HttpLlmClient, LlmBackend};
use voice_assistant_pipeline::{AgentConfig, TurnPipeline, VoiceAgent};

mod engines;

use engines::{ConsoleRecognizer, NullSink, SilenceSynthesizer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("VOICE_ASSISTANT_CONFIG").ok();
    let settings = Settings::load(config_path.as_deref())?;

    init_tracing(&settings);
    tracing::info!("Starting voice assistant v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = Arc::new(TurnPipeline::spawn(
        SilenceSynthesizer::new(settings.audio.sample_rate),
        NullSink,
        settings.chunker.max_chunk_size,
    ));

    let agent_config = AgentConfig {
        listen_timeout: Duration::from_secs(settings.listen.utterance_timeout_secs),
        settle: Duration::from_millis(settings.listen.settle_ms),
        greetings: settings.listen.greetings.clone(),
    };
    let recognizer = ConsoleRecognizer::spawn();

    match &settings.llm.server_url {
        Some(url) => {
            let llm = HttpLlmClient::new(
                url.as_str(),
                settings.llm.model.as_str(),
                Duration::from_secs(settings.llm.request_timeout_secs),
            )?;
            tracing::info!(endpoint = %url, "Using generation server");
            run_until_shutdown(VoiceAgent::new(
                recognizer,
                llm,
                pipeline.clone(),
                agent_config,
            ))
            .await;
        }
        None => {
            tracing::warn!("No generation server configured, echoing utterances");
            run_until_shutdown(VoiceAgent::new(
                recognizer,
                EchoBackend::default(),
                pipeline.clone(),
                agent_config,
            ))
            .await;
        }
    }

    pipeline.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Drive the agent loop until Ctrl+C.
async fn run_until_shutdown<R, L>(agent: VoiceAgent<R, L>)
where
    R: RecognitionEngine + 'static,
    L: LlmBackend,
{
    tokio::select! {
        _ = agent.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
            tracing::info!("Received Ctrl+C, shutting down");
        }
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.observability.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
