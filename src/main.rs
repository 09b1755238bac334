use std::sync::Arc;

use email_classifier::api::app_routes;
use email_classifier::config::ServiceConfig;
use email_classifier::llm::create_provider;
use email_classifier::pipeline::EmailProcessor;
use email_classifier::safety::SafetyLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("  {hint}");
        }
        std::process::exit(1);
    });

    eprintln!("📬 Email Classifier v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {:?}", config.llm.backend);
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Language: {:?}", config.language);
    eprintln!("   LLM timeout: {}s", config.llm.timeout.as_secs());
    eprintln!("   API: http://{}/process-email/", config.server.bind_addr());
    eprintln!("   CORS origins: {}\n", config.server.cors_origins.join(", "));

    // Built once, shared read-only by every request
    let llm = create_provider(&config.llm)?;
    let processor = Arc::new(EmailProcessor::new(
        llm,
        Arc::new(SafetyLayer::new()),
        config.language,
    ));

    let app = app_routes(processor, &config.server);
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;
    tracing::info!(addr = %config.server.bind_addr(), "Email classifier listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Email classifier stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
