use clap::Parser;
use talent_flow::utils::error::{ErrorSeverity, TalentError};
use talent_flow::utils::logger::{self, LogFormat};
use talent_flow::utils::monitor::SystemMonitor;
use talent_flow::{app_state_from_config, build_router, server, CliConfig, ConfigProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let resolved = cli.resolve();
    let format = match &resolved {
        Ok(config) => config.log_format(),
        Err(_) => LogFormat::from_json_flag(cli.json_logs),
    };
    logger::init_logger(format, cli.verbose);

    tracing::info!("🚀 Starting talent-flow API");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match resolved {
        Ok(config) => config,
        Err(e) => exit_with(&e, "Configuration failed"),
    };
    if let Some(path) = &cli.config {
        tracing::info!("📁 Loaded configuration from: {}", path);
    }

    let monitor = SystemMonitor::new(config.monitoring_enabled());
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }
    monitor.log_stats("startup");

    let state = match app_state_from_config(&config) {
        Ok(state) => state,
        Err(e) => exit_with(&e, "Failed to load talent data"),
    };

    if config.llm_enabled() {
        tracing::info!(
            "🤖 Using Ollama model {} at {}",
            config.model(),
            config.ollama_url()
        );
    } else {
        tracing::info!("🤖 LLM disabled, answering from rules only");
    }

    let router = build_router(state, config.cors_enabled());
    let address = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => exit_with(&TalentError::IoError(e), &format!("Failed to bind {}", address)),
    };

    println!("🌐 talent-flow listening on http://{}/api/chatbot", address);
    println!("✨ Press Ctrl+C to stop");

    if let Err(e) = server::serve(listener, router).await {
        exit_with(&e, "Server error");
    }

    monitor.log_final_stats();
    Ok(())
}

fn exit_with(e: &TalentError, context: &str) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
