//! Nelum Bot — web-search chatbot entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at configured level
//!   4. Build providers, tools, prompts, chain
//!   5. Spawn Ctrl-C → shutdown signal watcher
//!   6. Run console channel until shutdown

use tokio_util::sync::CancellationToken;
use tracing::info;

use nelum_bot::chain::{SearchChain, prompt::PromptSet};
use nelum_bot::session::Transcript;
use nelum_bot::tools::Toolbox;
use nelum_bot::{config, console, error, llm, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    info!(
        bot_name = %config.bot_name,
        chain_mode = ?config.chain.mode,
        log_level = %config.log_level,
        "config loaded"
    );

    let orchestrator = llm::providers::build(
        &config.llm,
        &config.llm.openai.orchestrator_model,
        config.llm_api_key.clone(),
    )?;
    let summarizer = llm::providers::build(
        &config.llm,
        &config.llm.openai.summarizer_model,
        config.llm_api_key.clone(),
    )?;
    let tools = Toolbox::from_config(&config.tools, config.weather_api_key.clone())?;
    let prompts = PromptSet::load(&config.chain.prompts_dir);

    let chain = SearchChain::new(
        orchestrator,
        summarizer,
        tools,
        prompts,
        config.chain.mode,
        config.chain.track_metrics,
    );
    let transcript = Transcript::new(config.chain.history_turns);

    // Shared shutdown token — Ctrl-C cancels it, the console watches it.
    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_shutdown.cancel();
        }
    });

    console::run(chain, transcript, shutdown, &config.bot_name).await
}
