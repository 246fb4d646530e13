pub mod cli;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod history;
pub mod llm;
pub mod models;
pub mod repl;
pub mod transcript;

use cli::Args;
use config::prompt::load_prompt_context;
use controller::ConversationController;
use history::initialize_history_store;
use llm::chat::new_provider;
use llm::{ ProviderConfig, ProviderType };
use log::info;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("History Store Type: {}", args.history_type);
    info!("History Directory: {}", args.history_dir);
    info!("History Key: {}", args.history_key);
    info!("Provider: {}", args.provider);
    info!("Provider Base URL: {}", args.provider_base_url.as_deref().unwrap_or("provider default"));
    info!("Provider Model: {}", args.provider_model.as_deref().unwrap_or("provider default"));
    info!("Stub Delay: {}ms", args.stub_delay_ms);
    info!("Response Timeout: {}ms", args.response_timeout_ms);
    info!("Prompt Path: {}", args.prompt_path);
    info!("Export Directory: {}", args.export_dir);
    info!("-------------------------");

    let store = initialize_history_store(&args)?;
    let provider_config = ProviderConfig {
        provider_type: args.provider.parse::<ProviderType>()?,
        base_url: args.provider_base_url.clone(),
        model: args.provider_model.clone(),
        stub_delay: Duration::from_millis(args.stub_delay_ms),
    };
    let provider = new_provider(&provider_config)?;
    info!("Response provider configured: {}", provider.name());

    let context = load_prompt_context(&args.prompt_path).await;
    let controller = ConversationController::new(store, provider, context).with_response_timeout(
        Duration::from_millis(args.response_timeout_ms)
    );

    repl::run(controller, Path::new(&args.export_dir)).await
}
