use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::{ClientConfig, FileConfig};
use mcpchat_llm_api::{LlmClient, OpenAiCompatClient};
use mcpchat_logging::{get_logs_dir, ConversationLogger};
use mcpchat_mcp::{McpSseClient, ToolProvider};
use mcpchat_models::ToolDescriptor;

/// Set up application configuration from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<ClientConfig> {
    let file = FileConfig::discover(cli.config.as_deref())?;
    let config = ClientConfig::resolve(cli, file);

    if config.verbose {
        eprintln!("{}", format!("🔧 DEBUG: API URL: {}", config.api_url).bright_black());
        eprintln!("{}", format!("🔧 DEBUG: Model: {}", config.model).bright_black());
        eprintln!("{}", format!("🔧 DEBUG: MCP URL: {}", config.mcp_url).bright_black());
        eprintln!("{}", format!("🔧 DEBUG: Tool mode: {}", config.tool_mode.label()).bright_black());
    }

    Ok(config)
}

pub fn create_llm_client(config: &ClientConfig) -> Arc<dyn LlmClient> {
    Arc::new(OpenAiCompatClient::new(
        config.api_key.clone(),
        config.model.clone(),
        config.api_url.clone(),
        config.verbose,
    ))
}

/// Connect to the MCP server and fetch its tool list
pub async fn connect_tool_provider(config: &ClientConfig) -> Result<(Arc<dyn ToolProvider>, Vec<ToolDescriptor>)> {
    let client = McpSseClient::connect(&config.mcp_url, config.verbose)
        .await
        .with_context(|| format!("Failed to connect to MCP server at {}", config.mcp_url))?;

    if let Some(info) = client.server_info() {
        eprintln!(
            "{} Connected to {} {}",
            "🔌".bright_cyan(),
            info.name.bright_white(),
            info.version.bright_black()
        );
    }

    let tools = client.list_tools().await.context("Failed to list tools")?;

    Ok((Arc::new(client), tools))
}

/// Open the JSONL conversation log; failures only disable logging
pub async fn open_conversation_logger(config: &ClientConfig) -> Option<ConversationLogger> {
    if !config.log_conversation {
        return None;
    }

    let logs_dir = match get_logs_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{} Logging disabled: {}", "⚠️".yellow(), e);
            return None;
        }
    };

    match ConversationLogger::new(&logs_dir).await {
        Ok(logger) => {
            if config.verbose {
                eprintln!("{}", format!("📝 Logging to {}", logger.file_path().display()).bright_black());
            }
            Some(logger)
        }
        Err(e) => {
            eprintln!("{} Logging disabled: {}", "⚠️".yellow(), e);
            None
        }
    }
}
