use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::ToolModeKind;


/// CLI arguments for mcpchat
#[derive(Parser, Debug)]
#[command(name = "mcpchat")]
#[command(about = "Chat with a language model that can call tools on an MCP server")]
#[command(version)]
pub struct Cli {
    /// API key for the chat-completion endpoint (falls back to OPENAI_API_KEY)
    #[arg(long, value_name = "KEY", env = "MCPCHAT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenAI-compatible chat-completion URL (e.g., http://localhost:8080)
    #[arg(long, value_name = "URL", env = "MCPCHAT_API_URL")]
    pub api_url: Option<String>,

    /// Model identifier sent with every request
    #[arg(long, value_name = "MODEL", env = "MCPCHAT_MODEL")]
    pub model: Option<String>,

    /// SSE URL of the MCP tool provider (e.g., http://localhost:3001/sse)
    #[arg(long, value_name = "URL", env = "MCPCHAT_MCP_URL")]
    pub mcp_url: Option<String>,

    /// How tool results reach the reply: fed to a second model call, or appended directly
    #[arg(long, value_enum, env = "MCPCHAT_TOOL_MODE")]
    pub tool_mode: Option<ToolModeKind>,

    /// Keep the intermediate tool-call turns in history (second-pass mode only)
    #[arg(long, value_name = "BOOL", env = "MCPCHAT_PERSIST_TOOL_TURNS", action = clap::ArgAction::Set)]
    pub persist_tool_turns: Option<bool>,

    /// System prompt placed at the start of the conversation
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Path to a TOML config file (default: ~/.mcpchat/config.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not write the conversation log
    #[arg(long)]
    pub no_log: bool,

    /// Enable verbose debug output (HTTP requests, stream chunks, MCP traffic)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}
