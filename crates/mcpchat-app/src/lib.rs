//! mcpchat - a console chat client whose model can call tools on an MCP server.

pub mod app;
pub mod chat;
pub mod cli;
pub mod config;

pub use cli::Cli;
pub use config::{ClientConfig, FileConfig, ToolCallMode, ToolModeKind};
pub use chat::{ConversationHistory, ResponseDriver, ToolBridge, TurnOutcome};
pub use app::{run_prompt_loop, run_repl_mode, setup_from_cli, PromptSource};
