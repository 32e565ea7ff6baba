pub mod repl;
pub mod setup;

pub use repl::{run_prompt_loop, run_repl_mode, PromptSource, RustylinePrompt};
pub use setup::{connect_tool_provider, create_llm_client, open_conversation_logger, setup_from_cli};
