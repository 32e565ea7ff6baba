use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::app::setup::{connect_tool_provider, create_llm_client, open_conversation_logger};
use crate::chat::ResponseDriver;
use crate::config::ClientConfig;

/// Source of operator input lines; `None` means input is exhausted
pub trait PromptSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Line editor with in-session history
pub struct RustylinePrompt {
    editor: DefaultEditor,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl PromptSource for RustylinePrompt {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Read prompts until empty or absent input, answering each one
pub async fn run_prompt_loop<P: PromptSource>(prompt: &mut P, driver: &mut ResponseDriver) -> Result<()> {
    loop {
        let Some(line) = prompt.read_line(&format!("{} ", "You:".bright_green().bold()))? else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            break;
        }

        print!("{} ", "Assistant:".bright_blue().bold());
        let outcome = driver.respond(line).await?;

        if let Some(usage) = outcome.usage {
            eprintln!(
                "{} {}",
                "📊".bright_black(),
                format!(
                    "Tokens: {} prompt + {} completion = {} total",
                    usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
                )
                .bright_black()
            );
        }
        println!();
    }

    Ok(())
}

/// Run interactive REPL mode
pub async fn run_repl_mode(config: ClientConfig) -> Result<()> {
    println!("{}", "🤖 MCP Chat".bright_cyan().bold());

    let (provider, tools) = connect_tool_provider(&config).await?;
    let llm = create_llm_client(&config);

    println!(
        "{}",
        format!(
            "Model: {} • Tool mode: {} • {} tool(s) available",
            config.model,
            config.tool_mode.label(),
            tools.len()
        )
        .bright_black()
    );
    for tool in &tools {
        if tool.description.is_empty() {
            println!("  {} {}", "•".bright_black(), tool.name.bright_white());
        } else {
            println!(
                "  {} {} {}",
                "•".bright_black(),
                tool.name.bright_white(),
                format!("- {}", tool.description).bright_black()
            );
        }
    }
    println!("{}", "Press Enter on an empty line (or Ctrl-D) to exit\n".bright_black());

    let logger = open_conversation_logger(&config).await;

    let mut driver = ResponseDriver::new(llm, provider, tools, config.tool_mode)
        .with_system_prompt(config.system_prompt.as_deref())
        .with_logger(logger)
        .with_verbose(config.verbose);
    driver.log_existing().await;

    let mut prompt = RustylinePrompt::new()?;
    let result = run_prompt_loop(&mut prompt, &mut driver).await;

    driver.shutdown().await;
    println!("{}", "Goodbye!".bright_cyan());

    result
}
