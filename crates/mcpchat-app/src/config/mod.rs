use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use mcpchat_llm_api::{DEFAULT_MODEL, OPENAI_API_URL};

/// Tool policy selector as spelled on the command line and in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolModeKind {
    /// Feed tool results to a second model call that writes the reply
    SecondPass,
    /// Append tool results to the draft reply
    Direct,
}

/// How function calls requested by the model turn into the visible reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallMode {
    SecondPass { persist_tool_turns: bool },
    Direct,
}

impl Default for ToolCallMode {
    fn default() -> Self {
        ToolCallMode::SecondPass { persist_tool_turns: true }
    }
}

impl ToolCallMode {
    pub fn from_parts(kind: Option<ToolModeKind>, persist_tool_turns: Option<bool>) -> Self {
        match kind.unwrap_or(ToolModeKind::SecondPass) {
            ToolModeKind::SecondPass => ToolCallMode::SecondPass {
                persist_tool_turns: persist_tool_turns.unwrap_or(true),
            },
            ToolModeKind::Direct => ToolCallMode::Direct,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolCallMode::SecondPass { persist_tool_turns: true } => "second-pass",
            ToolCallMode::SecondPass { persist_tool_turns: false } => "second-pass (tool turns not kept)",
            ToolCallMode::Direct => "direct",
        }
    }
}

/// Settings read from the TOML config file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub mcp_url: Option<String>,
    pub tool_mode: Option<ToolModeKind>,
    pub persist_tool_turns: Option<bool>,
    pub system_prompt: Option<String>,
}

impl FileConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load the explicit path (must exist) or the default location (optional)
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// ~/.mcpchat/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".mcpchat").join("config.toml"))
}

/// Fully resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub mcp_url: String,
    pub tool_mode: ToolCallMode,
    pub system_prompt: Option<String>,
    pub log_conversation: bool,
    pub verbose: bool,
}

impl ClientConfig {
    /// Resolve settings with precedence CLI/env > config file > defaults
    pub fn resolve(cli: &Cli, file: FileConfig) -> Self {
        Self::resolve_with_fallback_key(cli, file, env::var("OPENAI_API_KEY").ok())
    }

    pub fn resolve_with_fallback_key(cli: &Cli, file: FileConfig, fallback_key: Option<String>) -> Self {
        let api_key = non_empty(cli.api_key.clone())
            .or_else(|| non_empty(fallback_key))
            .or_else(|| non_empty(file.api_key))
            .unwrap_or_default();

        let api_url = non_empty(cli.api_url.clone())
            .or_else(|| non_empty(file.api_url))
            .unwrap_or_else(|| OPENAI_API_URL.to_string());

        let model = non_empty(cli.model.clone())
            .or_else(|| non_empty(file.model))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mcp_url = non_empty(cli.mcp_url.clone())
            .or_else(|| non_empty(file.mcp_url))
            .unwrap_or_default();

        let tool_mode = ToolCallMode::from_parts(
            cli.tool_mode.or(file.tool_mode),
            cli.persist_tool_turns.or(file.persist_tool_turns),
        );

        let system_prompt = non_empty(cli.system_prompt.clone()).or_else(|| non_empty(file.system_prompt));

        ClientConfig {
            api_key,
            api_url,
            model,
            mcp_url,
            tool_mode,
            system_prompt,
            log_conversation: !cli.no_log,
            verbose: cli.verbose,
        }
    }

    /// Human-readable list of required settings that are still empty
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.trim().is_empty() {
            missing.push("No API key configured (--api-key, MCPCHAT_API_KEY or OPENAI_API_KEY)");
        }
        if self.mcp_url.trim().is_empty() {
            missing.push("No MCP server URL configured (--mcp-url or MCPCHAT_MCP_URL)");
        }
        missing
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
