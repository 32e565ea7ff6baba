use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

use mcpchat_llm_api::FunctionCallRequest;
use mcpchat_mcp::{is_error_result, result_text, ToolProvider};

/// Turns a model's function-call request into a tool provider invocation
pub struct ToolBridge {
    provider: Arc<dyn ToolProvider>,
    verbose: bool,
}

impl ToolBridge {
    pub fn new(provider: Arc<dyn ToolProvider>, verbose: bool) -> Self {
        Self { provider, verbose }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Invoke the named tool and return its text content.
    /// A result the provider flags as an error is still returned as text.
    pub async fn invoke(&self, call: &FunctionCallRequest) -> Result<String> {
        let arguments = call.arguments()?;

        let result = self
            .provider
            .call_tool(&call.name, arguments)
            .await
            .with_context(|| format!("Tool '{}' failed", call.name))?;

        if is_error_result(&result) && self.verbose {
            eprintln!("{} Tool '{}' reported an error result", "⚠️".yellow(), call.name);
        }

        Ok(result_text(&result))
    }
}
