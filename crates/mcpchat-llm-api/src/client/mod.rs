use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::Stream;
use serde_json::{Map, Value};
use std::pin::Pin;

use mcpchat_models::{Message, ToolDescriptor, Usage};

pub mod openai;

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallRequest {
    pub call_id: String,
    pub name: String,
    /// Argument JSON exactly as streamed by the model
    pub raw_arguments: String,
}

impl FunctionCallRequest {
    /// Parse the streamed argument text into a name → value mapping.
    /// An empty argument string is an empty mapping.
    pub fn arguments(&self) -> Result<Map<String, Value>> {
        if self.raw_arguments.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_str(&self.raw_arguments)
            .with_context(|| format!("Invalid arguments for '{}': {}", self.name, self.raw_arguments))?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(anyhow::anyhow!(
                "Arguments for '{}' must be a JSON object, got: {}",
                self.name,
                other
            )),
        }
    }
}

/// One incremental unit of a streamed model response
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFragment {
    Text(String),
    FunctionCall(FunctionCallRequest),
    Usage(Usage),
}

pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<StreamFragment>> + Send>>;

/// LLM client trait - the chat backend seen by the response driver
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Streaming chat completion - returns a lazy stream of fragments
    async fn chat_streaming(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDescriptor>,
    ) -> Result<FragmentStream>;
}
