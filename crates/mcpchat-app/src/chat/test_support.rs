//! Scripted stand-ins for the chat backend and the tool provider.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use mcpchat_llm_api::{FragmentStream, FunctionCallRequest, LlmClient, StreamFragment};
use mcpchat_mcp::{CallToolResult, Content, McpError, McpResult, ToolProvider};
use mcpchat_models::{Message, ToolDescriptor, Usage};

/// Chat backend that replays one scripted stream per call
#[derive(Default)]
pub(crate) struct ScriptedLlm {
    scripts: Mutex<VecDeque<Vec<StreamFragment>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlm {
    pub fn new(scripts: Vec<Vec<StreamFragment>>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Messages sent with the n-th call
    pub fn request(&self, n: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn chat_streaming(&self, messages: Vec<Message>, _tools: Vec<ToolDescriptor>) -> Result<FragmentStream> {
        self.requests.lock().unwrap().push(messages);
        let fragments = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        Ok(Box::pin(futures::stream::iter(fragments.into_iter().map(Ok::<_, anyhow::Error>))))
    }
}

/// Tool provider answering from a fixed table
#[derive(Default)]
pub(crate) struct TableProvider {
    results: HashMap<String, CallToolResult>,
    calls: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl TableProvider {
    pub fn with_text(name: &str, text: &str) -> Arc<Self> {
        let mut provider = Self::default();
        provider.results.insert(name.to_string(), text_result(text, false));
        Arc::new(provider)
    }

    /// A tool whose result the provider flags as an error
    pub fn with_error_text(name: &str, text: &str) -> Arc<Self> {
        let mut provider = Self::default();
        provider.results.insert(name.to_string(), text_result(text, true));
        Arc::new(provider)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(String, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolProvider for TableProvider {
    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        Ok(self
            .results
            .keys()
            .map(|name| ToolDescriptor {
                name: name.clone(),
                description: String::new(),
                input_schema: serde_json::json!({"type": "object"}),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<CallToolResult> {
        self.calls.lock().unwrap().push((name.to_string(), arguments));
        self.results.get(name).cloned().ok_or_else(|| McpError::Rpc {
            code: -32602,
            message: format!("Unknown tool: {}", name),
        })
    }
}

pub(crate) fn text_result(text: &str, is_error: bool) -> CallToolResult {
    if is_error {
        CallToolResult::error(vec![Content::text(text)])
    } else {
        CallToolResult::success(vec![Content::text(text)])
    }
}

pub(crate) fn text(s: &str) -> StreamFragment {
    StreamFragment::Text(s.to_string())
}

pub(crate) fn call(id: &str, name: &str, arguments: &str) -> StreamFragment {
    StreamFragment::FunctionCall(FunctionCallRequest {
        call_id: id.to_string(),
        name: name.to_string(),
        raw_arguments: arguments.to_string(),
    })
}

pub(crate) fn usage(prompt: usize, completion: usize) -> StreamFragment {
    StreamFragment::Usage(Usage {
        prompt_tokens: prompt,
        completion_tokens: completion,
        total_tokens: prompt + completion,
    })
}
