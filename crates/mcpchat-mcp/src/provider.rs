use async_trait::async_trait;
use rmcp::model::CallToolResult;
use serde_json::{Map, Value};

use crate::error::McpResult;
use mcpchat_models::ToolDescriptor;

/// A remote service exposing named, described operations
#[async_trait]
pub trait ToolProvider: Send + Sync {
    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>>;

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<CallToolResult>;
}

/// Text segments of a tool result joined with newlines; other segments are dropped
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .flatten()
        .filter_map(|segment| segment.as_text())
        .map(|text| text.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when the provider flagged the result as a failed invocation
pub fn is_error_result(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}
