//! # mcpchat-mcp
//!
//! Client side of the Model Context Protocol over the HTTP + Server-Sent-Events
//! transport, built on the `rmcp` SDK: one long-lived `GET` carries server →
//! client messages, every client → server JSON-RPC message is a `POST` to the
//! endpoint the server announces in its first `endpoint` event.
//!
//! Only the tool surface is used: the `initialize` handshake, `tools/list`
//! and `tools/call`. [`ToolProvider`] is the seam the chat driver talks to.

pub mod client;
pub mod error;
pub mod provider;

pub use client::McpSseClient;
pub use error::{McpError, McpResult};
pub use provider::{is_error_result, result_text, ToolProvider};
pub use rmcp::model::{CallToolResult, Content, Implementation};
