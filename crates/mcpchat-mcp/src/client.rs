use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, CallToolResult, ClientInfo, Implementation, ProtocolVersion, Tool};
use rmcp::service::RunningService;
use rmcp::transport::SseClientTransport;
use rmcp::RoleClient;
use serde_json::{Map, Value};

use crate::error::{McpError, McpResult};
use crate::provider::{is_error_result, ToolProvider};
use mcpchat_logging::log_mcp_message;
use mcpchat_models::ToolDescriptor;

/// Tool provider reached over the MCP HTTP + SSE transport
pub struct McpSseClient {
    service: RunningService<RoleClient, ClientInfo>,
    verbose: bool,
}

impl McpSseClient {
    /// Open the event stream and run the `initialize` handshake
    pub async fn connect(url: &str, verbose: bool) -> McpResult<Self> {
        reqwest::Url::parse(url).map_err(|e| McpError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let transport = SseClientTransport::start(url.to_string())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;
        log_mcp_message("connected", url, verbose);

        let service = rmcp::serve_client(client_info(), transport)
            .await
            .map_err(|e| McpError::Initialize(e.to_string()))?;

        if let Some(info) = service.peer_info() {
            log_mcp_message("initialized", &serde_json::to_string(info)?, verbose);
        }

        Ok(Self { service, verbose })
    }

    /// Name and version the server announced during the handshake
    pub fn server_info(&self) -> Option<&Implementation> {
        self.service.peer_info().map(|info| &info.server_info)
    }
}

fn client_info() -> ClientInfo {
    let mut info = ClientInfo::default();
    info.protocol_version = ProtocolVersion::V_2024_11_05;
    info.client_info.name = env!("CARGO_PKG_NAME").to_string();
    info.client_info.version = env!("CARGO_PKG_VERSION").to_string();
    info
}

fn to_descriptor(tool: &Tool) -> McpResult<ToolDescriptor> {
    Ok(serde_json::from_value(serde_json::to_value(tool)?)?)
}

#[async_trait]
impl ToolProvider for McpSseClient {
    /// Every tool the server offers, following `nextCursor` across pages
    async fn list_tools(&self) -> McpResult<Vec<ToolDescriptor>> {
        let tools = self.service.list_all_tools().await?;
        log_mcp_message("tools/list", &format!("{} tool(s)", tools.len()), self.verbose);

        tools.iter().map(to_descriptor).collect()
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> McpResult<CallToolResult> {
        log_mcp_message("→ tools/call", &format!("{} {}", name, Value::Object(arguments.clone())), self.verbose);

        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(arguments),
            })
            .await?;

        if self.verbose {
            let direction = if is_error_result(&result) { "← error" } else { "←" };
            log_mcp_message(direction, &serde_json::to_string(&result)?, true);
        }

        Ok(result)
    }
}
