use anyhow::Result;
use colored::Colorize;
use futures_util::StreamExt;
use std::io::Write;
use std::sync::Arc;

use crate::chat::{ConversationHistory, ToolBridge};
use crate::config::ToolCallMode;
use mcpchat_llm_api::{FunctionCallRequest, LlmClient, StreamFragment};
use mcpchat_logging::{safe_truncate, ConversationLogger};
use mcpchat_mcp::ToolProvider;
use mcpchat_models::{FunctionCall, Message, ToolCall, ToolDescriptor, Usage};

/// Result of one user turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The assistant message appended to history
    pub reply: String,
    /// Last usage report seen in any stream of the turn
    pub usage: Option<Usage>,
}

/// Everything one streamed model call produced
#[derive(Debug, Default)]
struct StreamedReply {
    text: String,
    calls: Vec<FunctionCallRequest>,
    usage: Option<Usage>,
}

/// Drives a conversation: streams model replies, runs requested tools and
/// records the turns.
pub struct ResponseDriver {
    llm: Arc<dyn LlmClient>,
    bridge: ToolBridge,
    tools: Vec<ToolDescriptor>,
    mode: ToolCallMode,
    history: ConversationHistory,
    logger: Option<ConversationLogger>,
    out: Box<dyn Write + Send>,
    verbose: bool,
}

impl ResponseDriver {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        provider: Arc<dyn ToolProvider>,
        tools: Vec<ToolDescriptor>,
        mode: ToolCallMode,
    ) -> Self {
        Self {
            llm,
            bridge: ToolBridge::new(provider, false),
            tools,
            mode,
            history: ConversationHistory::new(),
            logger: None,
            out: Box::new(std::io::stdout()),
            verbose: false,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<&str>) -> Self {
        self.history = ConversationHistory::with_system_prompt(system_prompt);
        self
    }

    pub fn with_logger(mut self, logger: Option<ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Where streamed reply text is written (stdout by default)
    pub fn with_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.out = out;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self.bridge.set_verbose(verbose);
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Log the messages already in history (the system prompt) once the logger is attached
    pub async fn log_existing(&mut self) {
        if let Some(logger) = &mut self.logger {
            for message in self.history.messages() {
                logger.log(message, None).await;
            }
        }
    }

    /// Handle one user message and return the final assistant reply.
    ///
    /// Tool failures become visible error blocks; only transport errors from
    /// the chat backend are returned as `Err`.
    pub async fn respond(&mut self, user_message: &str) -> Result<TurnOutcome> {
        self.record(Message::user(user_message)).await;
        if self.verbose {
            eprintln!("{}", format!("🔧 DEBUG: {} message(s) in history", self.history.len()).bright_black());
        }

        let draft = self.stream_reply(self.history.messages().to_vec()).await?;
        let mut usage = draft.usage;

        let reply = if draft.calls.is_empty() {
            draft.text
        } else {
            match self.mode {
                ToolCallMode::Direct => self.run_direct(draft).await?,
                ToolCallMode::SecondPass { persist_tool_turns } => {
                    self.run_second_pass(draft, persist_tool_turns, &mut usage).await?
                }
            }
        };

        writeln!(self.out)?;
        self.out.flush()?;

        self.record(Message::assistant(reply.clone())).await;

        Ok(TurnOutcome { reply, usage })
    }

    /// Append each tool's output to the draft under a header naming the tool
    async fn run_direct(&mut self, draft: StreamedReply) -> Result<String> {
        let mut response = draft.text;

        for call in &draft.calls {
            let block = match self.invoke_tool(call).await {
                Ok(text) => tool_block("Tool result", &call.name, &text),
                Err(message) => tool_block("Tool error", &call.name, &message),
            };
            write!(self.out, "{}", block)?;
            response.push_str(&block);
        }

        Ok(response)
    }

    /// Feed tool outputs back to the model and return its second reply
    async fn run_second_pass(
        &mut self,
        draft: StreamedReply,
        persist_tool_turns: bool,
        usage: &mut Option<Usage>,
    ) -> Result<String> {
        let tool_calls = draft.calls.iter().map(to_tool_call).collect();
        let mut tool_turns = vec![Message::assistant_with_tool_calls(draft.text, tool_calls)];
        let mut error_blocks = String::new();

        for call in &draft.calls {
            let content = match self.invoke_tool(call).await {
                Ok(text) => text,
                Err(message) => {
                    error_blocks.push_str(&tool_block("Tool error", &call.name, &message));
                    format!("Error: {}", message)
                }
            };
            tool_turns.push(Message::tool_result(&call.call_id, &call.name, content));
        }

        let mut working = self.history.messages().to_vec();
        working.extend(tool_turns.iter().cloned());

        writeln!(self.out)?;
        let second = self.stream_reply(working).await?;
        if second.usage.is_some() {
            *usage = second.usage;
        }

        for nested in &second.calls {
            eprintln!(
                "{} Ignoring tool call '{}' requested after tool results",
                "⚠️".yellow(),
                nested.name
            );
        }

        if persist_tool_turns {
            for turn in tool_turns {
                self.record(turn).await;
            }
        }

        let mut reply = second.text;
        if !error_blocks.is_empty() {
            write!(self.out, "{}", error_blocks)?;
            reply.push_str(&error_blocks);
        }

        Ok(reply)
    }

    /// Run one tool call, rendering any failure as a message
    async fn invoke_tool(&self, call: &FunctionCallRequest) -> std::result::Result<String, String> {
        eprintln!(
            "{} {} {}",
            "🔧".bright_yellow(),
            call.name.bright_cyan(),
            safe_truncate(&call.raw_arguments, 200).bright_black()
        );

        match self.bridge.invoke(call).await {
            Ok(text) => {
                if self.verbose {
                    eprintln!("{} {}", "✅".green(), safe_truncate(&text, 200).bright_black());
                }
                Ok(text)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                eprintln!("{} {}", "❌".bright_red(), message.red());
                Err(message)
            }
        }
    }

    /// Stream one model call, echoing text as it arrives
    async fn stream_reply(&mut self, messages: Vec<Message>) -> Result<StreamedReply> {
        let mut stream = self.llm.chat_streaming(messages, self.tools.clone()).await?;
        let mut reply = StreamedReply::default();

        while let Some(fragment) = stream.next().await {
            match fragment? {
                StreamFragment::Text(text) => {
                    write!(self.out, "{}", text)?;
                    self.out.flush()?;
                    reply.text.push_str(&text);
                }
                StreamFragment::FunctionCall(call) => reply.calls.push(call),
                StreamFragment::Usage(usage) => reply.usage = Some(usage),
            }
        }

        Ok(reply)
    }

    async fn record(&mut self, message: Message) {
        if let Some(logger) = &mut self.logger {
            let model = (message.role == "assistant").then(|| self.llm.model());
            logger.log(&message, model).await;
        }
        self.history.push(message);
    }

    /// Flush and close the conversation log
    pub async fn shutdown(&mut self) {
        if let Some(logger) = &mut self.logger {
            logger.shutdown().await;
        }
    }
}

fn tool_block(label: &str, tool_name: &str, body: &str) -> String {
    format!("\n\n[{}: {}]\n{}", label, tool_name, body)
}

fn to_tool_call(call: &FunctionCallRequest) -> ToolCall {
    ToolCall {
        id: call.call_id.clone(),
        tool_type: "function".to_string(),
        function: FunctionCall {
            name: call.name.clone(),
            arguments: call.raw_arguments.clone(),
        },
    }
}
