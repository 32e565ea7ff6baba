use anyhow::{anyhow, Context, Result};
use async_stream::try_stream;
use async_trait::async_trait;
use colored::Colorize;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use std::collections::BTreeMap;

use crate::client::{FragmentStream, FunctionCallRequest, LlmClient, StreamFragment};
use crate::config::normalize_api_url;
use mcpchat_logging::{log_request, log_response, log_stream_chunk};
use mcpchat_models::{
    ChatRequest, Message, StreamChunk, StreamOptions, Tool, ToolDescriptor,
};

/// OpenAI-compatible chat-completions client (OpenAI, Groq, llama.cpp server, ...)
pub struct OpenAiCompatClient {
    api_key: String,
    model: String,
    api_url: String,
    verbose: bool,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(api_key: String, model: String, api_url: String, verbose: bool) -> Self {
        Self {
            api_key,
            model,
            api_url: normalize_api_url(&api_url),
            verbose,
            client: reqwest::Client::new(),
        }
    }

    fn build_chat_request(&self, messages: Vec<Message>, tools: &[ToolDescriptor]) -> ChatRequest {
        let tools: Vec<Tool> = tools.iter().map(Tool::from).collect();
        let tool_choice = if tools.is_empty() { None } else { Some("auto".to_string()) };

        ChatRequest {
            model: self.model.clone(),
            messages,
            tools,
            tool_choice,
            stream: Some(true),
            stream_options: Some(StreamOptions { include_usage: true }),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat_streaming(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDescriptor>,
    ) -> Result<FragmentStream> {
        let request = self.build_chat_request(messages, &tools);

        log_request(&self.api_url, &request, &self.api_key, self.verbose);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to reach chat endpoint {}", self.api_url))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let error_body = response.text().await.unwrap_or_else(|_| "Unable to read error body".to_string());
            log_response(&status, &headers, &error_body, self.verbose);
            return Err(anyhow::anyhow!("API request failed with status {}: {}", status, error_body));
        }

        let verbose = self.verbose;
        let stream: FragmentStream = Box::pin(try_stream! {
            let mut events = response.bytes_stream().eventsource();
            let mut parser = StreamParser::new(verbose);

            while !parser.is_done() {
                let Some(event) = events.next().await else {
                    break;
                };
                let event = event.map_err(|e| anyhow!("Error reading stream: {}", e))?;

                for fragment in parser.on_data(&event.data) {
                    yield fragment;
                }
            }

            for fragment in parser.finish() {
                yield fragment;
            }
        });

        Ok(stream)
    }
}

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Turns `data:` payloads of a chat-completion stream into fragments.
///
/// Text and usage are emitted immediately. Tool-call deltas are merged by
/// their `index` and only released by [`StreamParser::finish`], since the
/// argument JSON is spread over many chunks.
#[derive(Debug, Default)]
pub struct StreamParser {
    verbose: bool,
    done: bool,
    chunk_counter: usize,
    tool_calls: BTreeMap<usize, PartialToolCall>,
}

impl StreamParser {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Default::default()
        }
    }

    /// True once the `[DONE]` marker has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn on_data(&mut self, data: &str) -> Vec<StreamFragment> {
        let mut fragments = Vec::new();
        if self.done {
            return fragments;
        }

        self.chunk_counter += 1;
        log_stream_chunk(self.chunk_counter, data, self.verbose);

        if data.trim() == "[DONE]" {
            self.done = true;
            return fragments;
        }

        let chunk = match serde_json::from_str::<StreamChunk>(data) {
            Ok(chunk) => chunk,
            Err(e) => {
                if self.verbose {
                    eprintln!("{} Skipping unparsable stream chunk: {}", "⚠️".yellow(), e);
                }
                return fragments;
            }
        };

        if let Some(choice) = chunk.choices.first() {
            let delta = &choice.delta;

            if let Some(content) = &delta.content {
                if !content.is_empty() {
                    fragments.push(StreamFragment::Text(content.clone()));
                }
            }

            // Accumulate tool calls (streaming deltas)
            if let Some(tool_call_deltas) = &delta.tool_calls {
                for delta_call in tool_call_deltas {
                    let tool_call = self.tool_calls.entry(delta_call.index).or_default();
                    if let Some(id) = &delta_call.id {
                        tool_call.id = id.clone();
                    }
                    if let Some(function_delta) = &delta_call.function {
                        if let Some(name) = &function_delta.name {
                            tool_call.name = name.clone();
                        }
                        if let Some(args) = &function_delta.arguments {
                            tool_call.arguments.push_str(args);
                        }
                    }
                }
            }
        }

        if let Some(usage) = chunk.usage {
            fragments.push(StreamFragment::Usage(usage));
        }

        fragments
    }

    /// Release the accumulated function-call requests
    pub fn finish(&mut self) -> Vec<StreamFragment> {
        std::mem::take(&mut self.tool_calls)
            .into_iter()
            .filter_map(|(index, call)| {
                if call.name.is_empty() {
                    if self.verbose {
                        eprintln!("{} Dropping tool call #{} without a name", "⚠️".yellow(), index);
                    }
                    return None;
                }

                let call_id = if call.id.is_empty() { format!("call_{}", index) } else { call.id };
                Some(StreamFragment::FunctionCall(FunctionCallRequest {
                    call_id,
                    name: call.name,
                    raw_arguments: call.arguments,
                }))
            })
            .collect()
    }
}
