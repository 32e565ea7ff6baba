//! # mcpchat-llm-api
//!
//! Streaming client for OpenAI-compatible chat-completion endpoints.
//!
//! The response stream is surfaced as a sequence of [`StreamFragment`]s:
//! text deltas as they arrive, fully assembled function-call requests once
//! the stream ends, and token usage whenever the server reports it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use mcpchat_llm_api::{LlmClient, OpenAiCompatClient, StreamFragment, OPENAI_API_URL};
//! use mcpchat_models::Message;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OpenAiCompatClient::new(
//!         "your-api-key".to_string(),
//!         "gpt-4o-mini".to_string(),
//!         OPENAI_API_URL.to_string(),
//!         false,
//!     );
//!
//!     let mut stream = client.chat_streaming(vec![Message::user("Hello!")], vec![]).await?;
//!     while let Some(fragment) = stream.next().await {
//!         if let StreamFragment::Text(text) = fragment? {
//!             print!("{}", text);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;


pub use client::{
    LlmClient,
    FragmentStream,
    FunctionCallRequest,
    StreamFragment,
    openai::{OpenAiCompatClient, StreamParser},
};

pub use config::{
    OPENAI_API_URL,
    DEFAULT_MODEL,
    normalize_api_url,
};

pub use mcpchat_models::Usage as TokenUsage;
