// Models module - data structures for chat and tool-provider communication
pub mod types;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use types::{Message, ToolCall, FunctionCall, ToolDescriptor};
pub use requests::{ChatRequest, Tool, FunctionDef, StreamOptions};
pub use responses::{
    Usage,
    StreamChunk, StreamChoice, StreamDelta, StreamToolCallDelta, StreamFunctionDelta,
};
