pub mod history;
pub mod session;
pub mod tool_bridge;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use history::ConversationHistory;
pub use session::{ResponseDriver, TurnOutcome};
pub use tool_bridge::ToolBridge;
