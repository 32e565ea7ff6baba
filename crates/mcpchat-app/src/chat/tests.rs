use pretty_assertions::assert_eq;
use std::sync::Arc;

use crate::chat::test_support::{call, text, usage, ScriptedLlm, TableProvider};
use crate::chat::ResponseDriver;
use crate::config::ToolCallMode;
use mcpchat_mcp::ToolProvider;
use mcpchat_models::{Message, Usage};

const PERSIST: ToolCallMode = ToolCallMode::SecondPass { persist_tool_turns: true };
const NO_PERSIST: ToolCallMode = ToolCallMode::SecondPass { persist_tool_turns: false };

fn driver(llm: Arc<ScriptedLlm>, provider: Arc<dyn ToolProvider>, mode: ToolCallMode) -> ResponseDriver {
    ResponseDriver::new(llm, provider, Vec::new(), mode).with_output(Box::new(std::io::sink()))
}

fn roles(driver: &ResponseDriver) -> Vec<String> {
    driver.history().messages().iter().map(|m| m.role.clone()).collect()
}

#[tokio::test]
async fn test_plain_reply_is_concatenated_text() {
    for mode in [PERSIST, NO_PERSIST, ToolCallMode::Direct] {
        let llm = ScriptedLlm::new(vec![vec![text("Hel"), text("lo"), text(" there")]]);
        let mut chat = driver(llm.clone(), TableProvider::empty(), mode);

        let outcome = chat.respond("hi").await.unwrap();

        assert_eq!(outcome.reply, "Hello there");
        assert_eq!(llm.call_count(), 1);
        assert_eq!(
            chat.history().messages(),
            &[Message::user("hi"), Message::assistant("Hello there")]
        );
    }
}

#[tokio::test]
async fn test_direct_mode_appends_tool_result_block() {
    let llm = ScriptedLlm::new(vec![vec![
        text("Let me check."),
        call("call_1", "add", r#"{"a": 2, "b": 3}"#),
    ]]);
    let provider = TableProvider::with_text("add", "5");
    let mut chat = driver(llm.clone(), provider.clone(), ToolCallMode::Direct);

    let outcome = chat.respond("what is 2+3?").await.unwrap();

    assert_eq!(outcome.reply, "Let me check.\n\n[Tool result: add]\n5");
    assert_eq!(llm.call_count(), 1);
    assert_eq!(roles(&chat), vec!["user", "assistant"]);

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "add");
    assert_eq!(calls[0].1.get("a"), Some(&serde_json::json!(2)));
}

#[tokio::test]
async fn test_second_pass_persists_tool_turns() {
    let llm = ScriptedLlm::new(vec![
        vec![text("Checking"), call("call_1", "weather", r#"{"city":"Oslo"}"#)],
        vec![text("It is "), text("sunny.")],
    ]);
    let mut chat = driver(llm.clone(), TableProvider::with_text("weather", "sunny, 12C"), PERSIST);

    let outcome = chat.respond("weather in Oslo?").await.unwrap();

    assert_eq!(outcome.reply, "It is sunny.");
    assert_eq!(llm.call_count(), 2);
    assert_eq!(roles(&chat), vec!["user", "assistant", "tool", "assistant"]);

    let draft = &chat.history().messages()[1];
    assert_eq!(draft.content, "Checking");
    let tool_calls = draft.tool_calls.as_ref().unwrap();
    assert_eq!(tool_calls[0].id, "call_1");
    assert_eq!(tool_calls[0].function.name, "weather");

    assert_eq!(
        chat.history().messages()[2],
        Message::tool_result("call_1", "weather", "sunny, 12C")
    );

    // The second call sees the tool result
    let second_request = llm.request(1);
    assert_eq!(second_request.len(), 3);
    assert_eq!(second_request[2].content, "sunny, 12C");
}

#[tokio::test]
async fn test_second_pass_without_persistence_keeps_only_final_reply() {
    let llm = ScriptedLlm::new(vec![
        vec![call("call_1", "weather", "{}")],
        vec![text("Sunny.")],
    ]);
    let mut chat = driver(llm.clone(), TableProvider::with_text("weather", "sunny"), NO_PERSIST);

    let outcome = chat.respond("weather?").await.unwrap();

    assert_eq!(outcome.reply, "Sunny.");
    assert_eq!(
        chat.history().messages(),
        &[Message::user("weather?"), Message::assistant("Sunny.")]
    );
    assert_eq!(llm.request(1).len(), 3);
}

#[tokio::test]
async fn test_failing_tool_in_direct_mode_renders_error_block() {
    let llm = ScriptedLlm::new(vec![vec![
        text("Trying."),
        call("call_1", "missing", "{}"),
        call("call_2", "add", "{}"),
    ]]);
    let mut chat = driver(llm, TableProvider::with_text("add", "0"), ToolCallMode::Direct);

    let outcome = chat.respond("go").await.unwrap();

    assert!(outcome.reply.starts_with("Trying.\n\n[Tool error: missing]\n"));
    assert!(outcome.reply.contains("Unknown tool: missing"));
    // The remaining call still runs
    assert!(outcome.reply.ends_with("\n\n[Tool result: add]\n0"));
}

#[tokio::test]
async fn test_failing_tool_in_second_pass_reaches_model_and_reply() {
    let llm = ScriptedLlm::new(vec![
        vec![call("call_1", "missing", "{}")],
        vec![text("That tool is unavailable.")],
    ]);
    let mut chat = driver(llm.clone(), TableProvider::empty(), PERSIST);

    let outcome = chat.respond("go").await.unwrap();

    assert!(outcome.reply.starts_with("That tool is unavailable.\n\n[Tool error: missing]\n"));
    let tool_turn = &llm.request(1)[2];
    assert_eq!(tool_turn.role, "tool");
    assert!(tool_turn.content.starts_with("Error: "));
    assert!(tool_turn.content.contains("Unknown tool: missing"));
}

#[tokio::test]
async fn test_error_flagged_result_is_still_tool_text() {
    let llm = ScriptedLlm::new(vec![vec![call("call_1", "write", "{}")]]);
    let mut chat = driver(llm, TableProvider::with_error_text("write", "disk full"), ToolCallMode::Direct);

    let outcome = chat.respond("save it").await.unwrap();

    assert_eq!(outcome.reply, "\n\n[Tool result: write]\ndisk full");
}

#[tokio::test]
async fn test_invalid_arguments_become_error_block() {
    let llm = ScriptedLlm::new(vec![vec![call("call_1", "add", "{not json")]]);
    let provider = TableProvider::with_text("add", "0");
    let mut chat = driver(llm, provider.clone(), ToolCallMode::Direct);

    let outcome = chat.respond("go").await.unwrap();

    assert!(outcome.reply.starts_with("\n\n[Tool error: add]\nInvalid arguments for 'add'"));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_usage_is_last_report_of_turn() {
    let llm = ScriptedLlm::new(vec![vec![usage(1, 1), text("ok"), usage(10, 5)]]);
    let mut chat = driver(llm, TableProvider::empty(), PERSIST);

    let outcome = chat.respond("hi").await.unwrap();

    assert_eq!(
        outcome.usage,
        Some(Usage { prompt_tokens: 10, completion_tokens: 5, total_tokens: 15 })
    );
}

#[tokio::test]
async fn test_usage_from_second_pass_wins() {
    let llm = ScriptedLlm::new(vec![
        vec![call("call_1", "add", "{}"), usage(10, 2)],
        vec![text("done"), usage(20, 3)],
    ]);
    let mut chat = driver(llm, TableProvider::with_text("add", "1"), PERSIST);

    let outcome = chat.respond("hi").await.unwrap();

    assert_eq!(outcome.usage.map(|u| u.total_tokens), Some(23));
}

#[tokio::test]
async fn test_usage_kept_when_second_pass_reports_none() {
    let llm = ScriptedLlm::new(vec![
        vec![call("call_1", "add", "{}"), usage(10, 2)],
        vec![text("done")],
    ]);
    let mut chat = driver(llm, TableProvider::with_text("add", "1"), PERSIST);

    let outcome = chat.respond("hi").await.unwrap();

    assert_eq!(outcome.usage.map(|u| u.total_tokens), Some(12));
}

#[tokio::test]
async fn test_no_usage_reported() {
    let llm = ScriptedLlm::new(vec![vec![text("ok")]]);
    let mut chat = driver(llm, TableProvider::empty(), ToolCallMode::Direct);

    assert_eq!(chat.respond("hi").await.unwrap().usage, None);
}

#[tokio::test]
async fn test_nested_calls_in_second_pass_are_ignored() {
    let llm = ScriptedLlm::new(vec![
        vec![call("call_1", "add", "{}")],
        vec![text("final"), call("call_2", "add", "{}")],
    ]);
    let provider = TableProvider::with_text("add", "1");
    let mut chat = driver(llm.clone(), provider.clone(), PERSIST);

    let outcome = chat.respond("hi").await.unwrap();

    assert_eq!(outcome.reply, "final");
    assert_eq!(provider.calls().len(), 1);
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn test_system_prompt_leads_every_request() {
    let llm = ScriptedLlm::new(vec![vec![text("one")], vec![text("two")]]);
    let mut chat = driver(llm.clone(), TableProvider::empty(), PERSIST).with_system_prompt(Some("Be brief."));

    chat.respond("first").await.unwrap();
    chat.respond("second").await.unwrap();

    let second_request = llm.request(1);
    assert_eq!(second_request[0], Message::system("Be brief."));
    assert_eq!(second_request.len(), 4);
    assert_eq!(second_request[3], Message::user("second"));
}

#[tokio::test]
async fn test_turns_are_written_to_conversation_log() {
    let dir = tempfile::tempdir().unwrap();
    let logger = mcpchat_logging::ConversationLogger::new(dir.path()).await.unwrap();
    let log_path = logger.file_path().to_path_buf();

    let llm = ScriptedLlm::new(vec![vec![text("hello")]]);
    let mut chat = driver(llm, TableProvider::empty(), PERSIST).with_logger(Some(logger));

    chat.respond("hi").await.unwrap();
    chat.shutdown().await;

    let contents = std::fs::read_to_string(log_path).unwrap();
    let entries: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["role"], "user");
    assert_eq!(entries[1]["role"], "assistant");
    assert_eq!(entries[1]["model"], "scripted-model");
}
