use colored::Colorize;

use mcpchat_models::ChatRequest;
use crate::safe_truncate;

const MAX_DUMP_CHARS: usize = 5000;

fn print_truncated(text: &str) {
    if text.chars().count() > MAX_DUMP_CHARS {
        eprintln!("{}", safe_truncate(text, MAX_DUMP_CHARS));
        eprintln!("\n{}", format!("... (truncated, total {} bytes)", text.len()).bright_black());
    } else {
        eprintln!("{}", text);
    }
}

/// Log HTTP request details for debugging (console output)
pub fn log_request(url: &str, request: &ChatRequest, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    eprintln!("\n{}", "═".repeat(80).bright_cyan());
    eprintln!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    eprintln!("{}", "═".repeat(80).bright_cyan());

    // Parse URL to show host and port
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        eprintln!("{}: {}", "URL".bright_yellow(), url);
        eprintln!("{}: {}", "Host".bright_yellow(), parsed_url.host_str().unwrap_or("unknown"));
        eprintln!("{}: {}", "Port".bright_yellow(), parsed_url.port_or_known_default()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string()));
    } else {
        eprintln!("{}: {}", "URL".bright_yellow(), url);
    }

    eprintln!("\n{}", "Headers:".bright_yellow());
    eprintln!("  Content-Type: application/json");
    eprintln!("  Authorization: Bearer {}***", &api_key.chars().take(10).collect::<String>());

    eprintln!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(&request) {
        Ok(json) => print_truncated(&json),
        Err(e) => eprintln!("{}", format!("Error serializing request: {}", e).red()),
    }

    eprintln!("{}", "═".repeat(80).bright_cyan());
    eprintln!();
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: &reqwest::StatusCode, headers: &reqwest::header::HeaderMap, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    eprintln!("\n{}", "═".repeat(80).bright_green());
    eprintln!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    eprintln!("{}", "═".repeat(80).bright_green());

    eprintln!("{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    eprintln!("\n{}", "Headers:".bright_yellow());
    for (name, value) in headers.iter() {
        if let Ok(val_str) = value.to_str() {
            eprintln!("  {}: {}", name.as_str().bright_white(), val_str);
        }
    }

    eprintln!("\n{}", "Response Body:".bright_yellow());
    // Try to pretty-print JSON, fall back to raw text
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok());
    print_truncated(pretty.as_deref().unwrap_or(body));

    eprintln!("{}", "═".repeat(80).bright_green());
    eprintln!();
}

/// Log streaming chunk for debugging (console output)
pub fn log_stream_chunk(chunk_num: usize, data: &str, verbose: bool) {
    if !verbose {
        return;
    }

    eprintln!("{}", format!("📦 Stream Chunk #{}: {}", chunk_num,
        if data.chars().count() > 200 {
            format!("{}... ({} bytes)", safe_truncate(data, 200), data.len())
        } else {
            data.to_string()
        }
    ).bright_black());
}

/// Log a JSON-RPC message exchanged with the tool provider
pub fn log_mcp_message(direction: &str, payload: &str, verbose: bool) {
    if !verbose {
        return;
    }

    eprintln!("{}", format!("🔌 MCP {}: {}", direction, safe_truncate(payload, 500)).bright_black());
}
