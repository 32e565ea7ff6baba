/// Default OpenAI API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Point a base URL at the chat-completions route.
///
/// Only the URL path is inspected: a path already ending in `/completions`
/// is left alone, and a trailing `/v1` is kept rather than doubled.
/// Unparsable input is returned unchanged so the request reports it.
pub fn normalize_api_url(url: &str) -> String {
    let Ok(mut parsed) = reqwest::Url::parse(url) else {
        return url.to_string();
    };

    let path = parsed.path().trim_end_matches('/').to_string();
    if path.ends_with("/completions") {
        return url.to_string();
    }

    let base = path.strip_suffix("/v1").unwrap_or(&path);
    parsed.set_path(&format!("{}/v1/chat/completions", base));
    parsed.to_string()
}
