use collab_manager_core::PlatformError;

const ERROR_BODY_MAX_CHARS: usize = 800;

pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

/// Prefer the `message` field GitHub puts in error bodies.
pub fn github_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| truncate_for_error(body.trim(), ERROR_BODY_MAX_CHARS))
}

pub fn platform_error_for_status(status: u16, body: &str) -> PlatformError {
    if status == 404 {
        return PlatformError::NotFound;
    }
    PlatformError::Status {
        status,
        body: github_error_message(body),
    }
}

/// GitHub listing pages are one-based.
pub fn github_page_number(page_index: u32) -> String {
    page_index.saturating_add(1).to_string()
}
