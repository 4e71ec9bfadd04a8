use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

const BODY_PREVIEW_LIMIT: usize = 500;

/// Parses a response body, logging where parsing failed and a preview of
/// the offending payload.
pub(crate) fn decode<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice::<T>(bytes).inspect_err(|e| {
        warn!(
            endpoint = %endpoint,
            error_message = %e,
            error_line = e.line(),
            error_column = e.column(),
            error_category = ?e.classify(),
            response_body = %body_preview(bytes),
            "Failed to parse JSON response body"
        );
    })
}

/// `message` of an error body, if there is one. Error bodies are not always
/// JSON, so failures here are not logged.
pub(crate) fn error_message(bytes: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
}

fn body_preview(bytes: &[u8]) -> String {
    let body = String::from_utf8_lossy(bytes);
    if body.chars().count() > BODY_PREVIEW_LIMIT {
        format!("{}...", body.chars().take(BODY_PREVIEW_LIMIT).collect::<String>())
    } else {
        body.to_string()
    }
}
