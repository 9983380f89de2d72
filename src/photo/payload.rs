use crate::errors::{AppError, AppResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use regex::Regex;
use std::sync::OnceLock;

fn data_uri_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^data:image/[\w.+-]+;base64,").expect("static regex"))
}

/// Decode `data:image/<type>;base64,<data>` or bare base64 into raw bytes.
pub fn decode_payload(payload: &str) -> AppResult<Vec<u8>> {
    let cleaned = data_uri_prefix().replace(payload.trim(), "");
    let compact: String = cleaned.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = B64
        .decode(compact.as_bytes())
        .map_err(|e| AppError::Validation(format!("Photo is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("Photo is empty.".into()));
    }
    Ok(bytes)
}
