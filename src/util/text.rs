pub(crate) fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Render a body for logs: pretty JSON when it parses, else UTF-8 text,
/// else a byte count. Output is capped at `max_bytes` on a char boundary.
pub(crate) fn render_body(body: &[u8], max_bytes: usize) -> String {
    let rendered = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => {
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        _ => match std::str::from_utf8(body) {
            Ok(text) => text.to_owned(),
            Err(_) => return format!("<{} bytes of binary data>", body.len()),
        },
    };
    if rendered.len() > max_bytes {
        format!("{}…", truncate_utf8(&rendered, max_bytes))
    } else {
        rendered
    }
}
