use serde::Serialize;

/// Pretty-prints `value` for a debug log line, or returns `None` when DEBUG is
/// disabled so the serialization cost is skipped.
pub(crate) fn pretty_json_for_debug<T>(value: &T) -> Option<String>
where
    T: Serialize,
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return None;
    }

    Some(
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>")),
    )
}
