use std::ffi::OsStr;

/// Quote a command-line word for log output. Not shell-safe escaping.
pub fn quote_for_display(input: &OsStr) -> String {
    let input = input.to_string_lossy();
    if input.is_empty() {
        return "\"\"".to_string();
    }

    if input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@' | '='))
    {
        return input.into_owned();
    }

    format!("\"{}\"", input.replace('\\', "\\\\").replace('"', "\\\""))
}
