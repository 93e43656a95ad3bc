use serde_json::{Value, json};

use crate::cli::app::OutputFormat;

/// Render a command result. JSON output is wrapped as `{"output": ...}`.
pub fn render(format: OutputFormat, value: &Value) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(&json!({ "output": value })),
        OutputFormat::Text => Ok(text(value)),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(line).collect::<Vec<_>>().join("\n"),
        other => other.to_string(),
    }
}

fn line(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_wrapped() {
        let rendered = render(OutputFormat::Json, &json!("text/plain")).unwrap();
        assert_eq!(rendered, r#"{"output":"text/plain"}"#);
        let rendered = render(OutputFormat::Json, &Value::Null).unwrap();
        assert_eq!(rendered, r#"{"output":null}"#);
    }

    #[test]
    fn text_lists_one_item_per_line() {
        let value = json!(["Sheet1", "Data"]);
        assert_eq!(render(OutputFormat::Text, &value).unwrap(), "Sheet1\nData");

        let rows = json!([["a", 1], [true, null]]);
        assert_eq!(
            render(OutputFormat::Text, &rows).unwrap(),
            "[\"a\",1]\n[true,null]"
        );
    }

    #[test]
    fn text_null_is_empty() {
        assert_eq!(render(OutputFormat::Text, &Value::Null).unwrap(), "");
    }
}
