use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::OutputFormat;

/// Ordered result fields, printed as `key=value` lines or as one JSON object.
#[derive(Debug, Default, Clone)]
pub struct Report {
    fields: Vec<(String, Value)>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, key: &str, value: impl Serialize) -> Result<&mut Self> {
        self.fields.push((key.to_string(), serde_json::to_value(value)?));
        Ok(self)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self
                .fields
                .iter()
                .map(|(key, value)| format!("{key}={}", text_value(value)))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => {
                let object: Map<String, Value> = self.fields.iter().cloned().collect();
                Ok(serde_json::to_string_pretty(&Value::Object(object))?)
            }
        }
    }
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(text_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_output_keeps_field_order() -> Result<()> {
        let mut report = Report::new();
        report
            .field("seed", "0x12345678")?
            .field("count", 2)?
            .field("seeds", ["0x1", "0x2"])?;
        assert_eq!(
            report.render(OutputFormat::Text)?,
            "seed=0x12345678\ncount=2\nseeds=0x1,0x2"
        );
        Ok(())
    }

    #[test]
    fn json_output_is_an_object() -> Result<()> {
        let mut report = Report::new();
        report.field("found", true)?.field("seeds", ["0x1", "0x2"])?;
        let parsed: Value = serde_json::from_str(&report.render(OutputFormat::Json)?)?;
        assert_eq!(parsed["found"], Value::Bool(true));
        assert_eq!(parsed["seeds"][1], "0x2");
        Ok(())
    }
}
