use std::fmt::Write as FmtWrite;

use crate::models::{OutputFormat, StoredObject, UploadReport, VectorStoreId};

pub trait Formatter {
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_objects(&self, objects: &[StoredObject]) -> String;
    fn format_report(&self, report: &UploadReport) -> String;
    fn format_store_ids(&self, store_ids: &[VectorStoreId]) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub storage_backend: String,
    pub storage_target: String,
    pub storage_connected: bool,
    pub container: String,
    pub provider_target: String,
    pub provider_connected: bool,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();

        let storage_status = if status.storage_connected {
            "[CONNECTED]"
        } else {
            "[DISCONNECTED]"
        };
        writeln!(
            output,
            "Object Store:  {} ({})",
            status.storage_backend, storage_status
        )
        .unwrap();
        writeln!(output, "  Target:      {}", status.storage_target).unwrap();
        writeln!(output, "  Container:   {}", status.container).unwrap();
        writeln!(output).unwrap();

        let provider_status = if status.provider_connected {
            "[CONNECTED]"
        } else {
            "[DISCONNECTED]"
        };
        writeln!(output, "File Store:    {}", provider_status).unwrap();
        writeln!(output, "  Target:      {}", status.provider_target).unwrap();

        output
    }

    fn format_objects(&self, objects: &[StoredObject]) -> String {
        if objects.is_empty() {
            return "No objects found.\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "Objects ({})", objects.len()).unwrap();
        writeln!(output, "-------").unwrap();
        for object in objects {
            writeln!(output, "  {}", object.key).unwrap();
            let mut entries: Vec<_> = object.metadata.iter().collect();
            entries.sort_by_key(|(k, _)| k.as_str());
            for (key, value) in entries {
                writeln!(output, "    {} = {}", key, value).unwrap();
            }
        }
        output
    }

    fn format_report(&self, report: &UploadReport) -> String {
        let mut output = String::new();
        writeln!(output, "Upload Complete").unwrap();
        writeln!(output, "---------------").unwrap();
        writeln!(output, "Uploaded: {}", report.uploaded.len()).unwrap();
        for id in &report.uploaded {
            writeln!(output, "  {}", id).unwrap();
        }
        if !report.failed.is_empty() {
            writeln!(output, "Failed: {}", report.failed.len()).unwrap();
            for failure in &report.failed {
                writeln!(output, "  {} ({})", failure.name, failure.reason).unwrap();
            }
        }
        output
    }

    fn format_store_ids(&self, store_ids: &[VectorStoreId]) -> String {
        if store_ids.is_empty() {
            return "No vector stores.\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "Vector Stores ({})", store_ids.len()).unwrap();
        writeln!(output, "-------------").unwrap();
        for id in store_ids {
            writeln!(output, "  {}", id).unwrap();
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, json: &serde_json::Value) -> String {
        if self.pretty {
            serde_json::to_string_pretty(json).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(json).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }
}

impl Formatter for JsonFormatter {
    fn format_status(&self, status: &StatusInfo) -> String {
        let json = serde_json::json!({
            "storage": {
                "backend": status.storage_backend,
                "target": status.storage_target,
                "connected": status.storage_connected,
                "container": status.container,
            },
            "provider": {
                "target": status.provider_target,
                "connected": status.provider_connected,
            }
        });
        self.render(&json)
    }

    fn format_objects(&self, objects: &[StoredObject]) -> String {
        let objects_array: Vec<serde_json::Value> = objects
            .iter()
            .map(|o| serde_json::json!({"key": o.key, "metadata": o.metadata}))
            .collect();
        self.render(&serde_json::json!({"objects": objects_array}))
    }

    fn format_report(&self, report: &UploadReport) -> String {
        let failed: Vec<serde_json::Value> = report
            .failed
            .iter()
            .map(|f| serde_json::json!({"name": f.name, "reason": f.reason}))
            .collect();
        let json = serde_json::json!({
            "uploaded": report.uploaded,
            "failed": failed,
        });
        self.render(&json)
    }

    fn format_store_ids(&self, store_ids: &[VectorStoreId]) -> String {
        self.render(&serde_json::json!({"store_ids": store_ids}))
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({"error": error}).to_string()
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FailedUpload, RemoteFileId};

    #[test]
    fn test_text_report_lists_failures() {
        let report = UploadReport {
            uploaded: vec![RemoteFileId("file-1".to_string())],
            failed: vec![FailedUpload {
                name: "b.csv".to_string(),
                reason: "simulated".to_string(),
            }],
        };

        let text = TextFormatter.format_report(&report);
        assert!(text.contains("Uploaded: 1"));
        assert!(text.contains("b.csv (simulated)"));
    }

    #[test]
    fn test_json_store_ids_round_trips() {
        let ids = vec![VectorStoreId("vs-1".to_string())];
        let json = JsonFormatter::new(false).format_store_ids(&ids);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["store_ids"][0], "vs-1");
    }
}
