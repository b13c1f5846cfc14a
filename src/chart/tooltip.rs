use crate::dataset::StartRecord;

/// Fields shown when hovering a record, in display order.
pub trait TooltipFields {
    fn tooltip_fields(&self) -> Vec<(&'static str, String)>;
}

impl TooltipFields for StartRecord {
    fn tooltip_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(6);
        if let Some(id) = &self.id {
            fields.push(("ID", id.clone()));
        }
        fields.push(("CompletionTime", format_seconds(self.completion_time)));
        fields.push(("Delay", format_seconds(self.delay)));
        fields.push(("RunningCount", self.running_count.to_string()));
        fields.push(("StartingCount", self.starting_count.to_string()));
        if let Some(start) = self.start_time {
            fields.push(("StartTime", format_seconds(start)));
        }
        fields
    }
}

fn format_seconds(value: f64) -> String {
    format!("{value:.3}s")
}

/// `key: value` lines joined with newlines.
pub fn tooltip_text(fields: &[(&'static str, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_record_fields_in_order() {
        let mut record = StartRecord::new(12.5, 0.25);
        record.running_count = 3;
        record.starting_count = 1;
        let text = tooltip_text(&record.tooltip_fields());
        assert_eq!(
            text,
            "CompletionTime: 12.500s\nDelay: 0.250s\nRunningCount: 3\nStartingCount: 1"
        );
    }

    #[test]
    fn optional_fields_included_when_present() {
        let mut record = StartRecord::new(1.0, 0.5);
        record.id = Some("3fa1c".into());
        record.start_time = Some(0.5);
        let fields = record.tooltip_fields();
        assert_eq!(fields.first().map(|f| f.0), Some("ID"));
        assert_eq!(fields.last().map(|f| f.0), Some("StartTime"));
    }
}
