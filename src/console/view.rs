use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::selection::SelectionSet;
use crate::models::ConfigRecord;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load config email data";

/// What a row's action buttons ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIntent {
    Edit(i64),
    Delete(i64),
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Select")]
    select: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Config Name")]
    config_name: String,
    #[tabled(rename = "Type")]
    config_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Send To")]
    send_to: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "SMTP")]
    smtp: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
}

impl RecordRow {
    fn new(record: &ConfigRecord, selection: &SelectionSet) -> Self {
        let selected = record.id.is_some_and(|id| selection.is_selected(id));
        Self {
            select: if selected { "[x]" } else { "[ ]" },
            id: record.id.map(|id| id.to_string()).unwrap_or_default(),
            config_name: record.config_name.clone(),
            config_type: record.config_type.to_string(),
            status: record.status.to_string(),
            send_to: record.send_to.clone(),
            path: record.path.clone(),
            smtp: record
                .smtp_profile()
                .map(|profile| profile.label().to_string())
                .unwrap_or_else(|| record.setting_smtp_id.to_string()),
            schedule: record.schedule_label(),
        }
    }
}

/// Identifiers of the rows currently loaded, for select-all.
pub fn loaded_ids(records: &[ConfigRecord]) -> impl Iterator<Item = i64> + '_ {
    records.iter().filter_map(|r| r.id)
}

pub fn find_record(records: &[ConfigRecord], id: i64) -> Option<&ConfigRecord> {
    records.iter().find(|r| r.id == Some(id))
}

pub fn render_table(records: &[ConfigRecord], selection: &SelectionSet) -> String {
    let rows: Vec<RecordRow> = records
        .iter()
        .map(|record| RecordRow::new(record, selection))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    let all = if selection.is_all_selected(loaded_ids(records)) {
        "[x]"
    } else {
        "[ ]"
    };
    format!("{table}\n{all} {} of {} selected", selection.len(), records.len())
}
