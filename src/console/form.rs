//! State of the add/edit dialog.
//!
//! A form is created when the dialog opens, either from defaults or as a copy
//! of a loaded record, and dropped when it closes. Field edits go through
//! [`RecordForm::set_field`]; the `cc` field is only ever written by the
//! embedded [`CcListEditor`].

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::cc_list::{CcListEditor, CcListError};
use crate::models::{ConfigRecord, ConfigStatus, ConfigType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(FormField),
    #[error("{field} must be a whole number, got {value:?}")]
    InvalidNumber { field: FormField, value: String },
    #[error("{field} does not accept {value:?}")]
    InvalidChoice { field: FormField, value: String },
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Bindable inputs of the dialog, named by their JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ConfigName,
    Type,
    Status,
    SendTo,
    Path,
    Backup,
    SettingSmtpId,
    ScheduleTimeHour,
    ScheduleTimeMinute,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::ConfigName,
        FormField::Type,
        FormField::Status,
        FormField::SendTo,
        FormField::Path,
        FormField::Backup,
        FormField::SettingSmtpId,
        FormField::ScheduleTimeHour,
        FormField::ScheduleTimeMinute,
        FormField::Description,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FormField::ConfigName => "configName",
            FormField::Type => "type",
            FormField::Status => "status",
            FormField::SendTo => "sendTo",
            FormField::Path => "path",
            FormField::Backup => "backup",
            FormField::SettingSmtpId => "settingSmtpId",
            FormField::ScheduleTimeHour => "scheduleTimeHour",
            FormField::ScheduleTimeMinute => "scheduleTimeMinute",
            FormField::Description => "description",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone)]
pub struct RecordForm {
    mode: FormMode,
    record: ConfigRecord,
    cc: CcListEditor,
    api_error: Option<String>,
    open: bool,
}

impl RecordForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            record: ConfigRecord::default(),
            cc: CcListEditor::new(),
            api_error: None,
            open: true,
        }
    }

    /// Copies `record` into the form. A record without an identifier opens in
    /// create mode.
    pub fn edit(record: &ConfigRecord) -> Self {
        let cc = CcListEditor::from_serialized(&record.cc);
        let mut record = record.clone();
        record.cc = cc.serialize();
        Self {
            mode: record.id.map_or(FormMode::Create, FormMode::Edit),
            record,
            cc,
            api_error: None,
            open: true,
        }
    }

    /// Reuses the dialog for another record, or for a fresh create.
    pub fn reopen(&mut self, record: Option<&ConfigRecord>) {
        *self = match record {
            Some(record) => Self::edit(record),
            None => Self::create(),
        };
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn existing_id(&self) -> Option<i64> {
        match self.mode {
            FormMode::Edit(id) => Some(id),
            FormMode::Create => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Config",
            FormMode::Edit(_) => "Edit Config",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create",
            FormMode::Edit(_) => "Update",
        }
    }

    pub fn record(&self) -> &ConfigRecord {
        &self.record
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        let record = &mut self.record;
        match field {
            FormField::ConfigName => record.config_name = value.to_string(),
            FormField::SendTo => record.send_to = value.to_string(),
            FormField::Path => record.path = value.to_string(),
            FormField::Backup => record.backup = optional_text(value),
            FormField::Description => record.description = optional_text(value),
            FormField::Type => record.config_type = parse_choice::<ConfigType>(field, value)?,
            FormField::Status => record.status = parse_choice::<ConfigStatus>(field, value)?,
            FormField::SettingSmtpId => record.setting_smtp_id = parse_number(field, value)?,
            FormField::ScheduleTimeHour => record.schedule_time_hour = parse_number(field, value)?,
            FormField::ScheduleTimeMinute => {
                record.schedule_time_minute = parse_number(field, value)?
            }
        }
        Ok(())
    }

    /// `key=value` binding, as typed on the command line.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), FormError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| FormError::UnknownField(assignment.to_string()))?;
        self.set_field(key.parse()?, value)
    }

    pub fn cc(&self) -> &CcListEditor {
        &self.cc
    }

    pub fn set_cc_input(&mut self, input: impl Into<String>) {
        self.cc.set_pending(input);
    }

    pub fn add_cc(&mut self, candidate: &str) -> Result<(), CcListError> {
        self.cc.add(candidate)?;
        self.sync_cc();
        Ok(())
    }

    pub fn add_pending_cc(&mut self) -> Result<(), CcListError> {
        self.cc.add_pending()?;
        self.sync_cc();
        Ok(())
    }

    pub fn remove_cc(&mut self, email: &str) -> bool {
        let removed = self.cc.remove(email);
        self.sync_cc();
        removed
    }

    fn sync_cc(&mut self) {
        self.record.cc = self.cc.serialize();
    }

    /// Required inputs of the dialog. Runs before any request is made.
    pub fn validate(&self) -> Result<(), FormError> {
        let required = [
            (FormField::ConfigName, &self.record.config_name),
            (FormField::SendTo, &self.record.send_to),
            (FormField::Path, &self.record.path),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Body to submit. `cc` comes from the editor, never from the pending input.
    pub fn payload(&self) -> ConfigRecord {
        ConfigRecord {
            id: self.existing_id(),
            cc: self.cc.serialize(),
            ..self.record.clone()
        }
    }

    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    pub(crate) fn set_api_error(&mut self, message: String) {
        self.api_error = Some(message);
    }

    pub fn dismiss_api_error(&mut self) {
        self.api_error = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_number<T: FromStr>(field: FormField, value: &str) -> Result<T, FormError> {
    value.trim().parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_choice<T: FromStr>(field: FormField, value: &str) -> Result<T, FormError> {
    value.parse().map_err(|_| FormError::InvalidChoice {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SmtpProfile;

    #[test]
    fn test_create_form_defaults() {
        let form = RecordForm::create();
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.title(), "Add Config");
        assert_eq!(form.submit_label(), "Create");
        assert!(form.is_open());
        assert_eq!(form.record(), &ConfigRecord::default());
        assert_eq!(form.record().schedule_time_minute, 1);
        assert_eq!(form.record().smtp_profile(), Some(SmtpProfile::Gmail));
    }

    #[test]
    fn test_edit_form_copies_record() {
        let record = ConfigRecord {
            id: Some(12),
            config_name: "Weekly".to_string(),
            send_to: "a@x.com".to_string(),
            cc: "b@y.com, c@z.com".to_string(),
            path: "/srv".to_string(),
            ..ConfigRecord::default()
        };
        let form = RecordForm::edit(&record);
        assert_eq!(form.mode(), FormMode::Edit(12));
        assert_eq!(form.title(), "Edit Config");
        assert_eq!(form.submit_label(), "Update");
        assert_eq!(form.cc().len(), 2);
        assert_eq!(form.record().cc, "b@y.com,c@z.com");
        assert_eq!(form.payload().id, Some(12));
    }

    #[test]
    fn test_set_fields_from_text() {
        let mut form = RecordForm::create();
        form.apply_assignment("configName=Nightly").unwrap();
        form.apply_assignment("type=Bacteria").unwrap();
        form.apply_assignment("status=stopped").unwrap();
        form.apply_assignment("settingSmtpId=102").unwrap();
        form.apply_assignment("scheduleTimeHour= 23").unwrap();
        form.apply_assignment("backup=").unwrap();
        form.apply_assignment("description=runs=nightly").unwrap();

        let record = form.record();
        assert_eq!(record.config_name, "Nightly");
        assert_eq!(record.config_type, ConfigType::Bacteria);
        assert_eq!(record.status, ConfigStatus::Stopped);
        assert_eq!(record.setting_smtp_id, 102);
        assert_eq!(record.schedule_time_hour, 23);
        assert_eq!(record.backup, None);
        assert_eq!(record.description.as_deref(), Some("runs=nightly"));
    }

    #[test]
    fn test_set_field_errors() {
        let mut form = RecordForm::create();
        assert_eq!(
            form.set_field(FormField::ScheduleTimeMinute, "half"),
            Err(FormError::InvalidNumber {
                field: FormField::ScheduleTimeMinute,
                value: "half".to_string()
            })
        );
        assert!(matches!(
            form.set_field(FormField::Status, "paused"),
            Err(FormError::InvalidChoice { .. })
        ));
        assert_eq!(
            form.apply_assignment("cc=a@x.com"),
            Err(FormError::UnknownField("cc".to_string()))
        );
        assert!(form.apply_assignment("configName").is_err());
        assert_eq!(form.record(), &ConfigRecord::default());
    }

    #[test]
    fn test_validate_required_fields() {
        let mut form = RecordForm::create();
        assert_eq!(
            form.validate(),
            Err(FormError::MissingField(FormField::ConfigName))
        );
        form.set_field(FormField::ConfigName, "Nightly").unwrap();
        form.set_field(FormField::SendTo, "ops@x.com").unwrap();
        assert_eq!(form.validate(), Err(FormError::MissingField(FormField::Path)));
        form.set_field(FormField::Path, "/data/out").unwrap();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_cc_edits_keep_field_in_sync() {
        let mut form = RecordForm::create();
        form.add_cc("a@x.com").unwrap();
        form.set_cc_input("b@y.com");
        form.add_pending_cc().unwrap();
        assert_eq!(form.record().cc, "a@x.com,b@y.com");

        assert!(form.add_cc("a@x.com").is_err());
        assert_eq!(form.record().cc, "a@x.com,b@y.com");

        assert!(form.remove_cc("a@x.com"));
        assert_eq!(form.record().cc, "b@y.com");
    }

    #[test]
    fn test_payload_ignores_pending_cc_input() {
        let mut form = RecordForm::create();
        form.add_cc("a@x.com").unwrap();
        form.set_cc_input("typed-but-not-added@x.com");
        assert_eq!(form.payload().cc, "a@x.com");
        assert_eq!(form.payload().id, None);
    }

    #[test]
    fn test_reopen_replaces_state() {
        let mut form = RecordForm::create();
        form.add_cc("a@x.com").unwrap();
        form.set_api_error("boom".to_string());

        let existing = ConfigRecord {
            id: Some(3),
            cc: "z@x.com".to_string(),
            ..ConfigRecord::default()
        };
        form.reopen(Some(&existing));
        assert_eq!(form.mode(), FormMode::Edit(3));
        assert_eq!(form.cc().serialize(), "z@x.com");
        assert!(form.api_error().is_none());

        form.reopen(None);
        assert_eq!(form.mode(), FormMode::Create);
        assert!(form.cc().is_empty());
    }
}
