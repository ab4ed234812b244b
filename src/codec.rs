//! Mapping between task rows and the `{"Tasks": [...]}` envelope.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SpmigError};
use crate::model::{Task, TaskField, incomplete_tasks};
use crate::settings::{SettingsState, SettingsStrategy, TaskSettings};

/// File name offered for exported documents.
pub const EXPORT_FILE_NAME: &str = "migration-tasks.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportDocument {
    pub tasks: Vec<ExportTask>,
}

/// A task as written to the envelope: the four path fields, then `Settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportTask {
    #[serde(flatten)]
    pub task: Task,
    pub settings: TaskSettings,
}

/// Build the document without checking task completeness. Preview and export
/// both go through here so they never diverge.
pub fn build_document(
    tasks: &[Task],
    settings: &SettingsState,
    strategy: &dyn SettingsStrategy,
) -> ExportDocument {
    ExportDocument {
        tasks: tasks
            .iter()
            .map(|task| ExportTask {
                task: task.clone(),
                settings: strategy.build(settings),
            })
            .collect(),
    }
}

/// Build the export document, rejecting the whole batch if any task is
/// incomplete.
pub fn serialize(
    tasks: &[Task],
    settings: &SettingsState,
    strategy: &dyn SettingsStrategy,
) -> Result<ExportDocument> {
    let incomplete = incomplete_tasks(tasks);
    if !incomplete.is_empty() {
        tracing::warn!(?incomplete, total = tasks.len(), "export rejected");
        return Err(SpmigError::Validation { incomplete });
    }
    Ok(build_document(tasks, settings, strategy))
}

/// Pretty-print with two-space indentation.
pub fn to_pretty_json(document: &ExportDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse a previously exported document back into task rows.
///
/// Only the four path fields are read and anything else on a task (including
/// `Settings`) is dropped. A field that is missing or falsy (`null`, `false`,
/// `0`, `""`) becomes an empty string, as does an array or object. `true` and
/// non-zero numbers are taken as their JSON text. An element that is not an
/// object yields a blank row.
pub fn deserialize(text: &str) -> Result<Vec<Task>> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| SpmigError::Parse(err.to_string()))?;

    let Some(items) = value.get("Tasks").and_then(Value::as_array) else {
        return Err(SpmigError::Parse(
            "document has no top-level `Tasks` array".into(),
        ));
    };

    Ok(items.iter().map(task_from_value).collect())
}

fn task_from_value(item: &Value) -> Task {
    let mut task = Task::default();
    let Some(object) = item.as_object() else {
        return task;
    };
    for field in TaskField::ALL {
        task.set_field(field, field_text(object.get(field.key())));
    }
    task
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(number)) if number.as_f64() != Some(0.0) => number.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ConfigurableStrategy, FixedStrategy, SettingKey};

    fn share_task() -> Task {
        Task::new(
            r"\srv\share",
            "https://a.sharepoint.com/sites/x",
            "Documents",
            "A/B",
        )
    }

    #[test]
    fn hidden_items_scenario_matches_expected_document() {
        let mut settings = SettingsState::default();
        settings.set_enabled(SettingKey::MigrateHiddenItems, true);

        let document = serialize(&[share_task()], &settings, &ConfigurableStrategy).unwrap();
        assert_eq!(
            serde_json::to_string(&document).unwrap(),
            r#"{"Tasks":[{"SourcePath":"\\srv\\share","TargetPath":"https://a.sharepoint.com/sites/x","TargetList":"Documents","TargetListRelativePath":"A/B","Settings":{"MigrateHiddenItems":true}}]}"#
        );
    }

    #[test]
    fn pretty_output_uses_two_space_indent() {
        let document =
            serialize(&[share_task()], &SettingsState::default(), &ConfigurableStrategy).unwrap();
        let pretty = to_pretty_json(&document).unwrap();
        assert!(pretty.starts_with("{\n  \"Tasks\": [\n    {\n      \"SourcePath\""));
        assert!(pretty.contains("\"Settings\": {}"));
    }

    #[test]
    fn settings_object_is_identical_across_tasks() {
        let mut settings = SettingsState::default();
        settings.set_enabled(SettingKey::SkipFilesWithExtensions, true);
        let tasks = vec![share_task(), Task::example()];

        let document = serialize(&tasks, &settings, &ConfigurableStrategy).unwrap();
        assert_eq!(document.tasks.len(), 2);
        assert_eq!(document.tasks[0].settings, document.tasks[1].settings);
    }

    #[test]
    fn one_incomplete_task_rejects_the_whole_batch() {
        let tasks = vec![share_task(), Task::new("a", "b", "  ", "d"), share_task()];
        let err = serialize(&tasks, &SettingsState::default(), &ConfigurableStrategy)
            .unwrap_err();
        match err {
            SpmigError::Validation { incomplete } => assert_eq!(incomplete, vec![1]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn build_document_does_not_validate() {
        let document = build_document(
            &[Task::default()],
            &SettingsState::default(),
            &ConfigurableStrategy,
        );
        assert_eq!(document.tasks.len(), 1);
    }

    #[test]
    fn fixed_variant_stamps_constant_settings() {
        let document =
            serialize(&[share_task()], &SettingsState::default(), &FixedStrategy).unwrap();
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value["Tasks"][0]["Settings"],
            serde_json::json!({
                "DefaultPackageFileCount": 0,
                "MigrateSiteSettings": 0,
                "MigrateRootFolder": true
            })
        );
    }

    #[test]
    fn export_then_import_round_trips_path_fields() {
        let tasks = vec![share_task(), Task::example()];
        let mut settings = SettingsState::default();
        settings.set_enabled(SettingKey::MigrateOneNoteNotebook, true);

        let text =
            to_pretty_json(&serialize(&tasks, &settings, &ConfigurableStrategy).unwrap()).unwrap();
        assert_eq!(deserialize(&text).unwrap(), tasks);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let tasks = deserialize(r#"{"Tasks":[{"SourcePath":"p","TargetList":"L"}]}"#).unwrap();
        assert_eq!(tasks, vec![Task::new("p", "", "L", "")]);
    }

    #[test]
    fn extra_fields_and_settings_are_dropped() {
        let tasks = deserialize(
            r#"{"Version":2,"Tasks":[{"SourcePath":"s","TargetPath":"t","TargetList":"l","TargetListRelativePath":"r","Owner":"x","Settings":{"MigrateHiddenItems":true}}]}"#,
        )
        .unwrap();
        assert_eq!(tasks, vec![Task::new("s", "t", "l", "r")]);
    }

    #[test]
    fn null_and_scalar_fields_are_coerced() {
        let tasks =
            deserialize(r#"{"Tasks":[{"SourcePath":null,"TargetList":42,"TargetPath":true}]}"#)
                .unwrap();
        assert_eq!(tasks, vec![Task::new("", "true", "42", "")]);
    }

    #[test]
    fn falsy_and_structured_fields_become_empty() {
        let tasks = deserialize(
            r#"{"Tasks":[{"SourcePath":0,"TargetPath":false,"TargetList":"","TargetListRelativePath":["a"]},
                         {"SourcePath":{"a":1},"TargetPath":0.0,"TargetList":-1.5,"TargetListRelativePath":" "}]}"#,
        )
        .unwrap();
        assert_eq!(
            tasks,
            vec![Task::default(), Task::new("", "", "-1.5", " ")]
        );
    }

    #[test]
    fn non_object_elements_become_blank_rows() {
        let tasks = deserialize(r#"{"Tasks":[1,"x",null,[],{"SourcePath":"s"}]}"#).unwrap();
        assert_eq!(tasks.len(), 5);
        assert!(tasks[..4].iter().all(Task::is_blank));
        assert_eq!(tasks[4], Task::new("s", "", "", ""));
    }

    #[test]
    fn empty_tasks_array_yields_no_tasks() {
        assert!(deserialize(r#"{"Tasks":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        for text in [
            "not json",
            "",
            "[]",
            r#"{"tasks":[]}"#,
            r#"{"Tasks":{}}"#,
        ] {
            let err = deserialize(text).unwrap_err();
            assert_eq!(err.code(), "parse_error", "input {text:?}");
        }
    }
}
