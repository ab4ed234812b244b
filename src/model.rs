use serde::{Deserialize, Serialize};

/// One folder or library migration instruction.
///
/// Field order is the order the fields appear in an exported document.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    pub source_path: String,
    pub target_path: String,
    pub target_list: String,
    pub target_list_relative_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    SourcePath,
    TargetPath,
    TargetList,
    TargetListRelativePath,
}

impl TaskField {
    pub const ALL: [Self; 4] = [
        Self::SourcePath,
        Self::TargetPath,
        Self::TargetList,
        Self::TargetListRelativePath,
    ];

    /// Key used for this field in the JSON envelope.
    pub fn key(self) -> &'static str {
        match self {
            Self::SourcePath => "SourcePath",
            Self::TargetPath => "TargetPath",
            Self::TargetList => "TargetList",
            Self::TargetListRelativePath => "TargetListRelativePath",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::SourcePath => r"e.g. \\fileserver\share\folder",
            Self::TargetPath => "e.g. https://contoso.sharepoint.com/sites/Marketing",
            Self::TargetList => "e.g. Documents",
            Self::TargetListRelativePath => "e.g. General/SubFolder/AnotherSubFolder",
        }
    }
}

impl std::fmt::Display for TaskField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Task {
    pub fn new(
        source_path: impl Into<String>,
        target_path: impl Into<String>,
        target_list: impl Into<String>,
        target_list_relative_path: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            target_list: target_list.into(),
            target_list_relative_path: target_list_relative_path.into(),
        }
    }

    /// The illustrative task offered by "load example".
    pub fn example() -> Self {
        Self::new(
            r"\\trustedtech.local\ttt\ProService\Management Reporting",
            "https://contoso.sharepoint.com/sites/ProfressionalServices",
            "Documents",
            "General/SubFolder/AnotherSubFolder",
        )
    }

    pub fn field(&self, field: TaskField) -> &str {
        match field {
            TaskField::SourcePath => &self.source_path,
            TaskField::TargetPath => &self.target_path,
            TaskField::TargetList => &self.target_list,
            TaskField::TargetListRelativePath => &self.target_list_relative_path,
        }
    }

    pub fn set_field(&mut self, field: TaskField, value: impl Into<String>) {
        let slot = match field {
            TaskField::SourcePath => &mut self.source_path,
            TaskField::TargetPath => &mut self.target_path,
            TaskField::TargetList => &mut self.target_list,
            TaskField::TargetListRelativePath => &mut self.target_list_relative_path,
        };
        *slot = value.into();
    }

    /// Fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<TaskField> {
        TaskField::ALL
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.missing_fields().len() == TaskField::ALL.len()
    }
}

/// A task is exportable when all four fields are non-empty after trimming.
/// No path or URL syntax is checked.
pub fn is_valid(task: &Task) -> bool {
    task.missing_fields().is_empty()
}

/// Indices of tasks that fail [`is_valid`], in order.
pub fn incomplete_tasks(tasks: &[Task]) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| !is_valid(task))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Task {
        Task::new("a", "b", "c", "d")
    }

    #[test]
    fn complete_task_is_valid() {
        assert!(is_valid(&complete()));
        assert!(is_valid(&Task::example()));
    }

    #[test]
    fn each_empty_or_whitespace_field_invalidates() {
        for field in TaskField::ALL {
            for blank in ["", " ", "\t \n"] {
                let mut task = complete();
                task.set_field(field, blank);
                assert!(!is_valid(&task), "{field} = {blank:?} should be invalid");
                assert_eq!(task.missing_fields(), vec![field]);
            }
        }
    }

    #[test]
    fn surrounding_whitespace_is_allowed_when_content_exists() {
        let task = Task::new("  a ", "b", " c", "d\t");
        assert!(is_valid(&task));
    }

    #[test]
    fn blank_task_is_default() {
        let task = Task::default();
        assert!(task.is_blank());
        assert_eq!(task.missing_fields().len(), 4);
    }

    #[test]
    fn incomplete_tasks_reports_indices() {
        let tasks = vec![complete(), Task::default(), complete(), Task::new("a", "", "c", "d")];
        assert_eq!(incomplete_tasks(&tasks), vec![1, 3]);
    }

    #[test]
    fn serializes_with_pascal_case_keys_in_declared_order() {
        let json = serde_json::to_string(&Task::new("s", "t", "l", "r")).unwrap();
        assert_eq!(
            json,
            r#"{"SourcePath":"s","TargetPath":"t","TargetList":"l","TargetListRelativePath":"r"}"#
        );
    }

    #[test]
    fn field_accessors_round_trip() {
        let mut task = Task::default();
        for (i, field) in TaskField::ALL.into_iter().enumerate() {
            task.set_field(field, format!("v{i}"));
        }
        assert_eq!(task.field(TaskField::TargetList), "v2");
        assert_eq!(task.target_list_relative_path, "v3");
    }
}
